//! Response classification
//!
//! Shared by the async and blocking transports so both modes map statuses
//! and bodies to exactly the same errors. Classification happens before any
//! attempt to decode JSON.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Number of body characters kept in decode error messages
pub const BODY_EXCERPT_CHARS: usize = 200;

/// Map an HTTP status to a typed error
///
/// Statuses below 400 pass through untouched.
pub fn check_status(status: u16, body: &str) -> Result<()> {
    match status {
        401 | 403 => Err(Error::authentication(body)),
        404 => Err(Error::not_found(body)),
        400 | 409 => Err(Error::validation(body)),
        400.. => Err(Error::server(status, format!("{status}: {body}"))),
        _ => Ok(()),
    }
}

/// Decode a successful response body
///
/// 204 and empty bodies yield an empty object without decoding. Anything
/// else must be labelled as JSON and decode to an object.
pub fn decode_body(status: u16, content_type: &str, body: &str) -> Result<JsonObject> {
    if status == 204 || body.is_empty() {
        return Ok(JsonObject::new());
    }

    let content_type = content_type.to_ascii_lowercase();
    if !content_type.contains("application/json") {
        return Err(Error::server(
            status,
            format!(
                "Expected JSON but got Content-Type='{content_type}' (status {status}). Body (truncated): {}",
                excerpt(body)
            ),
        ));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::decode(format!(
            "Expected a JSON object but got {}. Body (truncated): {}",
            json_kind(&other),
            excerpt(body)
        ))),
        Err(e) => Err(Error::decode(format!(
            "Failed to decode JSON response: {e}. Body (truncated): {}",
            excerpt(body)
        ))),
    }
}

/// Classify and decode a complete response
pub fn parse_response(status: u16, content_type: &str, body: &str) -> Result<JsonObject> {
    check_status(status, body)?;
    decode_body(status, content_type, body)
}

/// First `BODY_EXCERPT_CHARS` characters of a body
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
