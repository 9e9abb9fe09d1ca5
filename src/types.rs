//! Common types used throughout dhis2-kit
//!
//! This module contains shared type aliases, the HTTP method enum and the
//! scalar query-parameter value used by every request builder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, the shape of every decoded response body
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Free-form query parameters, keyed by parameter name
pub type QueryParams = BTreeMap<String, QueryValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Query Values
// ============================================================================

/// A query parameter value
///
/// Scalars serialize to a single `key=value` pair. `List` repeats the key
/// once per element, which is how analytics expects several `dimension`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl QueryValue {
    /// Best-effort coercion of a command-line value
    ///
    /// `true`/`false` (any case) become booleans, all-digit strings become
    /// integers, everything else stays a string.
    pub fn coerce(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower == "true" || lower == "false" {
            return Self::Bool(lower == "true");
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return Self::Int(n);
            }
        }
        Self::Str(raw.to_string())
    }

    /// Expand into `(key, value)` pairs ready for the query string
    pub fn to_pairs(&self, key: &str) -> Vec<(String, String)> {
        match self {
            Self::List(values) => values
                .iter()
                .map(|v| (key.to_string(), v.clone()))
                .collect(),
            other => vec![(key.to_string(), other.to_string())],
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Flatten a parameter map into query pairs, preserving key order
pub fn query_pairs(params: &QueryParams) -> Vec<(String, String)> {
    params
        .iter()
        .flat_map(|(key, value)| value.to_pairs(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let patch: reqwest::Method = Method::PATCH.into();
        assert_eq!(reqwest::Method::PATCH, patch);
        assert_eq!(Method::DELETE.to_string(), "DELETE");
    }

    #[test]
    fn test_method_default() {
        assert_eq!(Method::default(), Method::GET);
    }

    #[test]
    fn test_bool_serializes_as_literal() {
        assert_eq!(QueryValue::Bool(true).to_string(), "true");
        assert_eq!(QueryValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(QueryValue::coerce("true"), QueryValue::Bool(true));
        assert_eq!(QueryValue::coerce("FALSE"), QueryValue::Bool(false));
        assert_eq!(QueryValue::coerce("2"), QueryValue::Int(2));
        assert_eq!(
            QueryValue::coerce("ImspTQPwCqd"),
            QueryValue::Str("ImspTQPwCqd".to_string())
        );
        assert_eq!(QueryValue::coerce("-3"), QueryValue::Str("-3".to_string()));
        assert_eq!(QueryValue::coerce(""), QueryValue::Str(String::new()));
    }

    #[test]
    fn test_list_repeats_key() {
        let value = QueryValue::List(vec!["dx:abc".to_string(), "pe:LAST_12_MONTHS".to_string()]);
        assert_eq!(
            value.to_pairs("dimension"),
            vec![
                ("dimension".to_string(), "dx:abc".to_string()),
                ("dimension".to_string(), "pe:LAST_12_MONTHS".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs() {
        let mut params = QueryParams::new();
        params.insert("level".to_string(), 2u32.into());
        params.insert("includeChildren".to_string(), true.into());

        let pairs = query_pairs(&params);
        assert_eq!(
            pairs,
            vec![
                ("includeChildren".to_string(), "true".to_string()),
                ("level".to_string(), "2".to_string()),
            ]
        );
    }
}
