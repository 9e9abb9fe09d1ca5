//! Error types for dhis2-kit
//!
//! Every public API returns `Result<T, Error>`. The first four variants are
//! the classified API failures; the rest cover transport, configuration and
//! local I/O problems.

use thiserror::Error;

/// The main error type for dhis2-kit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Classified API Errors
    // ============================================================================
    /// 401 or 403: credentials rejected or insufficient permission
    #[error("Authentication failed: {body}")]
    Authentication { body: String },

    /// 404: the referenced resource or object does not exist
    #[error("Not found: {body}")]
    NotFound { body: String },

    /// 400 or 409: malformed parameters or a server-side conflict
    #[error("Validation failed: {body}")]
    Validation { body: String },

    /// Any other status, or a body that could not be decoded as JSON
    #[error("Server error: {message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required connection values: {fields}")]
    MissingConfigField { fields: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an authentication error
    pub fn authentication(body: impl Into<String>) -> Self {
        Self::Authentication { body: body.into() }
    }

    /// Create a not-found error
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::NotFound { body: body.into() }
    }

    /// Create a validation error
    pub fn validation(body: impl Into<String>) -> Self {
        Self::Validation { body: body.into() }
    }

    /// Create a server error tied to an HTTP status
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a server error for a response that could not be decoded
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Server {
            status: None,
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for the classified "request failed" family
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Error::Authentication { .. }
                | Error::NotFound { .. }
                | Error::Validation { .. }
                | Error::Server { .. }
        )
    }

    /// HTTP status carried by a server error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response text carried by the error, for diagnostics
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Authentication { body }
            | Error::NotFound { body }
            | Error::Validation { body } => Some(body),
            Error::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias for dhis2-kit
pub type Result<T> = std::result::Result<T, Error>;
