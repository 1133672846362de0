//! Error types for the payeezy library

use thiserror::Error;

/// Result type alias for payeezy operations
pub type Result<T> = std::result::Result<T, PayeezyError>;

/// Main error type for payeezy operations
#[derive(Error, Debug)]
pub enum PayeezyError {
    /// A required field is missing or a constrained field failed its check
    #[error("Invalid field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// HTTP transport error (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the payment gateway
    #[error("Gateway returned status {status}: {body}")]
    Gateway { status: u16, body: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Header value that cannot be sent over HTTP
    #[error("Invalid header `{name}`: {message}")]
    InvalidHeader { name: String, message: String },

    /// HMAC key setup failure
    #[error("Signing error: {message}")]
    Signing { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PayeezyError {
    /// Create a validation error for `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing required field
    pub fn missing(field: impl Into<String>) -> Self {
        Self::validation(field, "cannot be None")
    }

    /// Create a gateway error
    pub fn gateway(status: u16, body: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Name of the offending field, for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether this error was raised before any network I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
