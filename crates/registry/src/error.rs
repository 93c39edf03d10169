//! Error types for registry operations.
//!
//! Every error here is fatal for a synthesis run: there is no retry layer,
//! a failed call to the orchestration service aborts before any output is
//! written.

use crate::types::ResourceKind;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (transport, auth or non-success status).
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The response body did not have the expected shape.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A listed record lacks a field every record of its kind must carry.
    #[error("{kind} record is missing field `{field}`")]
    MissingField {
        /// Kind of the offending record.
        kind: ResourceKind,
        /// Name of the missing field.
        field: String,
    },
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Create a missing field error.
    pub fn missing_field(kind: ResourceKind, field: impl Into<String>) -> Self {
        Self::MissingField {
            kind,
            field: field.into(),
        }
    }

    /// HTTP status code, when the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
