//! Error types for the interpreter's external boundary.
//!
//! Parse and lookup failures never become errors: they resolve to usage or
//! "no such file" lines inside the command handlers. Only the gateway reports
//! failures as values, and the handlers convert every [`GatewayError`] into a
//! transcript line before returning.

use thiserror::Error;

/// Failure reported by a filesystem/process [`Gateway`](crate::Gateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Request could not be sent or no response arrived
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response not covered by a more specific variant
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),
    /// Entry or process does not exist for this user
    #[error("not found")]
    NotFound,
    /// Permission bits forbid the operation
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Another write to the same file is in progress
    #[error("file is locked for writing")]
    Locked,
    /// The write would exceed the user's storage limit
    #[error("disk quota exceeded")]
    QuotaExceeded,
    /// Request was rejected as malformed
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl GatewayError {
    /// Map an HTTP status code to the matching error.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Invalid("bad request".to_string()),
            403 => Self::PermissionDenied("forbidden".to_string()),
            404 => Self::NotFound,
            413 => Self::QuotaExceeded,
            423 => Self::Locked,
            _ => Self::Http { status },
        }
    }
}
