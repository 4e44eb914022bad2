//! Error types for Flowdesk Core.

use thiserror::Error;

/// Core error type for console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Request failed ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error payload, or the raw body.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Client-side validation failed; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns whether this failure is outside the normal request/validation flow.
    ///
    /// Unexpected failures are surfaced as intrusive notifications; everything
    /// else is shown next to the form that caused it.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_) | Self::Io(_))
    }

    /// Returns the HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
