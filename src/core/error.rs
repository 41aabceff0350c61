//! Error type system for the Lend-a-Read client
//!
//! This module provides the client-side error taxonomy:
//! - Validation errors caught before any call is made
//! - Server-reported errors carrying the backend's own message
//! - Unauthorized responses (handled globally by the session)
//! - Network and decoding failures shown with a generic fallback

use serde::Deserialize;

/// Main error type for the Lend-a-Read client
#[derive(Debug, thiserror::Error)]
pub enum LendError {
    // Client-side errors
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Server-reported errors
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Local errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LendError {
    /// Get the error type name, used in logs
    pub fn error_type(&self) -> &'static str {
        match self {
            LendError::Validation(_) => "Validation",
            LendError::NotFound(_) => "NotFound",
            LendError::Server { .. } => "Server",
            LendError::Unauthorized(_) => "Unauthorized",
            LendError::Network(_) => "Network",
            LendError::Decode(_) => "Decode",
            LendError::Storage(_) => "Storage",
            LendError::Config(_) => "Config",
        }
    }

    /// Whether this error came from a 401 response
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LendError::Unauthorized(_))
    }

    /// HTTP status of a server-reported error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            LendError::Server { status, .. } => Some(*status),
            LendError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Message to show inline for a failed action.
    ///
    /// Validation and server errors carry text meant for the user; everything
    /// else collapses to the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            LendError::Validation(message) | LendError::Server { message, .. } => {
                message.clone()
            }
            LendError::Unauthorized(message) | LendError::NotFound(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<std::io::Error> for LendError {
    fn from(err: std::io::Error) -> Self {
        LendError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LendError {
    fn from(err: serde_json::Error) -> Self {
        LendError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for LendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LendError::Decode(err.to_string())
        } else {
            LendError::Network(err.to_string())
        }
    }
}

/// Result type alias for operations that can fail with LendError
pub type Result<T> = std::result::Result<T, LendError>;
