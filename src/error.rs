//! Error types for the trade journal

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-2xx response from the managed backend
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid trade row: {0}")]
    InvalidRow(String),

    #[error("Trade not found: {0}")]
    NotFound(String),

    #[error("Auth error: {0}")]
    Auth(String),
}

impl JournalError {
    /// True when the failure came from talking to the backend
    /// (transport, HTTP status or an undecodable payload).
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            JournalError::Http(_)
                | JournalError::Backend { .. }
                | JournalError::Json(_)
                | JournalError::InvalidRow(_)
        )
    }
}
