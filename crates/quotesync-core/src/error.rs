//! Error types for quotesync-core

use thiserror::Error;

/// Result type alias using quotesync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotesync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected input (empty text or category)
    #[error("Invalid quote: {0}")]
    Validation(String),

    /// Remote fetch or upload failure
    #[error("Network error: {0}")]
    Network(String),

    /// Import payload could not be parsed as an object or array
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// Persisted state could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// No pending conflict at the requested position
    #[error("No pending conflict at index {0}")]
    ConflictNotFound(usize),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl Error {
    /// Whether the failure is transient and the next sync cycle may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
