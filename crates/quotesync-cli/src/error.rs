use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotesync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quote text provided")]
    EmptyText,
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Import input is empty")]
    EmptyImport,
    #[error("Sync failed: {0}")]
    SyncFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to resolve the {0} directory; pass it explicitly")]
    MissingDirectory(&'static str),
}
