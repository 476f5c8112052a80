//! Error types for tradepost-script

use thiserror::Error;

/// Package loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Missing required file: {0}")]
    MissingFile(String),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error(transparent)]
    Core(#[from] tradepost_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
