//! Error types for pebblenote-core

use thiserror::Error;

/// Result type alias using pebblenote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pebblenote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value storage failure (read or write)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input, rejected before any mutation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Explicit remote pull failed (mirror writes never surface here)
    #[error(transparent)]
    Mirror(#[from] crate::mirror::MirrorError),
}
