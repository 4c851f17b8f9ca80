//! Error types for diarydrift-core

use thiserror::Error;

/// Result type alias using diarydrift-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in diarydrift-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Form validation failure, shown to the user as-is
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Photo or voice note could not be processed
    #[error("Media error: {0}")]
    Media(String),
}
