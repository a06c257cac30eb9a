//! Error types for habitlog core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for habitlog operations.
pub type Result<T> = std::result::Result<T, HabitlogError>;

/// Core error type for habitlog operations.
#[derive(Debug, Error)]
pub enum HabitlogError {
    /// Data validation error (rejected on the write path)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Store file does not exist
    #[error("Store not found")]
    StoreNotFound,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for HabitlogError {
    fn from(err: std::io::Error) -> Self {
        HabitlogError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for HabitlogError {
    fn from(err: serde_json::Error) -> Self {
        HabitlogError::Validation(err.to_string())
    }
}

impl From<rusqlite::Error> for HabitlogError {
    fn from(err: rusqlite::Error) -> Self {
        HabitlogError::Storage(err.to_string())
    }
}
