//! CLI error types for structured error handling.
//!
//! Typed errors map to exit codes; anything else exits with 1.

use std::fmt;

use habitlog_core::HabitlogError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store, entry, habit)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// Store failed its integrity check
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "Integrity check failed: {}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for any error bubbled up to `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    match err.downcast_ref::<HabitlogError>() {
        Some(HabitlogError::Validation(_)) | Some(HabitlogError::InvalidInput(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(HabitlogError::NotFound(_)) | Some(HabitlogError::StoreNotFound) => {
            exit_codes::NOT_FOUND
        }
        _ => 1,
    }
}
