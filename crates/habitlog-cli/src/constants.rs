//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, store, entry, habit).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments, including rejected entries.
    pub const INVALID_INPUT: i32 = 4;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env {
    pub const CONFIG_PATH: &str = "HABITLOG_CONFIG";
    pub const LOG_FILTER: &str = "HABITLOG_LOG";
}

/// Entries shown by `list` when no window or limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 30;

/// Store file name inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "habitlog.db";
