//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Budget file, period, category, item or register row not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Nothing to undo or redo.
    pub const NOTHING_TO_DO: i32 = 5;

    /// The budget file is damaged or its undo log cannot be replayed.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// A row is still referenced and cannot be deleted.
    pub const IN_USE: i32 = 7;
}

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CASHFLOW_CONFIG";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "CASHFLOW_LOG";
