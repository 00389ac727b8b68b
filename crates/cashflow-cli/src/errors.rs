//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Core errors are
//! mapped by kind in [`exit_code_for`].

use std::fmt;

use cashflow_core::CashflowError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, budget file, period, category, item)
    NotFound { message: String, hint: String },

    /// A name matches more than one row
    Ambiguous { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::Ambiguous { message, hint } => {
                write!(f, "{}\nHint: {}", message, hint)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
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

    /// Create an Ambiguous error with message and hint.
    pub fn ambiguous(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Ambiguous {
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
            CliError::Ambiguous { .. } | CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

fn core_exit_code(err: &CashflowError) -> i32 {
    match err {
        CashflowError::MissingReference(_) => exit_codes::NOT_FOUND,
        CashflowError::Validation(_)
        | CashflowError::ReadOnlyView { .. }
        | CashflowError::ViewMismatch { .. } => exit_codes::INVALID_INPUT,
        CashflowError::NoOp(_) => exit_codes::NOTHING_TO_DO,
        CashflowError::CategoryInUse(_) | CashflowError::ItemInUse(_) => exit_codes::IN_USE,
        CashflowError::MissingFlow(_) | CashflowError::LogReplay(_) => {
            exit_codes::INTEGRITY_FAILED
        }
        CashflowError::FileIo(_) | CashflowError::Schema(_) | CashflowError::Storage(_) => 1,
    }
}

/// Exit code for an error anywhere in the chain.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.exit_code();
        }
        if let Some(core) = cause.downcast_ref::<CashflowError>() {
            return core_exit_code(core);
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_core::NoOpKind;

    #[test]
    fn test_cli_error_codes() {
        assert_eq!(
            CliError::not_found("no such period", "list periods").exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            CliError::invalid_input("bad").exit_code(),
            exit_codes::INVALID_INPUT
        );
    }

    #[test]
    fn test_core_errors_map_through_anyhow() {
        let err = anyhow::Error::from(CashflowError::NoOp(NoOpKind::NothingToUndo));
        assert_eq!(exit_code_for(&err), exit_codes::NOTHING_TO_DO);

        let err = anyhow::Error::from(CashflowError::CategoryInUse("Food".to_string()))
            .context("category delete failed");
        assert_eq!(exit_code_for(&err), exit_codes::IN_USE);
    }

    #[test]
    fn test_unknown_errors_exit_one() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::ambiguous("\"Misc\" matches 3 items", "use an id instead");
        assert_eq!(
            err.to_string(),
            "\"Misc\" matches 3 items\nHint: use an id instead"
        );
    }
}
