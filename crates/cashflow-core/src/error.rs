//! Error types for Cashflow core operations.
//!
//! Every failure an operation can report is one variant of [`CashflowError`].
//! Errors are descriptive at the core level; the CLI layer maps them to
//! user-facing messages and exit codes.

use std::fmt;

use thiserror::Error;

/// Result type alias for Cashflow operations.
pub type Result<T> = std::result::Result<T, CashflowError>;

/// Which end of the undo/redo log an operation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpKind {
    /// Undo requested with nothing applied.
    NothingToUndo,
    /// Redo requested with nothing left to re-apply.
    NothingToRedo,
}

impl fmt::Display for NoOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOpKind::NothingToUndo => write!(f, "nothing to undo"),
            NoOpKind::NothingToRedo => write!(f, "nothing to redo"),
        }
    }
}

/// Core error type for Cashflow operations.
#[derive(Debug, Error)]
pub enum CashflowError {
    /// Schema creation failed
    #[error("Schema error: {0}")]
    Schema(String),

    /// An expected period, category, item or register row is absent
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// One of the two permanent flows is absent from a budget file
    #[error("Missing flow: the {0} flow is not present in the budget file")]
    MissingFlow(String),

    /// An undo or redo change set could not be replayed
    #[error("Log replay error: {0}")]
    LogReplay(String),

    /// Copy, remove or open failure on the filesystem
    #[error("File error: {0}")]
    FileIo(String),

    /// Input that cannot be corrected automatically
    #[error("Validation error: {0}")]
    Validation(String),

    /// Undo at the start of the log or redo at its end
    #[error("No-op: {0}")]
    NoOp(NoOpKind),

    /// Category still has items mapped to it
    #[error("The category {0} is in use. It cannot be deleted.")]
    CategoryInUse(String),

    /// Item is still registered in some period
    #[error("The item {0} is in use. It cannot be deleted.")]
    ItemInUse(String),

    /// The view does not accept the requested operation
    #[error("View {view} does not accept {operation}")]
    ReadOnlyView {
        view: &'static str,
        operation: &'static str,
    },

    /// The row shape does not belong to the view
    #[error("View {view} cannot take a {row} row")]
    ViewMismatch { view: &'static str, row: &'static str },

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CashflowError {
    /// True for boundary conditions (undo at start, redo at end).
    pub fn is_noop(&self) -> bool {
        matches!(self, CashflowError::NoOp(_))
    }
}

impl From<rusqlite::Error> for CashflowError {
    fn from(err: rusqlite::Error) -> Self {
        CashflowError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        CashflowError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for CashflowError {
    fn from(err: serde_json::Error) -> Self {
        CashflowError::LogReplay(format!("Undo log entry is unreadable: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_is_flagged() {
        assert!(CashflowError::NoOp(NoOpKind::NothingToUndo).is_noop());
        assert!(!CashflowError::Schema("x".to_string()).is_noop());
    }

    #[test]
    fn test_messages() {
        let err = CashflowError::CategoryInUse("Food".to_string());
        assert_eq!(
            err.to_string(),
            "The category Food is in use. It cannot be deleted."
        );
        let err = CashflowError::NoOp(NoOpKind::NothingToRedo);
        assert_eq!(err.to_string(), "No-op: nothing to redo");
    }
}
