//! # Cashflow Core
//!
//! Core library for Cashflow - a personal budget kept in a single SQLite
//! file, with full undo/redo of every edit.
//!
//! This crate owns the data model, the file format, and the edit history,
//! independent of any front end.
//!
//! ## Architecture
//!
//! - **id**: opaque row identifiers
//! - **schema**: base tables and the metrics/map views
//! - **seed**: the permanent flows and the default category catalog
//! - **command**: reversible commands and per-operation change sets
//! - **journal** / **navigator**: the undo/redo log and its cursor
//! - **validation**: register amount corrections
//! - **session**: the open budget and its operation API
//! - **fs**: fail-safe replacement of budget files
//! - **recent**: most-recently-used file list

pub mod command;
pub mod error;
pub mod fs;
pub mod id;
pub mod journal;
pub mod model;
pub mod navigator;
pub mod recent;
pub mod schema;
pub mod seed;
pub mod session;
pub mod validation;

pub use command::{ChangeSet, Command};
pub use error::{CashflowError, NoOpKind, Result};
pub use id::Id;
pub use model::FlowKind;
pub use recent::RecentFiles;
pub use schema::{Operation, View};
pub use session::{Decision, Outcome, Session, SessionStatus, ViewRow};
pub use validation::{AmountField, Correction};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
