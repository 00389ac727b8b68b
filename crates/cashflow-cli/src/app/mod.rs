//! Application-level utilities for the Cashflow CLI.
//!
//! This module provides:
//! - Path resolution for config and budget files
//! - The recent-files list kept in the config
//! - The per-invocation context that opens and saves the budget

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{resolve_config_path, set_default_budget};
