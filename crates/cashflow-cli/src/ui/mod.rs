//! UI primitives for the Cashflow CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens, styles, symbols
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: Amounts, ids, truncation
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{self, Column};
//!
//! let ui = ctx.ui();
//! if ui.mode.is_json() {
//!     return output::print_json(&rows);
//! }
//!
//! ui::print(ui, &ui::header(ui, "summary", Some(&period.name)));
//! ui::print(ui, &ui::table(ui, &columns, &rows));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::{OutputFlags, UiContext};
pub use theme::Badge;

pub use render::{
    badge, blank_line, divider, header, header_with_context, hint, kv, print, print_error,
    receipt, simple_table, table, Column,
};

pub use format::{format_amount, short_id, truncate};
