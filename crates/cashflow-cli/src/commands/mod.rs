//! Subcommand handlers.
//!
//! Each handler takes the [`AppContext`] and its parsed arguments, opens
//! the budget, and prints in the mode the context resolved.

pub mod catalog;
pub mod files;
pub mod history;
pub mod misc;
pub mod periods;
pub mod register;
pub mod resolve;

use cashflow_core::Outcome;

use crate::app::AppContext;
use crate::output::{correction_text, outcome_json, print_json};
use crate::ui::{self, Badge};

/// Print the result of an edit: a receipt plus any amount corrections.
pub(crate) fn report_outcome(
    ctx: &AppContext,
    action: &str,
    title: &str,
    items: &[(&str, String)],
    outcome: &Outcome,
) -> anyhow::Result<()> {
    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&outcome_json(action, outcome));
    }

    for correction in &outcome.corrections {
        eprintln!(
            "{}",
            ui::badge(ui, Badge::Warn, &correction_text(correction))
        );
    }
    if ctx.quiet() {
        return Ok(());
    }

    let mut lines: Vec<(&str, String)> = items.to_vec();
    lines.push(("Log Index", outcome.log_index.to_string()));
    ui::print(ui, &ui::receipt(ui, title, &lines));
    Ok(())
}

/// Print the result of a bulk edit that logged one change per row.
pub(crate) fn report_bulk(
    ctx: &AppContext,
    action: &str,
    title: &str,
    outcomes: &[Outcome],
) -> anyhow::Result<()> {
    let ui = ctx.ui();
    if ui.mode.is_json() {
        let rows: Vec<_> = outcomes.iter().map(|o| outcome_json(action, o)).collect();
        return print_json(&rows);
    }
    if ctx.quiet() {
        return Ok(());
    }

    let mut items = vec![("Changes", outcomes.len().to_string())];
    if let Some(last) = outcomes.last() {
        items.push(("Log Index", last.log_index.to_string()));
    }
    ui::print(ui, &ui::receipt(ui, title, &items));
    Ok(())
}
