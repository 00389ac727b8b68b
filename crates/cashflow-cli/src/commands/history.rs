//! Status, undo, redo and the change history.

use cashflow_core::{CashflowError, Outcome};
use serde_json::json;

use crate::app::AppContext;
use crate::cli::StepArgs;
use crate::output::print_json;
use crate::ui::theme::{CURSOR, SAVED};
use crate::ui::{self, Column};

pub fn handle_status(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let status = session.status();
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&status);
    }
    if ctx.quiet() {
        return Ok(());
    }

    let file = status
        .current_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    ui::print(ui, &ui::header_with_context(ui, "status", None, Some(&file)));
    ui::print(
        ui,
        &ui::kv(
            ui,
            "Position",
            &format!("{} of {}", status.log_index, status.log_count),
        ),
    );
    ui::print(ui, &ui::kv(ui, "Can undo", yes_no(!status.at_start)));
    ui::print(ui, &ui::kv(ui, "Can redo", yes_no(!status.at_end)));
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

enum Direction {
    Undo,
    Redo,
}

fn step(ctx: &AppContext, args: &StepArgs, direction: Direction) -> anyhow::Result<()> {
    let (label, done_label) = match direction {
        Direction::Undo => ("undo", "Undid"),
        Direction::Redo => ("redo", "Redid"),
    };

    let (outcomes, boundary) = ctx.edit(|session| {
        let mut outcomes: Vec<Outcome> = Vec::new();
        let mut boundary = None;
        for _ in 0..args.steps.max(1) {
            let result = match direction {
                Direction::Undo => session.undo(),
                Direction::Redo => session.redo(),
            };
            match result {
                Ok(outcome) => outcomes.push(outcome),
                // stepping past the first boundary is not an error
                Err(CashflowError::NoOp(kind)) if !outcomes.is_empty() => {
                    boundary = Some(kind);
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok((outcomes, boundary))
    })?;

    let log_index = outcomes.last().map(|o| o.log_index).unwrap_or_default();
    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&json!({
            "status": "ok",
            "action": label,
            "steps": outcomes.len(),
            "log_index": log_index,
            "stopped": boundary.map(|kind| kind.to_string()),
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    let noun = if outcomes.len() == 1 { "change" } else { "changes" };
    ui::print(
        ui,
        &ui::receipt(
            ui,
            &format!("{} {} {}", done_label, outcomes.len(), noun),
            &[("Log Index", log_index.to_string())],
        ),
    );
    if let Some(kind) = boundary {
        ui::print(ui, &ui::badge(ui, ui::Badge::Info, &format!("Stopped: {}", kind)));
    }
    Ok(())
}

pub fn handle_undo(ctx: &AppContext, args: &StepArgs) -> anyhow::Result<()> {
    step(ctx, args, Direction::Undo)
}

pub fn handle_redo(ctx: &AppContext, args: &StepArgs) -> anyhow::Result<()> {
    step(ctx, args, Direction::Redo)
}

pub fn handle_history(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let entries = session.history()?;
    let status = session.status();
    let ui = ctx.ui();

    if ui.mode.is_json() {
        let rows: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                json!({
                    "rank": i + 1,
                    "id": entry.id,
                    "applied": i < status.log_index,
                    "description": entry.redo.describe(),
                    "redo": entry.redo,
                    "undo": entry.undo,
                })
            })
            .collect();
        return print_json(&json!({
            "log_index": status.log_index,
            "entries": rows,
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "history", None));
    if entries.is_empty() {
        ui::print(ui, &ui::hint(ui, "No changes yet"));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rank = i + 1;
            let mut marker = String::new();
            if rank == status.log_index {
                marker.push_str(CURSOR.get(ui.unicode));
            }
            if rank == status.log_index && status.at_saved {
                marker.push_str(SAVED.get(ui.unicode));
            }
            vec![
                marker,
                rank.to_string(),
                if rank <= status.log_index {
                    "applied".to_string()
                } else {
                    "undone".to_string()
                },
                entry.redo.describe(),
            ]
        })
        .collect();

    let columns = [
        Column::new(""),
        Column::amount("#"),
        Column::new("State"),
        Column::new("Change"),
    ];
    ui::print(ui, &ui::simple_table(ui, &columns, &rows));
    Ok(())
}
