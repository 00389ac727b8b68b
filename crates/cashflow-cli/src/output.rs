//! JSON output helpers for the CLI.

use cashflow_core::{Correction, Outcome};
use serde::Serialize;
use serde_json::{json, Value};

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON body for the result of an edit.
pub fn outcome_json(action: &str, outcome: &Outcome) -> Value {
    json!({
        "status": "ok",
        "action": action,
        "row_id": outcome.row_id,
        "log_index": outcome.log_index,
        "corrections": outcome.corrections,
        "refresh": outcome.refresh.iter().map(|view| view.as_str()).collect::<Vec<_>>(),
    })
}

/// One line describing a correction applied to an amount.
pub fn correction_text(correction: &Correction) -> String {
    format!(
        "{:?} changed from {:.2} to {:.2}: {}",
        correction.field, correction.from, correction.to, correction.reason
    )
}
