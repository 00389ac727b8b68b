//! Budget file commands: new, save-as, backup, export, recent.

use std::path::Path;

use cashflow_core::Session;
use serde_json::json;

use crate::app::{resolve_config_path, set_default_budget, AppContext};
use crate::cli::{BackupArgs, ExportArgs, NewArgs, SaveAsArgs};
use crate::config::read_config_or_default;
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::{self, format::format_modified, Column};

fn path_text(path: &Path) -> String {
    path.display().to_string()
}

pub fn handle_new(ctx: &AppContext, args: &NewArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "{} already exists\nHint: Pass --force to replace it",
            args.path.display()
        ))
        .into());
    }

    let mut session = Session::new_database()?;
    session.save_as(&args.path)?;
    ctx.remember(&args.path);
    let is_default = set_default_budget(&args.path, args.default)?;

    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&json!({
            "status": "ok",
            "action": "new",
            "path": args.path,
            "default": is_default,
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }
    let mut items = vec![("File", path_text(&args.path))];
    if is_default {
        items.push(("Default", "yes".to_string()));
    }
    ui::print(ui, &ui::receipt(ui, "Created budget", &items));
    if !is_default {
        ui::print(
            ui,
            &ui::hint(
                ui,
                &format!("cashflow --file {} period add <NAME>", args.path.display()),
            ),
        );
    }
    Ok(())
}

pub fn handle_save_as(ctx: &AppContext, args: &SaveAsArgs) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    session.save_as(&args.path)?;
    ctx.remember(&args.path);

    let ui = ctx.ui();
    if ui.mode.is_json() {
        return print_json(&json!({
            "status": "ok",
            "action": "save-as",
            "path": args.path,
        }));
    }
    if !ctx.quiet() {
        ui::print(
            ui,
            &ui::receipt(ui, "Saved budget", &[("File", path_text(&args.path))]),
        );
    }
    Ok(())
}

pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let ui = ctx.ui();
    if ui.is_interactive() && !ctx.quiet() && !args.yes {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Back up budget to {}?", args.destination.display()))
            .default(true)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Backup cancelled"));
        }
    }
    session.backup_as(&args.destination)?;

    if ui.mode.is_json() {
        return print_json(&json!({
            "status": "ok",
            "action": "backup",
            "path": args.destination,
        }));
    }
    if !ctx.quiet() {
        ui::print(
            ui,
            &ui::receipt(
                ui,
                "Backed up budget",
                &[("File", path_text(&args.destination))],
            ),
        );
    }
    Ok(())
}

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let contents = session.contents()?;
    let text = serde_json::to_string_pretty(&contents)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                anyhow::anyhow!("Failed to write export {}: {}", path.display(), e)
            })?;
            let ui = ctx.ui();
            if !ctx.quiet() && !ui.mode.is_json() {
                ui::print(
                    ui,
                    &ui::receipt(ui, "Exported budget", &[("File", path_text(path))]),
                );
            }
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn handle_recent(ctx: &AppContext) -> anyhow::Result<()> {
    let config = read_config_or_default(&resolve_config_path()?)?;
    let files = config.recent.files();
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(files);
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "recent", None));
    if files.is_empty() {
        ui::print(ui, &ui::hint(ui, "cashflow new <PATH>"));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|path| {
            let modified = std::fs::metadata(path)
                .and_then(|meta| meta.modified())
                .map(|time| format_modified(time, ui.mode.is_pretty()))
                .unwrap_or_else(|_| "missing".to_string());
            vec![path_text(path), modified]
        })
        .collect();
    let columns = [Column::new("File"), Column::new("Modified")];
    ui::print(ui, &ui::simple_table(ui, &columns, &rows));
    Ok(())
}
