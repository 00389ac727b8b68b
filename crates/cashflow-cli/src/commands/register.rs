//! Register commands: what is budgeted and spent per item in a period.

use cashflow_core::model::{RegisterEntry, UnusedMetrics};
use cashflow_core::{Decision, Id, Session};

use crate::app::AppContext;
use crate::cli::RegisterCommand;
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::{self, format_amount, truncate, Column};

use super::{report_bulk, report_outcome, resolve};

/// Answers of the per-row prompt, in menu order.
const CHOICES: [&str; 4] = ["Yes", "No", "Yes to all", "Stop"];

/// Per-row prompt with a "yes to all" that sticks for the rest of the loop.
struct Prompter {
    interactive: bool,
    all: bool,
}

impl Prompter {
    fn new(interactive: bool, all: bool) -> Self {
        Self { interactive, all }
    }

    /// Without a terminal, rows that would need an answer are skipped.
    fn ask(&mut self, prompt: &str) -> Decision {
        if self.all {
            return Decision::Proceed;
        }
        if !self.interactive {
            return Decision::Skip;
        }
        let choice = dialoguer::Select::new()
            .with_prompt(prompt)
            .items(&CHOICES)
            .default(0)
            .interact_opt();
        match choice {
            Ok(Some(0)) => Decision::Proceed,
            Ok(Some(1)) => Decision::Skip,
            Ok(Some(2)) => {
                self.all = true;
                Decision::Proceed
            }
            _ => Decision::Stop,
        }
    }
}

fn describe_entry(session: &Session, entry: &RegisterEntry) -> String {
    let item = session
        .item(&entry.item_id)
        .map(|item| item.name)
        .unwrap_or_else(|_| entry.item_id.to_string());
    format!(
        "Remove {} (budget {}, actual {}{})?",
        item,
        format_amount(entry.budget),
        format_amount(entry.actual),
        if entry.note.is_empty() {
            String::new()
        } else {
            format!(", note \"{}\"", truncate(&entry.note, 30))
        }
    )
}

fn describe_unused(unused: &UnusedMetrics) -> String {
    format!(
        "Register {} / {} / {}?",
        unused.flow_name, unused.category_name, unused.item_name
    )
}

/// The register row of `item` in `period`.
fn registered(
    session: &Session,
    period: &str,
    item: &str,
) -> anyhow::Result<(RegisterEntry, String, String)> {
    let (period_id, period_name) = resolve::period(session, period)?;
    let (item_id, item_label) = resolve::item(session, item)?;
    let entry = session.find_register(&period_id, &item_id)?.ok_or_else(|| {
        CliError::not_found(
            format!("{} is not registered in {}", item_label, period_name),
            format!("cashflow register add \"{}\" \"{}\"", period_name, item),
        )
    })?;
    Ok((entry, period_name, item_label))
}

pub fn handle_register(ctx: &AppContext, command: &RegisterCommand) -> anyhow::Result<()> {
    match command {
        RegisterCommand::Add {
            period,
            item,
            budget,
            actual,
            note,
        } => {
            let (outcome, period, item) = ctx.edit(|session| {
                let (period_id, period) = resolve::period(session, period)?;
                let (item_id, item) = resolve::item(session, item)?;
                let outcome = session.register_item(&period_id, &item_id, *budget, *actual, note)?;
                Ok((outcome, period, item))
            })?;
            report_outcome(
                ctx,
                "register add",
                "Registered item",
                &[("Period", period), ("Item", item)],
                &outcome,
            )
        }
        RegisterCommand::Set {
            period,
            item,
            budget,
            actual,
            note,
        } => {
            if budget.is_none() && actual.is_none() && note.is_none() {
                return Err(CliError::invalid_input(
                    "Nothing to change: pass --budget, --actual or --note",
                )
                .into());
            }
            let (outcome, period, item) = ctx.edit(|session| {
                let (entry, period, item) = registered(session, period, item)?;
                let outcome = session.update_register(
                    &entry.id,
                    budget.unwrap_or(entry.budget),
                    actual.unwrap_or(entry.actual),
                    note.as_deref().unwrap_or(&entry.note),
                )?;
                Ok((outcome, period, item))
            })?;
            report_outcome(
                ctx,
                "register set",
                "Updated register",
                &[("Period", period), ("Item", item)],
                &outcome,
            )
        }
        RegisterCommand::Remove {
            period,
            items,
            all,
            yes,
        } => {
            let interactive = ctx.ui().is_interactive();
            let outcomes = ctx.edit(|session| {
                let ids: Vec<Id> = if *all {
                    let (period_id, _) = resolve::period(session, period)?;
                    session
                        .register_entries(&period_id)?
                        .into_iter()
                        .map(|entry| entry.id)
                        .collect()
                } else {
                    items
                        .iter()
                        .map(|item| {
                            registered(session, period, item).map(|(entry, _, _)| entry.id)
                        })
                        .collect::<anyhow::Result<_>>()?
                };

                let mut prompter = Prompter::new(interactive, *yes);
                let describe: Vec<(Id, String)> = ids
                    .iter()
                    .filter_map(|id| session.register_entry(id).ok())
                    .map(|entry| (entry.id.clone(), describe_entry(session, &entry)))
                    .collect();
                Ok(session.unregister_all(&ids, |entry| {
                    let prompt = describe
                        .iter()
                        .find(|(id, _)| *id == entry.id)
                        .map(|(_, text)| text.as_str())
                        .unwrap_or("Remove this entry?");
                    prompter.ask(prompt)
                })?)
            })?;
            report_bulk(ctx, "register remove", "Removed register rows", &outcomes)
        }
        RegisterCommand::List { period } => list_register(ctx, period),
        RegisterCommand::Fill { period, yes } => {
            let interactive = ctx.ui().is_interactive();
            if !interactive && !*yes {
                return Err(CliError::invalid_input(
                    "register fill needs a terminal to ask about each item; \
                     pass --yes to register them all",
                )
                .into());
            }
            let outcomes = ctx.edit(|session| {
                let (period_id, _) = resolve::period(session, period)?;
                let mut prompter = Prompter::new(interactive, *yes);
                Ok(session.register_unregistered(&period_id, |unused| {
                    prompter.ask(&describe_unused(unused))
                })?)
            })?;
            report_bulk(ctx, "register fill", "Registered items", &outcomes)
        }
    }
}

fn list_register(ctx: &AppContext, period: &str) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let (period_id, name) = resolve::period(&session, period)?;
    let rows = session.register_metrics(&period_id)?;
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&rows);
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "register", Some(&name)));
    if rows.is_empty() {
        ui::print(
            ui,
            &ui::hint(ui, &format!("cashflow register fill \"{}\"", name)),
        );
        return Ok(());
    }
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.flow_name.clone(),
                r.category_name.clone(),
                r.item_name.clone(),
                format_amount(r.budget),
                format_amount(r.actual),
                format_amount(r.difference),
                ui::format::single_line(&r.note),
            ]
        })
        .collect();
    let columns = [
        Column::new("Flow"),
        Column::new("Category"),
        Column::new("Item"),
        Column::amount("Budget"),
        Column::amount("Actual"),
        Column::amount("Difference"),
        Column::new("Note"),
    ];
    ui::print(ui, &ui::table(ui, &columns, &table_rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompter_without_terminal_skips() {
        let mut prompter = Prompter::new(false, false);
        assert_eq!(prompter.ask("Remove Rent?"), Decision::Skip);
    }

    #[test]
    fn test_prompter_yes_to_all() {
        let mut prompter = Prompter::new(false, true);
        assert_eq!(prompter.ask("Remove Rent?"), Decision::Proceed);
        assert_eq!(prompter.ask("Remove Water?"), Decision::Proceed);
    }

    #[test]
    fn test_describe_entry_mentions_note() {
        let mut session = Session::new_database().unwrap();
        let period = session.add_period("Jan").unwrap().row_id.unwrap();
        let (item, _) = resolve::item(&session, "Food/Grocery").unwrap();
        let id = session
            .register_item(&period, &item, 1200.0, 20.0, "weekly shop")
            .unwrap()
            .row_id
            .unwrap();
        let entry = session.register_entry(&id).unwrap();
        let text = describe_entry(&session, &entry);
        assert_eq!(
            text,
            "Remove Grocery (budget 1,200.00, actual 20.00, note \"weekly shop\")?"
        );
    }
}
