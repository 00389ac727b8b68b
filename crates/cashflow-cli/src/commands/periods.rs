//! Period commands and the per-period summary.

use serde_json::json;

use crate::app::AppContext;
use crate::cli::{CloneArgs, PeriodCommand, SummaryArgs};
use crate::output::print_json;
use crate::ui::{self, format_amount, short_id, Column};

use super::{report_outcome, resolve};

pub fn handle_period(ctx: &AppContext, command: &PeriodCommand) -> anyhow::Result<()> {
    match command {
        PeriodCommand::Add { name } => {
            let outcome = ctx.edit(|session| Ok(session.add_period(name)?))?;
            report_outcome(
                ctx,
                "period add",
                "Added period",
                &[("Period", name.trim().to_string())],
                &outcome,
            )
        }
        PeriodCommand::Rename { period, name } => {
            let (outcome, old) = ctx.edit(|session| {
                let (id, old) = resolve::period(session, period)?;
                Ok((session.rename_period(&id, name)?, old))
            })?;
            report_outcome(
                ctx,
                "period rename",
                "Renamed period",
                &[("From", old), ("To", name.trim().to_string())],
                &outcome,
            )
        }
        PeriodCommand::Delete { period } => {
            let (outcome, name, removed) = ctx.edit(|session| {
                let (id, name) = resolve::period(session, period)?;
                let removed = session.register_entries(&id)?.len();
                Ok((session.delete_period(&id)?, name, removed))
            })?;
            report_outcome(
                ctx,
                "period delete",
                "Deleted period",
                &[("Period", name), ("Register Rows", removed.to_string())],
                &outcome,
            )
        }
        PeriodCommand::Clone(args) => handle_clone(ctx, args),
        PeriodCommand::List => handle_list(ctx),
    }
}

fn handle_clone(ctx: &AppContext, args: &CloneArgs) -> anyhow::Result<()> {
    let (outcome, source, target) = ctx.edit(|session| {
        let (source_id, source) = resolve::period(session, &args.source)?;
        let outcome = match &args.into {
            Some(into) => {
                let (target_id, _) = resolve::period(session, into)?;
                session.clone_period(&source_id, &target_id)?
            }
            None => session.clone_period_as(&source_id, args.name.as_deref())?,
        };
        let target = match &outcome.row_id {
            Some(id) => session.period(id)?.name,
            None => String::new(),
        };
        Ok((outcome, source, target))
    })?;
    report_outcome(
        ctx,
        "period clone",
        "Cloned period",
        &[("From", source), ("Into", target)],
        &outcome,
    )
}

fn handle_list(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let periods = session.periods()?;
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&periods);
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "periods", None));
    if periods.is_empty() {
        ui::print(ui, &ui::hint(ui, "cashflow period add <NAME>"));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = periods
        .iter()
        .map(|p| {
            vec![
                short_id(&p.period_id),
                p.period_name.clone(),
                format_amount(p.budget_balance),
                format_amount(p.actual_balance),
                format_amount(p.difference_balance),
            ]
        })
        .collect();
    let columns = [
        Column::new("Id"),
        Column::new("Period"),
        Column::amount("Budget"),
        Column::amount("Actual"),
        Column::amount("Difference"),
    ];
    ui::print(ui, &ui::simple_table(ui, &columns, &rows));
    Ok(())
}

pub fn handle_summary(ctx: &AppContext, args: &SummaryArgs) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let (period_id, name) = resolve::period(&session, &args.period)?;
    let flows = session.flow_metrics(&period_id)?;
    let categories = session.category_metrics(&period_id)?;
    let register = session.register_metrics(&period_id)?;
    let balance = session
        .periods()?
        .into_iter()
        .find(|p| p.period_id == period_id);
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&json!({
            "period": { "id": period_id, "name": name },
            "balance": balance,
            "flows": flows,
            "categories": categories,
            "register": register,
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "summary", Some(&name)));
    if let Some(balance) = &balance {
        ui::print(ui, &ui::kv(ui, "Budget", &format_amount(balance.budget_balance)));
        ui::print(ui, &ui::kv(ui, "Actual", &format_amount(balance.actual_balance)));
        ui::print(
            ui,
            &ui::kv(ui, "Difference", &format_amount(balance.difference_balance)),
        );
    }
    if register.is_empty() {
        ui::print(
            ui,
            &ui::hint(ui, &format!("cashflow register fill \"{}\"", name)),
        );
        return Ok(());
    }

    ui::blank_line(ui);
    let rows: Vec<Vec<String>> = flows
        .iter()
        .map(|f| {
            vec![
                f.flow_name.clone(),
                format_amount(f.budget),
                format_amount(f.actual),
                format_amount(f.difference),
            ]
        })
        .collect();
    let columns = [
        Column::new("Flow"),
        Column::amount("Budget"),
        Column::amount("Actual"),
        Column::amount("Difference"),
    ];
    ui::print(ui, &ui::table(ui, &columns, &rows));

    ui::print(ui, &ui::divider(ui));
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                c.flow_name.clone(),
                c.category_name.clone(),
                format_amount(c.budget),
                format_amount(c.actual),
                format_amount(c.difference),
            ]
        })
        .collect();
    let columns = [
        Column::new("Flow"),
        Column::new("Category"),
        Column::amount("Budget"),
        Column::amount("Actual"),
        Column::amount("Difference"),
    ];
    ui::print(ui, &ui::table(ui, &columns, &rows));
    Ok(())
}
