//! Category and item commands.

use cashflow_core::{FlowKind, Id, Session};

use crate::app::AppContext;
use crate::cli::{CategoryCommand, ItemCommand};
use crate::output::print_json;
use crate::ui::{self, short_id, Column};

use super::{report_outcome, resolve};

fn flow_of_category(session: &Session, category_id: &Id) -> anyhow::Result<FlowKind> {
    let category = session.category(category_id)?;
    Ok(if category.flow_id == session.flows().in_flow {
        FlowKind::In
    } else {
        FlowKind::Out
    })
}

pub fn handle_category(ctx: &AppContext, command: &CategoryCommand) -> anyhow::Result<()> {
    match command {
        CategoryCommand::Add { name, flow } => {
            let outcome = ctx.edit(|session| Ok(session.add_category(name, *flow)?))?;
            report_outcome(
                ctx,
                "category add",
                "Added category",
                &[("Category", name.trim().to_string()), ("Flow", flow.to_string())],
                &outcome,
            )
        }
        CategoryCommand::Rename {
            category,
            name,
            flow,
        } => {
            let (outcome, old, flow) = ctx.edit(|session| {
                let (id, old) = resolve::category(session, category)?;
                let flow = match flow {
                    Some(flow) => *flow,
                    None => flow_of_category(session, &id)?,
                };
                Ok((session.update_category(&id, name, flow)?, old, flow))
            })?;
            report_outcome(
                ctx,
                "category rename",
                "Updated category",
                &[
                    ("From", old),
                    ("To", name.trim().to_string()),
                    ("Flow", flow.to_string()),
                ],
                &outcome,
            )
        }
        CategoryCommand::Delete { category } => {
            let (outcome, name) = ctx.edit(|session| {
                let (id, name) = resolve::category(session, category)?;
                Ok((session.delete_category(&id)?, name))
            })?;
            report_outcome(
                ctx,
                "category delete",
                "Deleted category",
                &[("Category", name)],
                &outcome,
            )
        }
        CategoryCommand::List { flow } => list_categories(ctx, *flow),
    }
}

fn list_categories(ctx: &AppContext, flow: Option<FlowKind>) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let categories = session.category_map(flow)?;
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&categories);
    }
    if ctx.quiet() {
        return Ok(());
    }

    let context = flow.map(|f| f.to_string());
    ui::print(ui, &ui::header(ui, "categories", context.as_deref()));
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                short_id(&c.category_id),
                c.flow_name.clone(),
                c.category_name.clone(),
            ]
        })
        .collect();
    let columns = [Column::new("Id"), Column::new("Flow"), Column::new("Category")];
    ui::print(ui, &ui::simple_table(ui, &columns, &rows));
    Ok(())
}

pub fn handle_item(ctx: &AppContext, command: &ItemCommand) -> anyhow::Result<()> {
    match command {
        ItemCommand::Add { name, category } => {
            let (outcome, category) = ctx.edit(|session| {
                let (category_id, category) = resolve::category(session, category)?;
                Ok((session.add_item(name, &category_id)?, category))
            })?;
            report_outcome(
                ctx,
                "item add",
                "Added item",
                &[("Item", name.trim().to_string()), ("Category", category)],
                &outcome,
            )
        }
        ItemCommand::Rename {
            item,
            name,
            category,
        } => {
            let (outcome, old) = ctx.edit(|session| {
                let (id, old) = resolve::item(session, item)?;
                let category_id = match category {
                    Some(category) => resolve::category(session, category)?.0,
                    None => session.item(&id)?.category_id,
                };
                Ok((session.update_item(&id, name, &category_id)?, old))
            })?;
            report_outcome(
                ctx,
                "item rename",
                "Updated item",
                &[("From", old), ("To", name.trim().to_string())],
                &outcome,
            )
        }
        ItemCommand::Delete { item } => {
            let (outcome, label) = ctx.edit(|session| {
                let (id, label) = resolve::item(session, item)?;
                Ok((session.delete_item(&id)?, label))
            })?;
            report_outcome(ctx, "item delete", "Deleted item", &[("Item", label)], &outcome)
        }
        ItemCommand::List { flow, category } => list_items(ctx, *flow, category.as_deref()),
    }
}

fn list_items(
    ctx: &AppContext,
    flow: Option<FlowKind>,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let category_id = match category {
        Some(category) => Some(resolve::category(&session, category)?.0),
        None => None,
    };
    let items: Vec<_> = session
        .item_map(flow)?
        .into_iter()
        .filter(|row| category_id.as_ref().map_or(true, |id| row.category_id == *id))
        .collect();
    let ui = ctx.ui();

    if ui.mode.is_json() {
        return print_json(&items);
    }
    if ctx.quiet() {
        return Ok(());
    }

    ui::print(ui, &ui::header(ui, "items", category));
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                short_id(&i.item_id),
                i.flow_name.clone(),
                i.category_name.clone(),
                i.item_name.clone(),
            ]
        })
        .collect();
    let columns = [
        Column::new("Id"),
        Column::new("Flow"),
        Column::new("Category"),
        Column::new("Item"),
    ];
    ui::print(ui, &ui::simple_table(ui, &columns, &rows));
    Ok(())
}
