//! Edits addressed to a view, the way a table editor submits them.

use serde::{Deserialize, Serialize};

use super::{Outcome, Session};
use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::{Category, FlowKind, Item, Period, RegisterEntry};
use crate::schema::{Operation, View};

/// A row submitted to [`Session::mutate_via_view`].
///
/// For updates and deletes `id` names the existing row; for inserts it is
/// the id the new row gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewRow {
    /// `periodMetricsView`
    Period { id: Id, name: String },
    /// `registerMetricsView`; only amounts and note are editable.
    Register(RegisterEntry),
    /// Category map views. The in/out views supply their own flow.
    Category {
        id: Id,
        name: String,
        flow: Option<FlowKind>,
    },
    /// Item map views.
    Item {
        id: Id,
        name: String,
        category_id: Id,
    },
}

impl ViewRow {
    pub fn kind(&self) -> &'static str {
        match self {
            ViewRow::Period { .. } => "period",
            ViewRow::Register(_) => "register",
            ViewRow::Category { .. } => "category",
            ViewRow::Item { .. } => "item",
        }
    }
}

fn view_flow(view: View) -> Option<FlowKind> {
    match view {
        View::InCategoryMap | View::InItemMap => Some(FlowKind::In),
        View::OutCategoryMap | View::OutItemMap => Some(FlowKind::Out),
        _ => None,
    }
}

impl Session {
    /// Apply an insert, update or delete submitted through a view.
    ///
    /// # Errors
    ///
    /// - `CashflowError::ReadOnlyView` for the aggregate views; nothing is
    ///   logged.
    /// - `CashflowError::ViewMismatch` when the row kind does not belong to
    ///   the view.
    /// - Anything the matching typed edit can return.
    pub fn mutate_via_view(
        &mut self,
        view: View,
        operation: Operation,
        row: ViewRow,
    ) -> Result<Outcome> {
        if !view.accepts(operation) {
            return Err(CashflowError::ReadOnlyView {
                view: view.as_str(),
                operation: operation.as_str(),
            });
        }

        let mut outcome = match (view, row) {
            (View::PeriodMetrics, ViewRow::Period { id, name }) => match operation {
                Operation::Insert => self.insert_period(Period { id, name }),
                Operation::Update => self.rename_period(&id, &name),
                Operation::Delete => self.delete_period(&id),
            },
            (View::RegisterMetrics, ViewRow::Register(entry)) => match operation {
                Operation::Insert => self.insert_register(entry),
                Operation::Update => {
                    self.update_register(&entry.id, entry.budget, entry.actual, &entry.note)
                }
                Operation::Delete => self.unregister(&entry.id),
            },
            (
                View::CategoryMap | View::InCategoryMap | View::OutCategoryMap,
                ViewRow::Category { id, name, flow },
            ) => self.category_via_view(view, operation, id, name, flow),
            (
                View::ItemMap | View::InItemMap | View::OutItemMap,
                ViewRow::Item {
                    id,
                    name,
                    category_id,
                },
            ) => self.item_via_view(view, operation, id, name, category_id),
            (view, row) => Err(CashflowError::ViewMismatch {
                view: view.as_str(),
                row: row.kind(),
            }),
        }?;

        outcome.refresh = view.dependents();
        Ok(outcome)
    }

    fn category_via_view(
        &mut self,
        view: View,
        operation: Operation,
        id: Id,
        name: String,
        flow: Option<FlowKind>,
    ) -> Result<Outcome> {
        let forced = view_flow(view);
        if let (Some(forced), Some(given)) = (forced, flow) {
            if forced != given {
                return Err(CashflowError::Validation(format!(
                    "{} only holds {} categories",
                    view, forced
                )));
            }
        }

        match operation {
            Operation::Insert => {
                let kind = forced.or(flow).ok_or_else(|| {
                    CashflowError::Validation(format!("New category \"{}\" needs a flow", name))
                })?;
                self.insert_category(Category {
                    id,
                    name,
                    flow_id: self.flows.get(kind).clone(),
                })
            }
            Operation::Update => {
                let existing = self.category(&id)?;
                self.ensure_category_flow(view, &existing)?;
                let kind = match forced.or(flow) {
                    Some(kind) => kind,
                    None => self.flow_kind_of(&existing),
                };
                self.update_category(&id, &name, kind)
            }
            Operation::Delete => {
                let existing = self.category(&id)?;
                self.ensure_category_flow(view, &existing)?;
                self.delete_category(&id)
            }
        }
    }

    fn item_via_view(
        &mut self,
        view: View,
        operation: Operation,
        id: Id,
        name: String,
        category_id: Id,
    ) -> Result<Outcome> {
        match operation {
            Operation::Insert => {
                let category = self.category(&category_id)?;
                self.ensure_category_flow(view, &category)?;
                self.insert_item(Item {
                    id,
                    name,
                    category_id,
                })
            }
            Operation::Update => {
                let category = self.category(&category_id)?;
                self.ensure_category_flow(view, &category)?;
                self.update_item(&id, &name, &category_id)
            }
            Operation::Delete => {
                let item = self.item(&id)?;
                let category = self.category(&item.category_id)?;
                self.ensure_category_flow(view, &category)?;
                self.delete_item(&id)
            }
        }
    }

    fn flow_kind_of(&self, category: &Category) -> FlowKind {
        if category.flow_id == self.flows.in_flow {
            FlowKind::In
        } else {
            FlowKind::Out
        }
    }

    fn ensure_category_flow(&self, view: View, category: &Category) -> Result<()> {
        match view_flow(view) {
            Some(kind) if *self.flows.get(kind) != category.flow_id => {
                Err(CashflowError::Validation(format!(
                    "Category \"{}\" is not shown in {}",
                    category.name, view
                )))
            }
            _ => Ok(()),
        }
    }
}
