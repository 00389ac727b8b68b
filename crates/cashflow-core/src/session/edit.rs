//! Single-row edits of periods, categories, items and register entries.

use super::{Outcome, Session};
use crate::command::{CategoryFields, ChangeSet, Command, ItemFields};
use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::{Category, FlowKind, Item, Period, RegisterEntry, RegisterValues};
use crate::schema::View;
use crate::validation::normalize_amounts;

fn checked_name(name: &str, what: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CashflowError::Validation(format!(
            "{} name cannot be empty",
            what
        )));
    }
    Ok(name.to_string())
}

impl Session {
    /// Create a period with a fresh id.
    pub fn add_period(&mut self, name: &str) -> Result<Outcome> {
        self.insert_period(Period {
            id: Id::new(),
            name: name.to_string(),
        })
    }

    pub(super) fn insert_period(&mut self, period: Period) -> Result<Outcome> {
        let period = Period {
            name: checked_name(&period.name, "Period")?,
            ..period
        };
        let id = period.id.clone();
        self.commit(
            ChangeSet::single(Command::InsertPeriod { period }),
            View::PeriodMetrics,
            Some(id),
            Vec::new(),
        )
    }

    pub fn rename_period(&mut self, id: &Id, name: &str) -> Result<Outcome> {
        let existing = self.period(id)?;
        let command = Command::UpdatePeriod {
            id: id.clone(),
            old_name: existing.name,
            new_name: checked_name(name, "Period")?,
        };
        self.commit(
            ChangeSet::single(command),
            View::PeriodMetrics,
            Some(id.clone()),
            Vec::new(),
        )
    }

    /// Delete a period and its register entries as one undoable change.
    pub fn delete_period(&mut self, id: &Id) -> Result<Outcome> {
        let period = self.period(id)?;
        let mut changes = ChangeSet::new();
        // newest first, so undo re-inserts them in their original order
        for entry in self.register_entries(id)?.into_iter().rev() {
            changes.push(Command::DeleteRegister { entry });
        }
        changes.push(Command::DeletePeriod { period });
        self.commit(changes, View::PeriodMetrics, Some(id.clone()), Vec::new())
    }

    pub fn add_category(&mut self, name: &str, flow: FlowKind) -> Result<Outcome> {
        self.insert_category(Category {
            id: Id::new(),
            name: name.to_string(),
            flow_id: self.flows.get(flow).clone(),
        })
    }

    pub(super) fn insert_category(&mut self, category: Category) -> Result<Outcome> {
        let category = Category {
            name: checked_name(&category.name, "Category")?,
            ..category
        };
        let id = category.id.clone();
        self.commit(
            ChangeSet::single(Command::InsertCategory { category }),
            View::CategoryMap,
            Some(id),
            Vec::new(),
        )
    }

    /// Rename a category and/or move it to the other flow.
    pub fn update_category(&mut self, id: &Id, name: &str, flow: FlowKind) -> Result<Outcome> {
        let existing = self.category(id)?;
        let command = Command::UpdateCategory {
            id: id.clone(),
            old: CategoryFields {
                name: existing.name,
                flow_id: existing.flow_id,
            },
            new: CategoryFields {
                name: checked_name(name, "Category")?,
                flow_id: self.flows.get(flow).clone(),
            },
        };
        self.commit(
            ChangeSet::single(command),
            View::CategoryMap,
            Some(id.clone()),
            Vec::new(),
        )
    }

    /// Delete an empty category.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::CategoryInUse` while any item maps to it;
    /// nothing is changed or logged.
    pub fn delete_category(&mut self, id: &Id) -> Result<Outcome> {
        let category = self.category(id)?;
        if self.category_has_items(id)? {
            return Err(CashflowError::CategoryInUse(category.name));
        }
        self.commit(
            ChangeSet::single(Command::DeleteCategory { category }),
            View::CategoryMap,
            Some(id.clone()),
            Vec::new(),
        )
    }

    pub fn add_item(&mut self, name: &str, category_id: &Id) -> Result<Outcome> {
        self.insert_item(Item {
            id: Id::new(),
            name: name.to_string(),
            category_id: category_id.clone(),
        })
    }

    pub(super) fn insert_item(&mut self, item: Item) -> Result<Outcome> {
        self.category(&item.category_id)?;
        let item = Item {
            name: checked_name(&item.name, "Item")?,
            ..item
        };
        let id = item.id.clone();
        self.commit(
            ChangeSet::single(Command::InsertItem { item }),
            View::ItemMap,
            Some(id),
            Vec::new(),
        )
    }

    /// Rename an item and/or move it to another category.
    pub fn update_item(&mut self, id: &Id, name: &str, category_id: &Id) -> Result<Outcome> {
        let existing = self.item(id)?;
        self.category(category_id)?;
        let command = Command::UpdateItem {
            id: id.clone(),
            old: ItemFields {
                name: existing.name,
                category_id: existing.category_id,
            },
            new: ItemFields {
                name: checked_name(name, "Item")?,
                category_id: category_id.clone(),
            },
        };
        self.commit(
            ChangeSet::single(command),
            View::ItemMap,
            Some(id.clone()),
            Vec::new(),
        )
    }

    /// Delete an item that is not registered in any period.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::ItemInUse` while a register entry uses it.
    pub fn delete_item(&mut self, id: &Id) -> Result<Outcome> {
        let item = self.item(id)?;
        if self.item_in_register(id)? {
            return Err(CashflowError::ItemInUse(item.name));
        }
        self.commit(
            ChangeSet::single(Command::DeleteItem { item }),
            View::ItemMap,
            Some(id.clone()),
            Vec::new(),
        )
    }

    /// Register an item in a period. Amounts are corrected before storing;
    /// the corrections are reported in the outcome.
    pub fn register_item(
        &mut self,
        period_id: &Id,
        item_id: &Id,
        budget: f64,
        actual: f64,
        note: &str,
    ) -> Result<Outcome> {
        self.insert_register(RegisterEntry {
            id: Id::new(),
            period_id: period_id.clone(),
            item_id: item_id.clone(),
            budget,
            actual,
            note: note.to_string(),
        })
    }

    pub(super) fn insert_register(&mut self, entry: RegisterEntry) -> Result<Outcome> {
        let period = self.period(&entry.period_id)?;
        let item = self.item(&entry.item_id)?;
        if self.find_register(&period.id, &item.id)?.is_some() {
            return Err(CashflowError::Validation(format!(
                "Item \"{}\" is already registered in period \"{}\"",
                item.name, period.name
            )));
        }

        let (budget, actual, corrections) = normalize_amounts(entry.budget, entry.actual)?;
        let entry = RegisterEntry {
            budget,
            actual,
            ..entry
        };
        let id = entry.id.clone();
        self.commit(
            ChangeSet::single(Command::InsertRegister { entry }),
            View::RegisterMetrics,
            Some(id),
            corrections,
        )
    }

    /// Change the amounts and note of a register entry.
    pub fn update_register(
        &mut self,
        id: &Id,
        budget: f64,
        actual: f64,
        note: &str,
    ) -> Result<Outcome> {
        let existing = self.register_entry(id)?;
        let (budget, actual, corrections) = normalize_amounts(budget, actual)?;
        let command = Command::UpdateRegister {
            id: id.clone(),
            old: existing.values(),
            new: RegisterValues {
                budget,
                actual,
                note: note.to_string(),
            },
        };
        self.commit(
            ChangeSet::single(command),
            View::RegisterMetrics,
            Some(id.clone()),
            corrections,
        )
    }

    /// Remove a register entry.
    pub fn unregister(&mut self, id: &Id) -> Result<Outcome> {
        let entry = self.register_entry(id)?;
        self.commit(
            ChangeSet::single(Command::DeleteRegister { entry }),
            View::RegisterMetrics,
            Some(id.clone()),
            Vec::new(),
        )
    }
}
