//! Reversible commands.
//!
//! Every change to the base tables is expressed as a [`Command`] that knows
//! its own inverse. A user operation is a [`ChangeSet`] of commands; the undo
//! log stores the change set and its inverse, serialized as JSON, and replay
//! runs them back through [`ChangeSet::apply`]. Values are always bound as
//! statement parameters, so replay reproduces them exactly.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::{Category, Item, Period, RegisterEntry, RegisterValues};

/// Mutable fields of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
    pub flow_id: Id,
}

/// Mutable fields of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    pub category_id: Id,
}

/// A single-row base-table write with enough state to invert it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    InsertPeriod {
        period: Period,
    },
    UpdatePeriod {
        id: Id,
        old_name: String,
        new_name: String,
    },
    DeletePeriod {
        period: Period,
    },
    InsertCategory {
        category: Category,
    },
    UpdateCategory {
        id: Id,
        old: CategoryFields,
        new: CategoryFields,
    },
    DeleteCategory {
        category: Category,
    },
    InsertItem {
        item: Item,
    },
    UpdateItem {
        id: Id,
        old: ItemFields,
        new: ItemFields,
    },
    DeleteItem {
        item: Item,
    },
    InsertRegister {
        entry: RegisterEntry,
    },
    UpdateRegister {
        id: Id,
        old: RegisterValues,
        new: RegisterValues,
    },
    DeleteRegister {
        entry: RegisterEntry,
    },
}

impl Command {
    /// The command that exactly reverses this one.
    pub fn invert(&self) -> Command {
        match self {
            Command::InsertPeriod { period } => Command::DeletePeriod {
                period: period.clone(),
            },
            Command::DeletePeriod { period } => Command::InsertPeriod {
                period: period.clone(),
            },
            Command::UpdatePeriod {
                id,
                old_name,
                new_name,
            } => Command::UpdatePeriod {
                id: id.clone(),
                old_name: new_name.clone(),
                new_name: old_name.clone(),
            },
            Command::InsertCategory { category } => Command::DeleteCategory {
                category: category.clone(),
            },
            Command::DeleteCategory { category } => Command::InsertCategory {
                category: category.clone(),
            },
            Command::UpdateCategory { id, old, new } => Command::UpdateCategory {
                id: id.clone(),
                old: new.clone(),
                new: old.clone(),
            },
            Command::InsertItem { item } => Command::DeleteItem { item: item.clone() },
            Command::DeleteItem { item } => Command::InsertItem { item: item.clone() },
            Command::UpdateItem { id, old, new } => Command::UpdateItem {
                id: id.clone(),
                old: new.clone(),
                new: old.clone(),
            },
            Command::InsertRegister { entry } => Command::DeleteRegister {
                entry: entry.clone(),
            },
            Command::DeleteRegister { entry } => Command::InsertRegister {
                entry: entry.clone(),
            },
            Command::UpdateRegister { id, old, new } => Command::UpdateRegister {
                id: id.clone(),
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// Write this command to the base tables.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::LogReplay` when the target row is missing
    /// (nothing affected) or SQLite rejects the write.
    pub fn apply(&self, conn: &Connection) -> Result<()> {
        let result = match self {
            Command::InsertPeriod { period } => conn.execute(
                "INSERT INTO period (id, name) VALUES (?, ?)",
                (&period.id, &period.name),
            ),
            Command::UpdatePeriod { id, new_name, .. } => conn.execute(
                "UPDATE period SET name = ? WHERE id = ?",
                (new_name, id),
            ),
            Command::DeletePeriod { period } => {
                conn.execute("DELETE FROM period WHERE id = ?", [&period.id])
            }
            Command::InsertCategory { category } => conn.execute(
                "INSERT INTO category (id, name, flowId) VALUES (?, ?, ?)",
                (&category.id, &category.name, &category.flow_id),
            ),
            Command::UpdateCategory { id, new, .. } => conn.execute(
                "UPDATE category SET name = ?, flowId = ? WHERE id = ?",
                (&new.name, &new.flow_id, id),
            ),
            Command::DeleteCategory { category } => {
                conn.execute("DELETE FROM category WHERE id = ?", [&category.id])
            }
            Command::InsertItem { item } => conn.execute(
                "INSERT INTO item (id, name, categoryId) VALUES (?, ?, ?)",
                (&item.id, &item.name, &item.category_id),
            ),
            Command::UpdateItem { id, new, .. } => conn.execute(
                "UPDATE item SET name = ?, categoryId = ? WHERE id = ?",
                (&new.name, &new.category_id, id),
            ),
            Command::DeleteItem { item } => {
                conn.execute("DELETE FROM item WHERE id = ?", [&item.id])
            }
            Command::InsertRegister { entry } => conn.execute(
                r#"
                INSERT INTO register (id, periodId, itemId, budget, actual, note)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                (
                    &entry.id,
                    &entry.period_id,
                    &entry.item_id,
                    entry.budget,
                    entry.actual,
                    &entry.note,
                ),
            ),
            Command::UpdateRegister { id, new, .. } => conn.execute(
                "UPDATE register SET budget = ?, actual = ?, note = ? WHERE id = ?",
                (new.budget, new.actual, &new.note, id),
            ),
            Command::DeleteRegister { entry } => {
                conn.execute("DELETE FROM register WHERE id = ?", [&entry.id])
            }
        };
        let affected = result
            .map_err(|e| CashflowError::LogReplay(format!("{} failed: {}", self.describe(), e)))?;

        if affected != 1 {
            return Err(CashflowError::LogReplay(format!(
                "{} affected {} rows",
                self.describe(),
                affected
            )));
        }
        Ok(())
    }

    /// Short human-readable summary, used in history listings and errors.
    pub fn describe(&self) -> String {
        match self {
            Command::InsertPeriod { period } => format!("add period \"{}\"", period.name),
            Command::UpdatePeriod {
                old_name, new_name, ..
            } => format!("rename period \"{}\" to \"{}\"", old_name, new_name),
            Command::DeletePeriod { period } => format!("delete period \"{}\"", period.name),
            Command::InsertCategory { category } => {
                format!("add category \"{}\"", category.name)
            }
            Command::UpdateCategory { old, new, .. } => {
                format!("change category \"{}\" to \"{}\"", old.name, new.name)
            }
            Command::DeleteCategory { category } => {
                format!("delete category \"{}\"", category.name)
            }
            Command::InsertItem { item } => format!("add item \"{}\"", item.name),
            Command::UpdateItem { old, new, .. } => {
                format!("change item \"{}\" to \"{}\"", old.name, new.name)
            }
            Command::DeleteItem { item } => format!("delete item \"{}\"", item.name),
            Command::InsertRegister { entry } => format!("register entry {}", entry.id),
            Command::UpdateRegister { id, new, .. } => format!(
                "set register entry {} to {:.2}/{:.2}",
                id, new.budget, new.actual
            ),
            Command::DeleteRegister { entry } => format!("unregister entry {}", entry.id),
        }
    }
}

/// The ordered commands of one user operation; one undo log entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    commands: Vec<Command>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Inverse of every command, in reverse order.
    pub fn inverse(&self) -> ChangeSet {
        ChangeSet {
            commands: self.commands.iter().rev().map(Command::invert).collect(),
        }
    }

    /// Apply every command in order. The caller owns the transaction.
    pub fn apply(&self, conn: &Connection) -> Result<()> {
        for command in &self.commands {
            command.apply(conn)?;
        }
        Ok(())
    }

    /// Summary of the operation: the first command, plus a count of the rest.
    pub fn describe(&self) -> String {
        match self.commands.split_first() {
            None => "empty change".to_string(),
            Some((first, [])) => first.describe(),
            Some((first, rest)) => {
                // deletions list dependents first; name the owning row instead
                let lead = match self.commands.last() {
                    Some(last @ Command::DeletePeriod { .. }) => last,
                    _ => first,
                };
                format!("{} (+{} more)", lead.describe(), rest.len())
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
