//! Multi-row operations: period cloning and bulk (un)registration.
//!
//! Cloning is a single log entry. The bulk loops log one entry per row and
//! ask the caller before each one, so stopping halfway leaves the rows
//! already handled applied and undoable.

use std::collections::HashSet;

use tracing::info;

use super::{Outcome, Session};
use crate::command::{ChangeSet, Command};
use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::{Period, RegisterEntry, UnusedMetrics};
use crate::schema::View;

/// Answer of a bulk-operation hook for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Handle this row.
    Proceed,
    /// Leave this row and continue with the next.
    Skip,
    /// Leave this row and every row after it.
    Stop,
}

impl Session {
    fn cloned_entries(&self, source: &Id, target: &Id) -> Result<Vec<RegisterEntry>> {
        let taken: HashSet<Id> = self
            .register_entries(target)?
            .into_iter()
            .map(|entry| entry.item_id)
            .collect();

        Ok(self
            .register_entries(source)?
            .into_iter()
            .filter(|entry| !taken.contains(&entry.item_id))
            .map(|entry| RegisterEntry {
                id: Id::new(),
                period_id: target.clone(),
                ..entry
            })
            .collect())
    }

    /// Copy every register entry of `source` into the existing period
    /// `target`, with new ids. Items already registered in `target` are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::Validation` if the periods are the same or
    /// there is nothing to copy.
    pub fn clone_period(&mut self, source: &Id, target: &Id) -> Result<Outcome> {
        let source_period = self.period(source)?;
        let target_period = self.period(target)?;
        if source == target {
            return Err(CashflowError::Validation(
                "A period cannot be cloned into itself".to_string(),
            ));
        }

        let entries = self.cloned_entries(source, target)?;
        if entries.is_empty() {
            return Err(CashflowError::Validation(format!(
                "Period \"{}\" has nothing to clone into \"{}\"",
                source_period.name, target_period.name
            )));
        }

        let mut changes = ChangeSet::new();
        for entry in entries {
            changes.push(Command::InsertRegister { entry });
        }
        info!(
            source = %source_period.name,
            target = %target_period.name,
            entries = changes.len(),
            "period cloned"
        );
        self.commit(
            changes,
            View::RegisterMetrics,
            Some(target.clone()),
            Vec::new(),
        )
    }

    /// Create a new period holding a copy of `source`'s register entries.
    ///
    /// The period is named `name`, or "Clone of <source>" when `None`.
    /// Creating the period and copying the entries is one log entry.
    pub fn clone_period_as(&mut self, source: &Id, name: Option<&str>) -> Result<Outcome> {
        let source_period = self.period(source)?;
        let period = Period {
            id: Id::new(),
            name: match name {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                Some(_) => {
                    return Err(CashflowError::Validation(
                        "Period name cannot be empty".to_string(),
                    ))
                }
                None => format!("Clone of {}", source_period.name),
            },
        };
        let id = period.id.clone();

        let mut changes = ChangeSet::single(Command::InsertPeriod { period });
        for entry in self.register_entries(source)? {
            changes.push(Command::InsertRegister {
                entry: RegisterEntry {
                    id: Id::new(),
                    period_id: id.clone(),
                    ..entry
                },
            });
        }
        self.commit(changes, View::PeriodMetrics, Some(id), Vec::new())
    }

    /// Register unused items of a period with zero amounts, one log entry
    /// per item. `decide` is asked for each unused item in view order.
    pub fn register_unregistered<F>(
        &mut self,
        period_id: &Id,
        mut decide: F,
    ) -> Result<Vec<Outcome>>
    where
        F: FnMut(&UnusedMetrics) -> Decision,
    {
        let mut outcomes = Vec::new();
        for unused in self.unused_metrics(period_id)? {
            match decide(&unused) {
                Decision::Proceed => {
                    let outcome = self.register_item(period_id, &unused.item_id, 0.0, 0.0, "")?;
                    outcomes.push(outcome);
                }
                Decision::Skip => continue,
                Decision::Stop => break,
            }
        }
        Ok(outcomes)
    }

    /// Remove register entries, one log entry each.
    ///
    /// Entries holding an amount or a note are only removed if `confirm`
    /// agrees; blank entries are removed without asking.
    pub fn unregister_all<F>(&mut self, ids: &[Id], mut confirm: F) -> Result<Vec<Outcome>>
    where
        F: FnMut(&RegisterEntry) -> Decision,
    {
        let mut outcomes = Vec::new();
        for id in ids {
            let entry = self.register_entry(id)?;
            let blank = entry.budget == 0.0 && entry.actual == 0.0 && entry.note.is_empty();
            let decision = if blank {
                Decision::Proceed
            } else {
                confirm(&entry)
            };
            match decision {
                Decision::Proceed => outcomes.push(self.unregister(id)?),
                Decision::Skip => continue,
                Decision::Stop => break,
            }
        }
        Ok(outcomes)
    }
}
