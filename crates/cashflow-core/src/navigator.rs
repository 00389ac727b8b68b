//! Cursor over the undo/redo log.
//!
//! `index` counts the entries currently applied: 0 is the fully undone
//! state, `len` is the latest edit. Every move runs in one transaction with
//! the base-table writes it replays, and the cursor only moves after commit.

use rusqlite::Connection;
use tracing::debug;

use crate::command::ChangeSet;
use crate::error::{CashflowError, NoOpKind, Result};
use crate::journal;

/// Where the cursor sits relative to the ends of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    AtStart,
    Middle,
    AtEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    len: usize,
    /// Cursor value at the last save; `None` once that state is unreachable.
    saved_index: Option<usize>,
}

impl Navigator {
    /// Navigator over an empty log, marked as saved.
    pub fn new() -> Self {
        Self {
            index: 0,
            len: 0,
            saved_index: Some(0),
        }
    }

    /// Navigator over an existing log of `len` entries with `index` applied.
    ///
    /// An index beyond the log is clamped to its end.
    pub fn resume(len: usize, index: usize) -> Self {
        let index = index.min(len);
        Self {
            index,
            len,
            saved_index: Some(index),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> Position {
        if self.index == 0 {
            Position::AtStart
        } else if self.index == self.len {
            Position::AtEnd
        } else {
            Position::Middle
        }
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.index == self.len
    }

    pub fn at_saved(&self) -> bool {
        self.saved_index == Some(self.index)
    }

    pub fn mark_saved(&mut self) {
        self.saved_index = Some(self.index);
    }

    /// Apply a new edit and log it, discarding any redo history first.
    ///
    /// Returns the new cursor value.
    ///
    /// # Errors
    ///
    /// Any failure rolls back the transaction: neither the base tables nor
    /// the log change, and the cursor stays put.
    pub fn record(&mut self, conn: &mut Connection, changes: &ChangeSet) -> Result<usize> {
        let tx = conn.transaction()?;
        let stale = if self.index < self.len {
            journal::truncate_after(&tx, self.index)?
        } else {
            0
        };
        changes.apply(&tx)?;
        let id = journal::append(&tx, changes)?;
        tx.commit()?;

        if stale > 0 {
            debug!(discarded = stale, "redo history truncated");
        }
        if self.saved_index.is_some_and(|saved| saved > self.index) {
            self.saved_index = None;
        }
        self.index += 1;
        self.len = self.index;
        debug!(id, index = self.index, "logged {}", changes.describe());
        Ok(self.index)
    }

    /// Replay the undo side of the entry at the cursor and step back.
    ///
    /// # Errors
    ///
    /// `NoOp(NothingToUndo)` at the start of the log; `LogReplay` if the
    /// entry cannot be decoded or applied, with the cursor unchanged.
    pub fn undo(&mut self, conn: &mut Connection) -> Result<usize> {
        if self.at_start() {
            return Err(CashflowError::NoOp(NoOpKind::NothingToUndo));
        }

        let tx = conn.transaction()?;
        let entry = journal::read(&tx, self.index)?;
        entry
            .undo
            .apply(&tx)
            .map_err(|e| replay_error("undo", self.index, e))?;
        tx.commit()?;

        self.index -= 1;
        debug!(id = entry.id, index = self.index, "undid {}", entry.redo.describe());
        Ok(self.index)
    }

    /// Replay the redo side of the entry after the cursor and step forward.
    ///
    /// # Errors
    ///
    /// `NoOp(NothingToRedo)` at the end of the log; `LogReplay` if the entry
    /// cannot be decoded or applied, with the cursor left where it was.
    pub fn redo(&mut self, conn: &mut Connection) -> Result<usize> {
        if self.at_end() {
            return Err(CashflowError::NoOp(NoOpKind::NothingToRedo));
        }

        let next = self.index + 1;
        let tx = conn.transaction()?;
        let entry = journal::read(&tx, next)?;
        entry
            .redo
            .apply(&tx)
            .map_err(|e| replay_error("redo", next, e))?;
        tx.commit()?;

        self.index = next;
        debug!(id = entry.id, index = self.index, "redid {}", entry.redo.describe());
        Ok(self.index)
    }

    /// Delete the whole log and return to the empty state.
    pub fn clear_all(&mut self, conn: &Connection) -> Result<()> {
        journal::clear(conn)?;
        self.index = 0;
        self.len = 0;
        self.saved_index = Some(0);
        Ok(())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

fn replay_error(direction: &str, rank: usize, error: CashflowError) -> CashflowError {
    match error {
        CashflowError::LogReplay(message) => {
            CashflowError::LogReplay(format!("{} of entry {}: {}", direction, rank, message))
        }
        other => CashflowError::LogReplay(format!("{} of entry {}: {}", direction, rank, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::model::Period;
    use crate::schema::create_schema;
    use crate::id::Id;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn add_period(name: &str) -> ChangeSet {
        ChangeSet::single(Command::InsertPeriod {
            period: Period {
                id: Id::new(),
                name: name.to_string(),
            },
        })
    }

    fn period_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM period", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_positions() {
        let mut conn = store();
        let mut nav = Navigator::new();
        assert_eq!(nav.position(), Position::AtStart);
        assert!(nav.at_start() && nav.at_end() && nav.at_saved());

        nav.record(&mut conn, &add_period("a")).unwrap();
        nav.record(&mut conn, &add_period("b")).unwrap();
        assert_eq!(nav.position(), Position::AtEnd);
        assert!(!nav.at_saved());

        nav.undo(&mut conn).unwrap();
        assert_eq!(nav.position(), Position::Middle);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut conn = store();
        let mut nav = Navigator::new();
        assert!(matches!(
            nav.undo(&mut conn),
            Err(CashflowError::NoOp(NoOpKind::NothingToUndo))
        ));

        nav.record(&mut conn, &add_period("a")).unwrap();
        assert!(matches!(
            nav.redo(&mut conn),
            Err(CashflowError::NoOp(NoOpKind::NothingToRedo))
        ));
        assert_eq!(nav.index(), 1);
        assert_eq!(period_count(&conn), 1);
    }

    #[test]
    fn test_edit_in_middle_truncates_redo() {
        let mut conn = store();
        let mut nav = Navigator::new();
        for name in ["a", "b", "c"] {
            nav.record(&mut conn, &add_period(name)).unwrap();
        }
        nav.undo(&mut conn).unwrap();
        nav.undo(&mut conn).unwrap();

        nav.record(&mut conn, &add_period("d")).unwrap();
        assert_eq!(nav.index(), 2);
        assert_eq!(nav.len(), 2);
        assert_eq!(journal::count(&conn).unwrap(), 2);
        assert!(nav.redo(&mut conn).unwrap_err().is_noop());
    }

    #[test]
    fn test_saved_mark_dropped_when_truncated_away() {
        let mut conn = store();
        let mut nav = Navigator::new();
        nav.record(&mut conn, &add_period("a")).unwrap();
        nav.record(&mut conn, &add_period("b")).unwrap();
        nav.mark_saved();
        nav.undo(&mut conn).unwrap();
        nav.record(&mut conn, &add_period("c")).unwrap();

        // same index as the save, different content
        assert_eq!(nav.index(), 2);
        assert!(!nav.at_saved());
    }

    #[test]
    fn test_failed_undo_keeps_cursor() {
        let mut conn = store();
        let mut nav = Navigator::new();
        nav.record(&mut conn, &add_period("a")).unwrap();
        conn.execute("DELETE FROM period", []).unwrap();

        let err = nav.undo(&mut conn).unwrap_err();
        assert!(matches!(err, CashflowError::LogReplay(_)));
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_failed_redo_keeps_cursor() {
        let mut conn = store();
        let mut nav = Navigator::new();
        nav.record(&mut conn, &add_period("a")).unwrap();
        nav.undo(&mut conn).unwrap();
        conn.execute("UPDATE logUndoRedo SET redoCommand = 'garbage'", [])
            .unwrap();

        assert!(matches!(
            nav.redo(&mut conn),
            Err(CashflowError::LogReplay(_))
        ));
        assert_eq!(nav.index(), 0);
        assert_eq!(period_count(&conn), 0);
    }

    #[test]
    fn test_failed_record_logs_nothing() {
        let mut conn = store();
        let mut nav = Navigator::new();
        let mut changes = add_period("a");
        changes.push(Command::DeletePeriod {
            period: Period {
                id: Id::new(),
                name: "ghost".to_string(),
            },
        });

        assert!(nav.record(&mut conn, &changes).is_err());
        assert_eq!(nav.index(), 0);
        assert_eq!(period_count(&conn), 0);
        assert_eq!(journal::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_resume_clamps_index() {
        let nav = Navigator::resume(3, 7);
        assert_eq!(nav.index(), 3);
        assert!(nav.at_end() && nav.at_saved());
    }
}
