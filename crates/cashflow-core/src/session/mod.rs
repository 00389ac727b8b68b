//! The open budget.
//!
//! A [`Session`] owns a private working copy of the budget file, the
//! connection to it, and the undo/redo cursor. Every edit goes through the
//! session, which turns it into a [`ChangeSet`], applies and logs it in one
//! transaction, and hands back an [`Outcome`] describing what changed.
//! Nothing touches the user's file until `save`, `save_as` or `backup_as`.

mod bulk;
mod edit;
mod queries;
mod row;
mod views;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::command::ChangeSet;
use crate::error::{CashflowError, Result};
use crate::fs::replace_with_failsafe;
use crate::id::Id;
use crate::journal::{self, LogEntry};
use crate::navigator::Navigator;
use crate::schema::{create_schema, View};
use crate::seed::{prepopulate_mappable_data, prepopulate_permanent_data, FlowIds};
use crate::validation::Correction;

pub use bulk::Decision;
pub use views::ViewRow;

/// `meta` key holding the cursor at the time of the last save.
const LOG_CURSOR_KEY: &str = "log_cursor";

/// What an operation did, for the caller to decide what to redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Cursor after the operation (number of applied log entries).
    pub log_index: usize,
    /// Row the operation created or changed, when there is a single one.
    pub row_id: Option<Id>,
    /// Adjustments made to register amounts before they were stored.
    pub corrections: Vec<Correction>,
    /// Views whose content may have changed.
    pub refresh: Vec<View>,
}

impl Outcome {
    fn replayed(log_index: usize) -> Self {
        Self {
            log_index,
            row_id: None,
            corrections: Vec::new(),
            refresh: View::ALL.to_vec(),
        }
    }
}

/// Flags the front end uses for its title bar and menu state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub modified: bool,
    pub log_count: usize,
    pub log_index: usize,
    pub at_start: bool,
    pub at_end: bool,
    pub at_saved: bool,
    pub current_file: Option<PathBuf>,
}

pub struct Session {
    conn: Connection,
    navigator: Navigator,
    flows: FlowIds,
    current_file: Option<PathBuf>,
    // dropped last so the connection closes before the file is removed
    working: NamedTempFile,
}

fn working_copy() -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("cashflow-")
        .suffix(".db")
        .tempfile()
        .map_err(|e| CashflowError::FileIo(format!("Cannot create working copy: {}", e)))
}

fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

fn saved_cursor(conn: &Connection) -> Result<Option<usize>> {
    let has_meta: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
        [],
        |row| row.get(0),
    )?;
    if !has_meta {
        return Ok(None);
    }

    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = ?",
            [LOG_CURSOR_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.and_then(|text| match text.parse() {
        Ok(cursor) => Some(cursor),
        Err(_) => {
            warn!(value = %text, "ignoring unreadable saved log cursor");
            None
        }
    }))
}

impl Session {
    /// Start a fresh budget: empty log, the two flows, and the default
    /// category and item catalog.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::Schema` if the tables or views cannot be
    /// created, or `CashflowError::FileIo` if no working copy can be made.
    pub fn new_database() -> Result<Self> {
        let working = working_copy()?;
        let mut conn = connect(working.path())?;
        create_schema(&conn)?;

        let tx = conn.transaction()?;
        let flows = prepopulate_permanent_data(&tx)?;
        prepopulate_mappable_data(&tx, &flows)?;
        tx.commit()?;

        info!(working = %working.path().display(), "new budget created");
        Ok(Self {
            conn,
            navigator: Navigator::new(),
            flows,
            current_file: None,
            working,
        })
    }

    /// Open an existing budget file into a new working copy.
    ///
    /// The cursor resumes where the file was saved; files that never
    /// recorded one open with the whole log applied.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::FileIo` if the file cannot be copied or is not
    /// a database, and `CashflowError::MissingFlow` if either flow is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let working = working_copy()?;
        std::fs::copy(path, working.path()).map_err(|e| {
            CashflowError::FileIo(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let conn = connect(working.path())
            .and_then(|conn| {
                conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
                    row.get::<_, i64>(0)
                })?;
                Ok(conn)
            })
            .map_err(|e| {
                CashflowError::FileIo(format!("{} is not a budget file: {}", path.display(), e))
            })?;

        let flows = FlowIds::load(&conn)?;
        let len = journal::count(&conn)?;
        let cursor = saved_cursor(&conn)?.unwrap_or(len);
        let navigator = Navigator::resume(len, cursor);

        info!(
            file = %path.display(),
            log_count = len,
            log_index = navigator.index(),
            "budget opened"
        );
        Ok(Self {
            conn,
            navigator,
            flows,
            current_file: Some(path.to_path_buf()),
            working,
        })
    }

    /// Replace this session with a fresh budget.
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::new_database()?;
        Ok(())
    }

    /// Replace this session with the budget at `path`.
    ///
    /// The current session is untouched if the file cannot be opened.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        *self = Self::open(path)?;
        Ok(())
    }

    /// Write the budget back to its current file.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::FileIo("no destination")` for a budget that
    /// has never been saved; the caller picks a path and uses `save_as`.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .current_file
            .clone()
            .ok_or_else(|| CashflowError::FileIo("no destination".to_string()))?;
        self.write_to(&path)?;
        self.navigator.mark_saved();
        info!(file = %path.display(), "budget saved");
        Ok(())
    }

    /// Write the budget to `path` and make it the current file.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_to(path)?;
        self.current_file = Some(path.to_path_buf());
        self.navigator.mark_saved();
        info!(file = %path.display(), "budget saved");
        Ok(())
    }

    /// Write a copy of the budget to `path`. The current file and the
    /// saved marker do not change.
    pub fn backup_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_to(path)?;
        info!(file = %path.display(), "budget backed up");
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
        )?;
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?, ?)",
            (LOG_CURSOR_KEY, self.navigator.index().to_string()),
        )?;
        self.conn.execute_batch("VACUUM;")?;
        replace_with_failsafe(self.working.path(), path)
    }

    /// Step back one log entry.
    ///
    /// # Errors
    ///
    /// `NoOp` at the start of the log; `LogReplay` if the entry cannot be
    /// replayed, in which case nothing changes.
    pub fn undo(&mut self) -> Result<Outcome> {
        let index = self.navigator.undo(&mut self.conn)?;
        Ok(Outcome::replayed(index))
    }

    /// Re-apply the next log entry.
    pub fn redo(&mut self) -> Result<Outcome> {
        let index = self.navigator.redo(&mut self.conn)?;
        Ok(Outcome::replayed(index))
    }

    /// Every log entry, oldest first.
    pub fn history(&self) -> Result<Vec<LogEntry>> {
        journal::entries(&self.conn)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            modified: !self.navigator.at_saved(),
            log_count: self.navigator.len(),
            log_index: self.navigator.index(),
            at_start: self.navigator.at_start(),
            at_end: self.navigator.at_end(),
            at_saved: self.navigator.at_saved(),
            current_file: self.current_file.clone(),
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn flows(&self) -> &FlowIds {
        &self.flows
    }

    /// Apply and log one operation.
    fn commit(
        &mut self,
        changes: ChangeSet,
        view: View,
        row_id: Option<Id>,
        corrections: Vec<Correction>,
    ) -> Result<Outcome> {
        let log_index = self.navigator.record(&mut self.conn, &changes)?;
        Ok(Outcome {
            log_index,
            row_id,
            corrections,
            refresh: view.dependents(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_database_is_unmodified() {
        let session = Session::new_database().unwrap();
        let status = session.status();
        assert!(!status.modified);
        assert_eq!(status.log_count, 0);
        assert!(status.at_start && status.at_end && status.at_saved);
        assert!(status.current_file.is_none());
    }

    #[test]
    fn test_save_without_destination_fails() {
        let mut session = Session::new_database().unwrap();
        match session.save() {
            Err(CashflowError::FileIo(message)) => assert_eq!(message, "no destination"),
            other => panic!("expected FileIo, got {:?}", other),
        }
    }

    #[test]
    fn test_undo_outcome_refreshes_everything() {
        let mut session = Session::new_database().unwrap();
        session.add_period("Jan").unwrap();
        let outcome = session.undo().unwrap();
        assert_eq!(outcome.log_index, 0);
        assert_eq!(outcome.refresh.len(), View::ALL.len());
    }
}
