//! The `logUndoRedo` table.
//!
//! Entries are addressed by rank (1-based position in ascending id order),
//! never by raw id: ids are never reused, so truncation leaves gaps.

use rusqlite::{Connection, OptionalExtension};

use crate::command::ChangeSet;
use crate::error::{CashflowError, Result};

/// One decoded log row.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub undo: ChangeSet,
    pub redo: ChangeSet,
}

/// Number of entries in the log.
pub fn count(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM logUndoRedo", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Id of the entry at `rank`.
///
/// # Errors
///
/// Returns `CashflowError::LogReplay` if the log has fewer than `rank`
/// entries or `rank` is zero.
pub fn nth_id(conn: &Connection, rank: usize) -> Result<i64> {
    if rank == 0 {
        return Err(CashflowError::LogReplay(
            "log ranks start at 1".to_string(),
        ));
    }
    conn.query_row(
        "SELECT id FROM logUndoRedo ORDER BY id LIMIT 1 OFFSET ?",
        [(rank - 1) as i64],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| CashflowError::LogReplay(format!("no log entry at position {}", rank)))
}

/// Read and decode the entry at `rank`.
pub fn read(conn: &Connection, rank: usize) -> Result<LogEntry> {
    let id = nth_id(conn, rank)?;
    let (undo, redo): (String, String) = conn.query_row(
        "SELECT undoCommand, redoCommand FROM logUndoRedo WHERE id = ?",
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    decode(id, &undo, &redo)
}

/// Every entry, oldest first.
pub fn entries(conn: &Connection) -> Result<Vec<LogEntry>> {
    let mut stmt =
        conn.prepare("SELECT id, undoCommand, redoCommand FROM logUndoRedo ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, undo, redo) = row?;
        entries.push(decode(id, &undo, &redo)?);
    }
    Ok(entries)
}

fn decode(id: i64, undo: &str, redo: &str) -> Result<LogEntry> {
    let undo = ChangeSet::from_json(undo)
        .map_err(|e| CashflowError::LogReplay(format!("entry {} undo: {}", id, e)))?;
    let redo = ChangeSet::from_json(redo)
        .map_err(|e| CashflowError::LogReplay(format!("entry {} redo: {}", id, e)))?;
    Ok(LogEntry { id, undo, redo })
}

/// Append a change set and its inverse; returns the new row id.
pub fn append(conn: &Connection, changes: &ChangeSet) -> Result<i64> {
    conn.execute(
        "INSERT INTO logUndoRedo (undoCommand, redoCommand) VALUES (?, ?)",
        (changes.inverse().to_json()?, changes.to_json()?),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete every entry ranked after `rank`; returns how many were removed.
pub fn truncate_after(conn: &Connection, rank: usize) -> Result<usize> {
    let removed = conn.execute(
        r#"
        DELETE FROM logUndoRedo
        WHERE id NOT IN (SELECT id FROM logUndoRedo ORDER BY id LIMIT ?)
        "#,
        [rank as i64],
    )?;
    Ok(removed)
}

/// Delete every entry.
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM logUndoRedo", [])?;
    Ok(())
}
