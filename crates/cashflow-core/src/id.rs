//! Row identifiers.
//!
//! Ids are opaque TEXT keys. New rows get a v4 UUID, but ids read from a
//! file are kept exactly as stored (files from other writers may wrap them
//! in braces), so every statement binds the same text it read.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CashflowError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// A fresh id for a new row.
    pub fn new() -> Self {
        Id(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without surrounding braces, for display and prefix matching.
    pub fn bare(&self) -> &str {
        self.0
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(&self.0)
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = CashflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CashflowError::Validation("Id cannot be empty".to_string()));
        }
        Ok(Id(s.to_string()))
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Id(uuid.to_string())
    }
}

impl ToSql for Id {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Text(self.0.as_bytes())))
    }
}

impl FromSql for Id {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(text) => std::str::from_utf8(text)
                .map(|s| Id(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_new_ids_are_uuids() {
        let id = Id::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, Id::new());
    }

    #[test]
    fn test_braced_text_is_kept_verbatim() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY)").unwrap();
        conn.execute(
            "INSERT INTO t (id) VALUES ('{0b9f3c8e-1d2a-4c5b-9e7f-123456789abc}')",
            [],
        )
        .unwrap();

        let id: Id = conn.query_row("SELECT id FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(id.as_str(), "{0b9f3c8e-1d2a-4c5b-9e7f-123456789abc}");
        assert_eq!(id.bare(), "0b9f3c8e-1d2a-4c5b-9e7f-123456789abc");

        let found: i64 = conn
            .query_row("SELECT count(*) FROM t WHERE id = ?", [&id], |row| row.get(0))
            .unwrap();
        assert_eq!(found, 1);
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!("  ".parse::<Id>().is_err());
        assert_eq!("abc".parse::<Id>().unwrap().as_str(), "abc");
    }
}
