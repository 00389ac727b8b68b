//! Schema and view layer.
//!
//! Base tables hold the budget; the metrics and map views are the only
//! surface callers mutate through (see [`crate::session::Session::mutate_via_view`]).
//! Column names follow the persisted file format, so they stay camelCase.

use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use serde::{Serialize, Serializer};

use crate::error::{CashflowError, Result};

/// Format version written to `meta` for new files.
pub const FORMAT_VERSION: &str = "0.24";

const DROP_OBJECTS: &str = r#"
    DROP VIEW IF EXISTS periodMetricsView;
    DROP VIEW IF EXISTS flowMetricsView;
    DROP VIEW IF EXISTS categoryMetricsView;
    DROP VIEW IF EXISTS registerMetricsView;
    DROP VIEW IF EXISTS unusedMetricsView;
    DROP VIEW IF EXISTS categoryMapView;
    DROP VIEW IF EXISTS itemMapView;
    DROP VIEW IF EXISTS inCategoryMapView;
    DROP VIEW IF EXISTS outCategoryMapView;
    DROP VIEW IF EXISTS inItemMapView;
    DROP VIEW IF EXISTS outItemMapView;

    DROP TABLE IF EXISTS register;
    DROP TABLE IF EXISTS item;
    DROP TABLE IF EXISTS category;
    DROP TABLE IF EXISTS flow;
    DROP TABLE IF EXISTS period;
    DROP TABLE IF EXISTS logUndoRedo;
    DROP TABLE IF EXISTS meta;
"#;

const CREATE_TABLES: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE period (
        id TEXT PRIMARY KEY NOT NULL,
        name VARCHAR(40) NOT NULL
    );

    CREATE TABLE flow (
        id TEXT PRIMARY KEY,
        name VARCHAR(40) NOT NULL
    );

    CREATE TABLE category (
        id TEXT PRIMARY KEY,
        name VARCHAR(40) NOT NULL,
        flowId TEXT NOT NULL,
        FOREIGN KEY (flowId) REFERENCES flow(id) ON DELETE CASCADE
    );

    CREATE TABLE item (
        id TEXT PRIMARY KEY,
        name VARCHAR(40) NOT NULL,
        categoryId TEXT NOT NULL,
        FOREIGN KEY (categoryId) REFERENCES category(id) ON DELETE CASCADE
    );

    CREATE TABLE register (
        id TEXT PRIMARY KEY,
        periodId TEXT NOT NULL,
        itemId TEXT NOT NULL,
        budget REAL NOT NULL,
        actual REAL NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        FOREIGN KEY (periodId) REFERENCES period(id) ON DELETE CASCADE,
        FOREIGN KEY (itemId) REFERENCES item(id) ON DELETE CASCADE
    );

    -- AUTOINCREMENT: ids of truncated entries are never handed out again
    CREATE TABLE logUndoRedo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        undoCommand TEXT NOT NULL,
        redoCommand TEXT NOT NULL
    );
"#;

const CREATE_VIEWS: &str = r#"
    CREATE VIEW periodMetricsView AS
    SELECT
        per.id AS periodId,
        per.name AS periodName,
        round(coalesce(sum(
            CASE WHEN reg.flowName = 'In' THEN reg.budget ELSE -reg.budget END), 0), 2)
            AS budgetBalance,
        round(coalesce(sum(
            CASE WHEN reg.flowName = 'In' THEN reg.actual ELSE -reg.actual END), 0), 2)
            AS actualBalance,
        round(coalesce(
            sum(CASE WHEN reg.flowName = 'In' THEN reg.budget ELSE -reg.budget END)
            - sum(CASE WHEN reg.flowName = 'In' THEN reg.actual ELSE -reg.actual END), 0), 2)
            AS differenceBalance
    FROM period per
    LEFT OUTER JOIN (
        SELECT reg.periodId, flo.name AS flowName, reg.budget, reg.actual
        FROM register reg
        JOIN item ite ON ite.id = reg.itemId
        JOIN category cat ON cat.id = ite.categoryId
        JOIN flow flo ON flo.id = cat.flowId
    ) reg ON reg.periodId = per.id
    GROUP BY per.id, per.name;

    CREATE VIEW flowMetricsView AS
    SELECT
        reg.periodId,
        flo.id AS flowId,
        per.name AS periodName,
        flo.name AS flowName,
        round(sum(coalesce(reg.budget, 0)), 2) AS budget,
        round(sum(coalesce(reg.actual, 0)), 2) AS actual,
        round(sum(coalesce(reg.budget, 0) - coalesce(reg.actual, 0)), 2) AS difference
    FROM period per
    CROSS JOIN flow flo
    JOIN category cat ON cat.flowId = flo.id
    JOIN item ite ON ite.categoryId = cat.id
    JOIN register reg ON reg.periodId = per.id AND reg.itemId = ite.id
    GROUP BY reg.periodId, flo.id, per.name, flo.name;

    CREATE VIEW categoryMetricsView AS
    SELECT
        reg.periodId,
        cat.flowId,
        cat.id AS categoryId,
        per.name AS periodName,
        flo.name AS flowName,
        cat.name AS categoryName,
        round(sum(coalesce(reg.budget, 0)), 2) AS budget,
        round(sum(coalesce(reg.actual, 0)), 2) AS actual,
        round(sum(coalesce(reg.budget, 0) - coalesce(reg.actual, 0)), 2) AS difference
    FROM period per
    CROSS JOIN flow flo
    JOIN category cat ON cat.flowId = flo.id
    JOIN item ite ON ite.categoryId = cat.id
    JOIN register reg ON reg.periodId = per.id AND reg.itemId = ite.id
    GROUP BY reg.periodId, cat.flowId, cat.id, per.name, flo.name, cat.name;

    CREATE VIEW registerMetricsView AS
    SELECT
        reg.id AS registerId,
        reg.periodId,
        cat.flowId,
        ite.categoryId,
        ite.id AS itemId,
        per.name AS periodName,
        flo.name AS flowName,
        cat.name AS categoryName,
        ite.name AS itemName,
        reg.note AS note,
        round(coalesce(reg.budget, 0), 2) AS budget,
        round(coalesce(reg.actual, 0), 2) AS actual,
        round(coalesce(reg.budget, 0) - coalesce(reg.actual, 0), 2) AS difference
    FROM period per
    CROSS JOIN flow flo
    JOIN category cat ON cat.flowId = flo.id
    JOIN item ite ON ite.categoryId = cat.id
    JOIN register reg ON reg.periodId = per.id AND reg.itemId = ite.id;

    CREATE VIEW unusedMetricsView AS
    SELECT
        per.id AS periodId,
        ite.id AS itemId,
        per.name AS periodName,
        flo.name AS flowName,
        cat.name AS categoryName,
        ite.name AS itemName
    FROM period per
    CROSS JOIN flow flo
    JOIN category cat ON cat.flowId = flo.id
    JOIN item ite ON ite.categoryId = cat.id
    LEFT OUTER JOIN register reg ON reg.periodId = per.id AND reg.itemId = ite.id
    WHERE reg.id IS NULL;

    CREATE VIEW categoryMapView AS
    SELECT cat.flowId, flo.name AS flowName, cat.id AS categoryId, cat.name AS categoryName
    FROM flow flo
    JOIN category cat ON cat.flowId = flo.id;

    CREATE VIEW itemMapView AS
    SELECT
        cat.flowId, flo.name AS flowName,
        cat.id AS categoryId, cat.name AS categoryName,
        ite.id AS itemId, ite.name AS itemName
    FROM flow flo
    JOIN category cat ON cat.flowId = flo.id
    JOIN item ite ON ite.categoryId = cat.id;

    CREATE VIEW inCategoryMapView AS
    SELECT flowId, flowName, categoryId, categoryName
    FROM categoryMapView
    WHERE flowName = 'In';

    CREATE VIEW outCategoryMapView AS
    SELECT flowId, flowName, categoryId, categoryName
    FROM categoryMapView
    WHERE flowName = 'Out';

    CREATE VIEW inItemMapView AS
    SELECT flowId, flowName, categoryId, categoryName, itemId, itemName
    FROM itemMapView
    WHERE flowName = 'In';

    CREATE VIEW outItemMapView AS
    SELECT flowId, flowName, categoryId, categoryName, itemId, itemName
    FROM itemMapView
    WHERE flowName = 'Out';
"#;

/// Drop and recreate every table and view, leaving an empty store.
///
/// # Errors
///
/// Returns `CashflowError::Schema` if any DDL statement fails.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| CashflowError::Schema(format!("Cannot enable foreign keys: {}", e)))?;
    conn.execute_batch(DROP_OBJECTS)
        .map_err(|e| CashflowError::Schema(format!("Invalid drop of existing objects: {}", e)))?;
    conn.execute_batch(CREATE_TABLES)
        .map_err(|e| CashflowError::Schema(format!("Invalid create of tables: {}", e)))?;
    conn.execute_batch(CREATE_VIEWS)
        .map_err(|e| CashflowError::Schema(format!("Invalid create of views: {}", e)))?;

    let created_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO meta (key, value) VALUES ('format_version', ?1), ('created_at', ?2)",
        (FORMAT_VERSION, created_at),
    )
    .map_err(|e| CashflowError::Schema(format!("Invalid insert of metadata: {}", e)))?;
    Ok(())
}

/// Kind of view-level mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// The derived views of a budget file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    PeriodMetrics,
    FlowMetrics,
    CategoryMetrics,
    RegisterMetrics,
    UnusedMetrics,
    CategoryMap,
    ItemMap,
    InCategoryMap,
    OutCategoryMap,
    InItemMap,
    OutItemMap,
}

impl View {
    pub const ALL: [View; 11] = [
        View::PeriodMetrics,
        View::FlowMetrics,
        View::CategoryMetrics,
        View::RegisterMetrics,
        View::UnusedMetrics,
        View::CategoryMap,
        View::ItemMap,
        View::InCategoryMap,
        View::OutCategoryMap,
        View::InItemMap,
        View::OutItemMap,
    ];

    /// SQL name of the view.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::PeriodMetrics => "periodMetricsView",
            View::FlowMetrics => "flowMetricsView",
            View::CategoryMetrics => "categoryMetricsView",
            View::RegisterMetrics => "registerMetricsView",
            View::UnusedMetrics => "unusedMetricsView",
            View::CategoryMap => "categoryMapView",
            View::ItemMap => "itemMapView",
            View::InCategoryMap => "inCategoryMapView",
            View::OutCategoryMap => "outCategoryMapView",
            View::InItemMap => "inItemMapView",
            View::OutItemMap => "outItemMapView",
        }
    }

    /// Whether the view accepts writes of the given kind.
    ///
    /// Flow, category and unused metrics are aggregates and never writable.
    pub fn accepts(&self, operation: Operation) -> bool {
        !matches!(
            (self, operation),
            (View::FlowMetrics, _) | (View::CategoryMetrics, _) | (View::UnusedMetrics, _)
        )
    }

    /// Views whose content can change when this view is written to.
    pub fn dependents(&self) -> Vec<View> {
        match self {
            View::PeriodMetrics | View::RegisterMetrics => vec![
                View::PeriodMetrics,
                View::FlowMetrics,
                View::CategoryMetrics,
                View::RegisterMetrics,
                View::UnusedMetrics,
            ],
            _ => View::ALL.to_vec(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = CashflowError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        View::ALL
            .iter()
            .copied()
            .find(|view| view.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CashflowError::Validation(format!("Unknown view \"{}\"", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_schema_builds_every_view() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();

        for view in View::ALL {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name = ?",
                    [view.as_str()],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing view {}", view);
        }
    }

    #[test]
    fn test_create_schema_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn.execute("INSERT INTO period (id, name) VALUES ('p', 'Jan')", [])
            .unwrap();
        create_schema(&conn).unwrap();

        let periods: i64 = conn
            .query_row("SELECT COUNT(*) FROM period", [], |row| row.get(0))
            .unwrap();
        assert_eq!(periods, 0);
    }

    #[test]
    fn test_view_names_round_trip() {
        for view in View::ALL {
            assert_eq!(view.as_str().parse::<View>().unwrap(), view);
        }
        assert!("nopeView".parse::<View>().is_err());
    }

    #[test]
    fn test_aggregate_views_are_read_only() {
        assert!(!View::FlowMetrics.accepts(Operation::Update));
        assert!(!View::UnusedMetrics.accepts(Operation::Insert));
        assert!(View::RegisterMetrics.accepts(Operation::Delete));
        assert!(View::InItemMap.accepts(Operation::Insert));
    }

    #[test]
    fn test_view_serializes_as_sql_name() {
        let json = serde_json::to_string(&View::PeriodMetrics).unwrap();
        assert_eq!(json, "\"periodMetricsView\"");
    }
}
