//! Read-side queries over base tables and views.

use rusqlite::{OptionalExtension, Params, Row};

use super::{row, Session};
use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::{
    Category, CategoryMap, CategoryMetrics, FlowKind, FlowMetrics, Item, ItemMap, Period,
    PeriodMetrics, RegisterEntry, RegisterMetrics, StoreContents, UnusedMetrics,
};

impl Session {
    fn query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let mut out = Vec::new();
        for item in rows {
            out.push(item?);
        }
        Ok(out)
    }

    fn query_one<T, P, F>(&self, sql: &str, params: P, map: F, what: &str) -> Result<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.conn
            .query_row(sql, params, map)
            .optional()?
            .ok_or_else(|| CashflowError::MissingReference(what.to_string()))
    }

    /// # Errors
    ///
    /// Returns `CashflowError::MissingReference` if no period has this id.
    pub fn period(&self, id: &Id) -> Result<Period> {
        self.query_one(
            "SELECT id, name FROM period WHERE id = ?",
            [id],
            row::period,
            &format!("period {}", id),
        )
    }

    pub fn category(&self, id: &Id) -> Result<Category> {
        self.query_one(
            "SELECT id, name, flowId FROM category WHERE id = ?",
            [id],
            row::category,
            &format!("category {}", id),
        )
    }

    pub fn item(&self, id: &Id) -> Result<Item> {
        self.query_one(
            "SELECT id, name, categoryId FROM item WHERE id = ?",
            [id],
            row::item,
            &format!("item {}", id),
        )
    }

    pub fn register_entry(&self, id: &Id) -> Result<RegisterEntry> {
        self.query_one(
            "SELECT id, periodId, itemId, budget, actual, note FROM register WHERE id = ?",
            [id],
            row::register_entry,
            &format!("register entry {}", id),
        )
    }

    /// The register entry for an item in a period, if it is registered.
    pub fn find_register(&self, period_id: &Id, item_id: &Id) -> Result<Option<RegisterEntry>> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, periodId, itemId, budget, actual, note
                FROM register
                WHERE periodId = ? AND itemId = ?
                "#,
                (period_id, item_id),
                row::register_entry,
            )
            .optional()?)
    }

    /// Register entries of one period, in insertion order.
    pub fn register_entries(&self, period_id: &Id) -> Result<Vec<RegisterEntry>> {
        self.query_rows(
            r#"
            SELECT id, periodId, itemId, budget, actual, note
            FROM register
            WHERE periodId = ?
            ORDER BY rowid
            "#,
            [period_id],
            row::register_entry,
        )
    }

    /// Every period with its balances, in creation order.
    pub fn periods(&self) -> Result<Vec<PeriodMetrics>> {
        self.query_rows(
            r#"
            SELECT v.periodId, v.periodName, v.budgetBalance, v.actualBalance, v.differenceBalance
            FROM periodMetricsView v
            JOIN period per ON per.id = v.periodId
            ORDER BY per.rowid
            "#,
            [],
            row::period_metrics,
        )
    }

    pub fn flow_metrics(&self, period_id: &Id) -> Result<Vec<FlowMetrics>> {
        self.query_rows(
            r#"
            SELECT periodId, flowId, periodName, flowName, budget, actual, difference
            FROM flowMetricsView
            WHERE periodId = ?
            ORDER BY flowName
            "#,
            [period_id],
            row::flow_metrics,
        )
    }

    pub fn category_metrics(&self, period_id: &Id) -> Result<Vec<CategoryMetrics>> {
        self.query_rows(
            r#"
            SELECT periodId, flowId, categoryId, periodName, flowName, categoryName,
                   budget, actual, difference
            FROM categoryMetricsView
            WHERE periodId = ?
            ORDER BY flowName, categoryName
            "#,
            [period_id],
            row::category_metrics,
        )
    }

    pub fn register_metrics(&self, period_id: &Id) -> Result<Vec<RegisterMetrics>> {
        self.query_rows(
            r#"
            SELECT registerId, periodId, flowId, categoryId, itemId, periodName, flowName,
                   categoryName, itemName, note, budget, actual, difference
            FROM registerMetricsView
            WHERE periodId = ?
            ORDER BY flowName, categoryName, itemName
            "#,
            [period_id],
            row::register_metrics,
        )
    }

    /// Items not yet registered in the period.
    pub fn unused_metrics(&self, period_id: &Id) -> Result<Vec<UnusedMetrics>> {
        self.query_rows(
            r#"
            SELECT periodId, itemId, periodName, flowName, categoryName, itemName
            FROM unusedMetricsView
            WHERE periodId = ?
            ORDER BY flowName, categoryName, itemName
            "#,
            [period_id],
            row::unused_metrics,
        )
    }

    /// Categories of one flow, or of both when `flow` is `None`.
    pub fn category_map(&self, flow: Option<FlowKind>) -> Result<Vec<CategoryMap>> {
        let view = match flow {
            None => "categoryMapView",
            Some(FlowKind::In) => "inCategoryMapView",
            Some(FlowKind::Out) => "outCategoryMapView",
        };
        self.query_rows(
            &format!(
                "SELECT flowId, flowName, categoryId, categoryName FROM {} \
                 ORDER BY flowName, categoryName",
                view
            ),
            [],
            row::category_map,
        )
    }

    /// Items of one flow, or of both when `flow` is `None`.
    pub fn item_map(&self, flow: Option<FlowKind>) -> Result<Vec<ItemMap>> {
        let view = match flow {
            None => "itemMapView",
            Some(FlowKind::In) => "inItemMapView",
            Some(FlowKind::Out) => "outItemMapView",
        };
        self.query_rows(
            &format!(
                "SELECT flowId, flowName, categoryId, categoryName, itemId, itemName FROM {} \
                 ORDER BY flowName, categoryName, itemName",
                view
            ),
            [],
            row::item_map,
        )
    }

    pub fn category_has_items(&self, category_id: &Id) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM item WHERE categoryId = ?)",
            [category_id],
            |row| row.get(0),
        )?)
    }

    pub fn item_in_register(&self, item_id: &Id) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM register WHERE itemId = ?)",
            [item_id],
            |row| row.get(0),
        )?)
    }

    /// Snapshot of every base table except the log, each sorted by id.
    pub fn contents(&self) -> Result<StoreContents> {
        Ok(StoreContents {
            periods: self.query_rows("SELECT id, name FROM period ORDER BY id", [], row::period)?,
            flows: self.query_rows("SELECT id, name FROM flow ORDER BY id", [], row::flow)?,
            categories: self.query_rows(
                "SELECT id, name, flowId FROM category ORDER BY id",
                [],
                row::category,
            )?,
            items: self.query_rows(
                "SELECT id, name, categoryId FROM item ORDER BY id",
                [],
                row::item,
            )?,
            register: self.query_rows(
                "SELECT id, periodId, itemId, budget, actual, note FROM register ORDER BY id",
                [],
                row::register_entry,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::DEFAULT_CATALOG;

    #[test]
    fn test_map_views_split_by_flow() {
        let session = Session::new_database().unwrap();
        let all = session.category_map(None).unwrap();
        let inflow = session.category_map(Some(FlowKind::In)).unwrap();
        let outflow = session.category_map(Some(FlowKind::Out)).unwrap();

        assert_eq!(all.len(), DEFAULT_CATALOG.len());
        assert_eq!(inflow.len() + outflow.len(), all.len());
        assert!(inflow.iter().all(|row| row.flow_name == "In"));
    }

    #[test]
    fn test_new_period_lists_every_item_as_unused() {
        let mut session = Session::new_database().unwrap();
        let period = session.add_period("Jan").unwrap().row_id.unwrap();
        let unused = session.unused_metrics(&period).unwrap();
        assert_eq!(unused.len(), session.item_map(None).unwrap().len());
    }

    #[test]
    fn test_period_balances_are_signed_by_flow() {
        let mut session = Session::new_database().unwrap();
        let period = session.add_period("Jan").unwrap().row_id.unwrap();
        let items = session.item_map(None).unwrap();
        let salary = items.iter().find(|i| i.category_name == "Salary").unwrap();
        let rent = items.iter().find(|i| i.item_name == "Rent").unwrap();
        session
            .register_item(&period, &salary.item_id, 3000.0, 2900.0, "")
            .unwrap();
        session
            .register_item(&period, &rent.item_id, 1200.0, 1200.0, "")
            .unwrap();

        let balances = &session.periods().unwrap()[0];
        assert_eq!(balances.budget_balance, 1800.0);
        assert_eq!(balances.actual_balance, 1700.0);
        assert_eq!(balances.difference_balance, 100.0);

        let flows = session.flow_metrics(&period).unwrap();
        assert_eq!(flows.len(), 2);
        let categories = session.category_metrics(&period).unwrap();
        assert_eq!(categories.len(), 2);
    }
}
