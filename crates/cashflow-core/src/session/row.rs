//! Mapping of SQLite rows onto model types.

use rusqlite::Row;

use crate::id::Id;
use crate::model::{
    Category, CategoryMap, CategoryMetrics, Flow, FlowMetrics, Item, ItemMap, Period,
    PeriodMetrics, RegisterEntry, RegisterMetrics, UnusedMetrics,
};

pub(crate) fn id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Id> {
    row.get(idx)
}

pub(crate) fn period(row: &Row<'_>) -> rusqlite::Result<Period> {
    Ok(Period {
        id: id_at(row, 0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn flow(row: &Row<'_>) -> rusqlite::Result<Flow> {
    Ok(Flow {
        id: id_at(row, 0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        flow_id: id_at(row, 2)?,
    })
}

pub(crate) fn item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        category_id: id_at(row, 2)?,
    })
}

pub(crate) fn register_entry(row: &Row<'_>) -> rusqlite::Result<RegisterEntry> {
    Ok(RegisterEntry {
        id: id_at(row, 0)?,
        period_id: id_at(row, 1)?,
        item_id: id_at(row, 2)?,
        budget: row.get(3)?,
        actual: row.get(4)?,
        note: row.get(5)?,
    })
}

pub(crate) fn period_metrics(row: &Row<'_>) -> rusqlite::Result<PeriodMetrics> {
    Ok(PeriodMetrics {
        period_id: id_at(row, 0)?,
        period_name: row.get(1)?,
        budget_balance: row.get(2)?,
        actual_balance: row.get(3)?,
        difference_balance: row.get(4)?,
    })
}

pub(crate) fn flow_metrics(row: &Row<'_>) -> rusqlite::Result<FlowMetrics> {
    Ok(FlowMetrics {
        period_id: id_at(row, 0)?,
        flow_id: id_at(row, 1)?,
        period_name: row.get(2)?,
        flow_name: row.get(3)?,
        budget: row.get(4)?,
        actual: row.get(5)?,
        difference: row.get(6)?,
    })
}

pub(crate) fn category_metrics(row: &Row<'_>) -> rusqlite::Result<CategoryMetrics> {
    Ok(CategoryMetrics {
        period_id: id_at(row, 0)?,
        flow_id: id_at(row, 1)?,
        category_id: id_at(row, 2)?,
        period_name: row.get(3)?,
        flow_name: row.get(4)?,
        category_name: row.get(5)?,
        budget: row.get(6)?,
        actual: row.get(7)?,
        difference: row.get(8)?,
    })
}

pub(crate) fn register_metrics(row: &Row<'_>) -> rusqlite::Result<RegisterMetrics> {
    Ok(RegisterMetrics {
        register_id: id_at(row, 0)?,
        period_id: id_at(row, 1)?,
        flow_id: id_at(row, 2)?,
        category_id: id_at(row, 3)?,
        item_id: id_at(row, 4)?,
        period_name: row.get(5)?,
        flow_name: row.get(6)?,
        category_name: row.get(7)?,
        item_name: row.get(8)?,
        note: row.get(9)?,
        budget: row.get(10)?,
        actual: row.get(11)?,
        difference: row.get(12)?,
    })
}

pub(crate) fn unused_metrics(row: &Row<'_>) -> rusqlite::Result<UnusedMetrics> {
    Ok(UnusedMetrics {
        period_id: id_at(row, 0)?,
        item_id: id_at(row, 1)?,
        period_name: row.get(2)?,
        flow_name: row.get(3)?,
        category_name: row.get(4)?,
        item_name: row.get(5)?,
    })
}

pub(crate) fn category_map(row: &Row<'_>) -> rusqlite::Result<CategoryMap> {
    Ok(CategoryMap {
        flow_id: id_at(row, 0)?,
        flow_name: row.get(1)?,
        category_id: id_at(row, 2)?,
        category_name: row.get(3)?,
    })
}

pub(crate) fn item_map(row: &Row<'_>) -> rusqlite::Result<ItemMap> {
    Ok(ItemMap {
        flow_id: id_at(row, 0)?,
        flow_name: row.get(1)?,
        category_id: id_at(row, 2)?,
        category_name: row.get(3)?,
        item_id: id_at(row, 4)?,
        item_name: row.get(5)?,
    })
}
