//! Core data types for the budget store.
//!
//! Base-table records (`Period`, `Flow`, `Category`, `Item`, `RegisterEntry`)
//! and the read-side rows produced by the metrics and map views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::id::Id;

use crate::error::CashflowError;

/// Direction of money movement. Exactly one flow row exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
    In,
    Out,
}

impl FlowKind {
    /// Name stored in the `flow` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::In => "In",
            FlowKind::Out => "Out",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = CashflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(FlowKind::In),
            "out" => Ok(FlowKind::Out),
            other => Err(CashflowError::Validation(format!(
                "Unknown flow \"{}\" (expected In or Out)",
                other
            ))),
        }
    }
}

/// A budget time period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: Id,
    pub name: String,
}

/// One of the two permanent flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: Id,
    pub name: String,
}

/// A named grouping of items under one flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub flow_id: Id,
}

/// A budget line template under one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Id,
    pub name: String,
    pub category_id: Id,
}

/// The editable values of a register row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterValues {
    pub budget: f64,
    pub actual: f64,
    pub note: String,
}

/// One item's budget/actual/note for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub id: Id,
    pub period_id: Id,
    pub item_id: Id,
    pub budget: f64,
    pub actual: f64,
    pub note: String,
}

impl RegisterEntry {
    pub fn values(&self) -> RegisterValues {
        RegisterValues {
            budget: self.budget,
            actual: self.actual,
            note: self.note.clone(),
        }
    }
}

/// Row of `periodMetricsView`: signed balances per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub period_id: Id,
    pub period_name: String,
    pub budget_balance: f64,
    pub actual_balance: f64,
    pub difference_balance: f64,
}

/// Row of `flowMetricsView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub period_id: Id,
    pub flow_id: Id,
    pub period_name: String,
    pub flow_name: String,
    pub budget: f64,
    pub actual: f64,
    pub difference: f64,
}

/// Row of `categoryMetricsView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub period_id: Id,
    pub flow_id: Id,
    pub category_id: Id,
    pub period_name: String,
    pub flow_name: String,
    pub category_name: String,
    pub budget: f64,
    pub actual: f64,
    pub difference: f64,
}

/// Row of `registerMetricsView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterMetrics {
    pub register_id: Id,
    pub period_id: Id,
    pub flow_id: Id,
    pub category_id: Id,
    pub item_id: Id,
    pub period_name: String,
    pub flow_name: String,
    pub category_name: String,
    pub item_name: String,
    pub note: String,
    pub budget: f64,
    pub actual: f64,
    pub difference: f64,
}

/// Row of `unusedMetricsView`: an item not yet registered in a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedMetrics {
    pub period_id: Id,
    pub item_id: Id,
    pub period_name: String,
    pub flow_name: String,
    pub category_name: String,
    pub item_name: String,
}

/// Row of the category map views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub flow_id: Id,
    pub flow_name: String,
    pub category_id: Id,
    pub category_name: String,
}

/// Row of the item map views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMap {
    pub flow_id: Id,
    pub flow_name: String,
    pub category_id: Id,
    pub category_name: String,
    pub item_id: Id,
    pub item_name: String,
}

/// Sorted snapshot of every base table except the undo log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreContents {
    pub periods: Vec<Period>,
    pub flows: Vec<Flow>,
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub register: Vec<RegisterEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_kind_parse() {
        assert_eq!("in".parse::<FlowKind>().unwrap(), FlowKind::In);
        assert_eq!(" OUT ".parse::<FlowKind>().unwrap(), FlowKind::Out);
        assert!("sideways".parse::<FlowKind>().is_err());
    }
}
