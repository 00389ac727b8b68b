//! Register value constraints.
//!
//! Budget and actual amounts must be non-negative and the budget may not fall
//! below the actual. Violations are corrected in place rather than rejected;
//! each adjustment is reported back as a [`Correction`].

use serde::Serialize;
use tracing::warn;

use crate::error::{CashflowError, Result};

/// Which register amount was adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    Budget,
    Actual,
}

/// Notice that an input amount was changed before being stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    pub field: AmountField,
    pub from: f64,
    pub to: f64,
    pub reason: &'static str,
}

/// Round to whole cents.
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // fold -0.0 into 0.0 so equal amounts compare and serialize the same
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Clamp a budget/actual pair into a storable state.
///
/// # Errors
///
/// Returns `CashflowError::Validation` for NaN or infinite amounts, which
/// have no sensible correction.
pub fn normalize_amounts(budget: f64, actual: f64) -> Result<(f64, f64, Vec<Correction>)> {
    if !budget.is_finite() || !actual.is_finite() {
        return Err(CashflowError::Validation(
            "Budget and actual must be finite numbers".to_string(),
        ));
    }

    let mut corrections = Vec::new();
    let mut budget = round_cents(budget);
    let mut actual = round_cents(actual);

    if actual < 0.0 {
        corrections.push(Correction {
            field: AmountField::Actual,
            from: actual,
            to: 0.0,
            reason: "actual cannot be negative",
        });
        actual = 0.0;
    }
    if budget < 0.0 {
        corrections.push(Correction {
            field: AmountField::Budget,
            from: budget,
            to: 0.0,
            reason: "budget cannot be negative",
        });
        budget = 0.0;
    }
    if budget < actual {
        corrections.push(Correction {
            field: AmountField::Budget,
            from: budget,
            to: actual,
            reason: "budget cannot be less than actual",
        });
        budget = actual;
    }

    for correction in &corrections {
        warn!(
            field = ?correction.field,
            from = correction.from,
            to = correction.to,
            "register amount corrected: {}",
            correction.reason
        );
    }

    Ok((budget, actual, corrections))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_amounts_pass_through() {
        let (budget, actual, corrections) = normalize_amounts(100.0, 40.5).unwrap();
        assert_eq!(budget, 100.0);
        assert_eq!(actual, 40.5);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_negative_budget_raised_to_actual() {
        let (budget, actual, corrections) = normalize_amounts(-5.0, 10.0).unwrap();
        assert_eq!(budget, 10.0);
        assert_eq!(actual, 10.0);
        assert_eq!(corrections.last().unwrap().field, AmountField::Budget);
        assert_eq!(corrections.last().unwrap().to, 10.0);
    }

    #[test]
    fn test_negative_actual_zeroed() {
        let (budget, actual, corrections) = normalize_amounts(5.0, -3.0).unwrap();
        assert_eq!(budget, 5.0);
        assert_eq!(actual, 0.0);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].field, AmountField::Actual);
    }

    #[test]
    fn test_amounts_rounded_to_cents() {
        let (budget, actual, corrections) = normalize_amounts(10.004, 2.126).unwrap();
        assert_eq!(budget, 10.0);
        assert_eq!(actual, 2.13);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(normalize_amounts(f64::NAN, 0.0).is_err());
        assert!(normalize_amounts(0.0, f64::INFINITY).is_err());
    }
}
