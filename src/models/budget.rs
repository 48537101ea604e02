//! The budget type: a monthly spending limit for one category, or for a
//! whole profile.

use serde::{Deserialize, Serialize};

use super::category::CategoryId;

/// Database identifier for a budget.
pub type BudgetId = i64;

/// A spending budget for one calendar month.
///
/// The `spent`, `remaining`, `percentage`, `is_warning` and `is_exceeded`
/// fields are derived by the server from the profile's transactions; the
/// client deserializes them as-is and never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The budget's ID in the backend database.
    pub id: BudgetId,
    /// The category the budget applies to. `None` means the budget covers
    /// the whole profile.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The amount of money budgeted for the month.
    pub amount: f64,
    /// The percentage of `amount` (50 to 100) at which the budget is
    /// flagged as a warning.
    pub alert_threshold: f64,
    /// The calendar month the budget applies to, 1 to 12.
    pub month: u8,
    /// The calendar year the budget applies to.
    pub year: i32,
    /// How much has been spent against this budget so far.
    pub spent: f64,
    /// How much of `amount` is left.
    pub remaining: f64,
    /// `spent` as a percentage of `amount`.
    pub percentage: f64,
    /// Whether spending has crossed `alert_threshold` percent of `amount`.
    pub is_warning: bool,
    /// Whether spending has exceeded `amount`.
    pub is_exceeded: bool,
}

/// The request body for creating a budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudget {
    /// The category the budget applies to, `None` for an overall budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// The amount of money budgeted for the month.
    pub amount: f64,
    /// The warning threshold as a percentage, 50 to 100.
    pub alert_threshold: f64,
    /// The calendar month the budget applies to, 1 to 12.
    pub month: u8,
    /// The calendar year the budget applies to.
    pub year: i32,
}

/// The request body for updating a budget. Fields left as `None` are
/// omitted and keep their server-side value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetChanges {
    /// A new budgeted amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// A new warning threshold as a percentage, 50 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<f64>,
}
