use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;

/// A named budget category with a planned spending cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEnvelope {
    pub id: i64,
    pub trip_id: i64,
    pub category: String,
    pub planned_amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeCreate {
    pub trip_id: i64,
    pub category: String,
    pub planned_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `notes: Some(None)` clears the notes; `None` leaves them alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvelopeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub trip_id: i64,
    /// `None` means the expense is uncategorized.
    #[serde(default)]
    pub envelope_id: Option<i64>,
    #[serde(default)]
    pub event_id: Option<i64>,
    pub description: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(with = "iso_date")]
    pub spent_at_date: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseCreate {
    pub trip_id: i64,
    pub envelope_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    #[serde(with = "iso_date")]
    pub spent_at_date: Date,
}

/// Aggregate returned by `GET /trips/{id}/budget`.
///
/// The detailed lists are optional on the wire; the totals are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub trip_id: i64,
    #[serde(default)]
    pub total_planned: f64,
    #[serde(default)]
    pub total_actual: f64,
    #[serde(default)]
    pub envelopes: Vec<BudgetEnvelope>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

pub fn default_currency() -> String {
    "USD".to_string()
}
