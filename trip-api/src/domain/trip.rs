use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    pub name: String,
    pub destination: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

impl Trip {
    /// Number of calendar days covered by the trip, both ends included.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).whole_days() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripCreate {
    pub name: String,
    pub destination: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "iso_date::option"
    )]
    pub start_date: Option<Date>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "iso_date::option"
    )]
    pub end_date: Option<Date>,
}
