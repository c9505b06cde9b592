use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub trip_id: i64,
    #[serde(default)]
    pub location_id: Option<i64>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    /// "HH:MM" or "HH:MM:SS", exactly as the backend sent it.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Event {
    /// Start time trimmed to "HH:MM" for display.
    pub fn start_label(&self) -> Option<&str> {
        self.start_time.as_deref().map(clock_label)
    }

    pub fn end_label(&self) -> Option<&str> {
        self.end_time.as_deref().map(clock_label)
    }
}

fn clock_label(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCreate {
    pub trip_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial event update. Nullable fields are doubly optional: `None` leaves
/// the field alone, `Some(None)` is sent as `null` and clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "iso_date::option"
    )]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn decodes_backend_event() {
        let raw = r#"{
            "id": 12,
            "trip_id": 3,
            "location_id": null,
            "date": "2024-05-02",
            "start_time": "09:30:00",
            "end_time": null,
            "title": "Colosseum tour",
            "type": "activity",
            "cost": 45.5,
            "notes": null
        }"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.date, date!(2024 - 05 - 02));
        assert_eq!(event.kind, "activity");
        assert_eq!(event.start_label(), Some("09:30"));
        assert_eq!(event.cost, Some(45.5));
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = EventUpdate {
            title: Some("Dinner".to_string()),
            date: Some(date!(2024 - 05 - 03)),
            ..EventUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "Dinner", "date": "2024-05-03" })
        );
    }

    #[test]
    fn cleared_fields_are_sent_as_null() {
        let update = EventUpdate {
            start_time: Some(None),
            end_time: Some(Some("11:00".to_string())),
            notes: Some(None),
            ..EventUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "start_time": null, "end_time": "11:00", "notes": null })
        );
    }
}
