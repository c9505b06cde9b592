use time::{Date, Duration};
use trip_api::{format_iso_date, Event, EventCreate, EventUpdate};

use super::forms::{date_field, optional, optional_amount, optional_time, required, Form, FormError};

pub const EVENT_TITLE: usize = 0;
pub const EVENT_TYPE: usize = 1;
pub const EVENT_DATE: usize = 2;
pub const EVENT_START: usize = 3;
pub const EVENT_END: usize = 4;
pub const EVENT_COST: usize = 5;
pub const EVENT_NOTES: usize = 6;

const DEFAULT_EVENT_TYPE: &str = "activity";

/// One calendar day of the itinerary with its events in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan<'a> {
    pub date: Date,
    pub events: Vec<&'a Event>,
}

/// A selectable line of the itinerary list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItineraryRow<'a> {
    Day(Date),
    Event(&'a Event),
}

impl ItineraryRow<'_> {
    pub fn date(&self) -> Date {
        match self {
            ItineraryRow::Day(date) => *date,
            ItineraryRow::Event(event) => event.date,
        }
    }
}

/// Every date from `start` to `end`, both included. Empty if `end < start`.
pub fn day_range(start: Date, end: Date) -> Vec<Date> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Order events by their "HH:MM" start string. Events without a start time
/// come first. Comparison is lexical, so times must be zero-padded.
pub fn sort_by_start_time(events: &mut [&Event]) {
    events.sort_by(|a, b| {
        a.start_time
            .as_deref()
            .unwrap_or("")
            .cmp(b.start_time.as_deref().unwrap_or(""))
    });
}

/// Group events under each day of the trip. Events dated outside the trip
/// range are not part of the itinerary.
pub fn plan_days(start: Date, end: Date, events: &[Event]) -> Vec<DayPlan<'_>> {
    day_range(start, end)
        .into_iter()
        .map(|date| {
            let mut day_events: Vec<&Event> = events.iter().filter(|e| e.date == date).collect();
            sort_by_start_time(&mut day_events);
            DayPlan {
                date,
                events: day_events,
            }
        })
        .collect()
}

pub fn itinerary_rows<'a>(plans: &[DayPlan<'a>]) -> Vec<ItineraryRow<'a>> {
    plans
        .iter()
        .flat_map(|plan| {
            std::iter::once(ItineraryRow::Day(plan.date))
                .chain(plan.events.iter().copied().map(ItineraryRow::Event))
        })
        .collect()
}

pub fn new_event_form(date: Date) -> Form {
    Form::new(&["Title", "Type", "Date", "Start time", "End time", "Cost", "Notes"])
        .with_value(EVENT_TYPE, DEFAULT_EVENT_TYPE)
        .with_value(EVENT_DATE, &format_iso_date(date))
}

pub fn event_form_from(event: &Event) -> Form {
    let mut form = new_event_form(event.date)
        .with_value(EVENT_TITLE, &event.title)
        .with_value(EVENT_TYPE, &event.kind);
    if let Some(start) = event.start_label() {
        form.set_value(EVENT_START, start);
    }
    if let Some(end) = event.end_label() {
        form.set_value(EVENT_END, end);
    }
    if let Some(cost) = event.cost {
        form.set_value(EVENT_COST, &format!("{:.2}", cost));
    }
    if let Some(notes) = &event.notes {
        form.set_value(EVENT_NOTES, notes);
    }
    form
}

pub fn event_create_from(form: &Form, trip_id: i64) -> Result<EventCreate, FormError> {
    let title = required(form, EVENT_TITLE)?.to_string();
    let date = date_field(form, EVENT_DATE)?;
    Ok(EventCreate {
        trip_id,
        title,
        kind: optional(form, EVENT_TYPE).unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
        location_id: None,
        date,
        start_time: optional_time(form, EVENT_START)?,
        end_time: optional_time(form, EVENT_END)?,
        cost: optional_amount(form, EVENT_COST)?,
        notes: optional(form, EVENT_NOTES),
    })
}

/// Every form field is sent, so a field emptied in the form is cleared on
/// the backend. The event's location is not on the form and is left alone.
pub fn event_update_from(form: &Form) -> Result<EventUpdate, FormError> {
    let create = event_create_from(form, 0)?;
    Ok(EventUpdate {
        title: Some(create.title),
        kind: Some(create.kind),
        date: Some(create.date),
        location_id: None,
        start_time: Some(create.start_time),
        end_time: Some(create.end_time),
        cost: Some(create.cost),
        notes: Some(create.notes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn event(id: i64, date: Date, start: Option<&str>) -> Event {
        Event {
            id,
            trip_id: 1,
            location_id: None,
            title: format!("event {id}"),
            kind: "activity".to_string(),
            date,
            start_time: start.map(str::to_string),
            end_time: None,
            cost: None,
            notes: None,
        }
    }

    #[test]
    fn day_range_is_inclusive_and_consecutive() {
        let cases = [
            (date!(2024 - 05 - 01), date!(2024 - 05 - 05)),
            (date!(2024 - 02 - 27), date!(2024 - 03 - 02)),
            (date!(2023 - 12 - 30), date!(2024 - 01 - 02)),
            (date!(2024 - 06 - 10), date!(2024 - 06 - 10)),
        ];
        for (start, end) in cases {
            let days = day_range(start, end);
            let expected = (end - start).whole_days() + 1;
            assert_eq!(days.len() as i64, expected);
            assert_eq!(days.first(), Some(&start));
            assert_eq!(days.last(), Some(&end));
            for pair in days.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn day_range_crosses_leap_day() {
        let labels: Vec<String> = day_range(date!(2024 - 02 - 28), date!(2024 - 03 - 01))
            .into_iter()
            .map(format_iso_date)
            .collect();
        assert_eq!(labels, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(day_range(date!(2024 - 05 - 05), date!(2024 - 05 - 01)).is_empty());
    }

    #[test]
    fn events_within_a_day_sort_by_start_time() {
        let events = vec![
            event(1, date!(2024 - 05 - 02), Some("09:00")),
            event(2, date!(2024 - 05 - 02), Some("08:00")),
        ];
        let plans = plan_days(date!(2024 - 05 - 01), date!(2024 - 05 - 03), &events);

        assert_eq!(plans.len(), 3);
        assert!(plans[0].events.is_empty());
        let ids: Vec<i64> = plans[1].events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn untimed_events_lead_the_day() {
        let events = vec![
            event(1, date!(2024 - 05 - 02), Some("07:30")),
            event(2, date!(2024 - 05 - 02), None),
        ];
        let plans = plan_days(date!(2024 - 05 - 02), date!(2024 - 05 - 02), &events);
        let ids: Vec<i64> = plans[0].events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn rows_interleave_days_and_events() {
        let events = vec![event(7, date!(2024 - 05 - 01), Some("10:00"))];
        let plans = plan_days(date!(2024 - 05 - 01), date!(2024 - 05 - 02), &events);
        let rows = itinerary_rows(&plans);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ItineraryRow::Day(date!(2024 - 05 - 01)));
        assert!(matches!(rows[1], ItineraryRow::Event(e) if e.id == 7));
        assert_eq!(rows[2].date(), date!(2024 - 05 - 02));
    }

    #[test]
    fn event_form_requires_title_and_date() {
        let form = new_event_form(date!(2024 - 05 - 02));
        assert_eq!(
            event_create_from(&form, 1),
            Err(FormError::Required("Title"))
        );

        let form = form
            .with_value(EVENT_TITLE, "Vatican Museums")
            .with_value(EVENT_START, "9:30")
            .with_value(EVENT_COST, "32");
        let create = event_create_from(&form, 1).unwrap();
        assert_eq!(create.date, date!(2024 - 05 - 02));
        assert_eq!(create.start_time.as_deref(), Some("09:30"));
        assert_eq!(create.cost, Some(32.0));
        assert_eq!(create.kind, "activity");

        let no_date = form.with_value(EVENT_DATE, "");
        assert_eq!(
            event_create_from(&no_date, 1),
            Err(FormError::Required("Date"))
        );
    }

    #[test]
    fn end_time_is_normalized_like_start_time() {
        let form = new_event_form(date!(2024 - 05 - 02))
            .with_value(EVENT_TITLE, "Vatican Museums")
            .with_value(EVENT_END, "7:05");
        assert_eq!(
            event_create_from(&form, 1).unwrap().end_time.as_deref(),
            Some("07:05")
        );

        let bad = form.with_value(EVENT_END, "7pm");
        assert_eq!(
            event_create_from(&bad, 1),
            Err(FormError::InvalidTime("End time"))
        );
    }

    #[test]
    fn emptied_fields_clear_on_update() {
        let mut original = event(4, date!(2024 - 05 - 02), Some("07:45"));
        original.end_time = Some("09:00:00".to_string());
        original.notes = Some("Window seat".to_string());
        let mut form = event_form_from(&original);
        assert_eq!(form.value(EVENT_END), "09:00");

        form.set_value(EVENT_START, "");
        form.set_value(EVENT_NOTES, "");
        let update = event_update_from(&form).unwrap();

        assert_eq!(update.start_time, Some(None));
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.end_time, Some(Some("09:00".to_string())));
        assert_eq!(update.location_id, None);
    }
}
