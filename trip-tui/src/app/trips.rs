use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use time::{Date, Duration, Weekday};
use trip_api::{format_iso_date, Trip, TripCreate, TripUpdate};

use super::forms::{date_field, required, Form, FormError};
use super::TextInput;

pub const TRIP_NAME: usize = 0;
pub const TRIP_DESTINATION: usize = 1;
pub const TRIP_START: usize = 2;
pub const TRIP_END: usize = 3;

const WEEKEND_TEMPLATE_NAME: &str = "Weekend Getaway";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TripFilter {
    Upcoming,
    Past,
    #[default]
    All,
}

impl TripFilter {
    pub const ALL: [TripFilter; 3] = [TripFilter::Upcoming, TripFilter::Past, TripFilter::All];

    /// Upcoming trips have not ended yet; a trip ending today still counts.
    pub fn matches(self, trip: &Trip, today: Date) -> bool {
        match self {
            TripFilter::Upcoming => trip.end_date >= today,
            TripFilter::Past => trip.end_date < today,
            TripFilter::All => true,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TripFilter::Upcoming => TripFilter::Past,
            TripFilter::Past => TripFilter::All,
            TripFilter::All => TripFilter::Upcoming,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TripFilter::Upcoming => "Upcoming",
            TripFilter::Past => "Past",
            TripFilter::All => "All",
        }
    }
}

/// View state of the trip list screen.
#[derive(Debug, Clone, Default)]
pub struct TripsPage {
    pub trips: Vec<Trip>,
    pub filter: TripFilter,
    pub search_input: TextInput,
    pub searching: bool,
    pub selected: usize,
    /// The "new trip" form, when open.
    pub form: Option<Form>,
}

impl TripsPage {
    /// Replace the list, keeping the cursor on a row the current filter and
    /// search still show.
    pub fn set_trips(&mut self, mut trips: Vec<Trip>, today: Date) {
        sort_newest_first(&mut trips);
        self.trips = trips;
        self.clamp_selection(today);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trips passing the date filter and the search box, newest first.
    pub fn visible_trips(&self, today: Date) -> Vec<&Trip> {
        let has_query = !self.search_input.is_blank();
        let query = self.search_input.trimmed();
        let matcher = SkimMatcherV2::default();
        self.trips
            .iter()
            .filter(|trip| self.filter.matches(trip, today))
            .filter(|trip| {
                !has_query
                    || matcher
                        .fuzzy_match(&format!("{} {}", trip.name, trip.destination), query)
                        .is_some()
            })
            .collect()
    }

    pub fn selected_trip(&self, today: Date) -> Option<&Trip> {
        self.visible_trips(today).get(self.selected).copied()
    }

    pub fn select_next(&mut self, today: Date) {
        let count = self.visible_trips(today).len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    pub fn open_form(&mut self) {
        self.form = Some(new_trip_form());
    }

    /// Open the form (if needed) and fill it with the next-weekend template.
    pub fn open_weekend_template(&mut self, today: Date) {
        let form = self.form.get_or_insert_with(new_trip_form);
        apply_weekend_template(form, today);
    }

    fn clamp_selection(&mut self, today: Date) {
        let count = self.visible_trips(today).len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }
}

pub fn sort_newest_first(trips: &mut [Trip]) {
    trips.sort_by(|a, b| b.id.cmp(&a.id));
}

pub fn new_trip_form() -> Form {
    Form::new(&["Name", "Destination", "Start date", "End date"])
}

pub fn trip_form_from(trip: &Trip) -> Form {
    new_trip_form()
        .with_value(TRIP_NAME, &trip.name)
        .with_value(TRIP_DESTINATION, &trip.destination)
        .with_value(TRIP_START, &format_iso_date(trip.start_date))
        .with_value(TRIP_END, &format_iso_date(trip.end_date))
}

/// The Create action stays disabled until every field holds something usable.
pub fn trip_form_ready(form: &Form) -> bool {
    [TRIP_NAME, TRIP_DESTINATION, TRIP_START, TRIP_END]
        .iter()
        .all(|&idx| form.is_filled(idx))
        && date_field(form, TRIP_START).is_ok()
        && date_field(form, TRIP_END).is_ok()
}

pub fn trip_create_from(form: &Form) -> Result<TripCreate, FormError> {
    let name = required(form, TRIP_NAME)?.to_string();
    let destination = required(form, TRIP_DESTINATION)?.to_string();
    let start_date = date_field(form, TRIP_START)?;
    let end_date = date_field(form, TRIP_END)?;
    if end_date < start_date {
        return Err(FormError::EndBeforeStart);
    }
    Ok(TripCreate {
        name,
        destination,
        start_date,
        end_date,
    })
}

pub fn trip_update_from(form: &Form) -> Result<TripUpdate, FormError> {
    let create = trip_create_from(form)?;
    Ok(TripUpdate {
        name: Some(create.name),
        destination: Some(create.destination),
        start_date: Some(create.start_date),
        end_date: Some(create.end_date),
    })
}

/// Payload for a copy of `trip`: same destination and dates, " (Copy)" suffix.
pub fn duplicate_payload(trip: &Trip) -> TripCreate {
    TripCreate {
        name: format!("{} (Copy)", trip.name),
        destination: trip.destination.clone(),
        start_date: trip.start_date,
        end_date: trip.end_date,
    }
}

/// First Saturday strictly after `today`, and the Sunday after it.
pub fn next_weekend(today: Date) -> (Date, Date) {
    let mut saturday = today + Duration::days(1);
    while saturday.weekday() != Weekday::Saturday {
        saturday += Duration::days(1);
    }
    (saturday, saturday + Duration::days(1))
}

/// Fill name and dates with the canned weekend template. The destination is
/// left as the user typed it.
pub fn apply_weekend_template(form: &mut Form, today: Date) {
    let (start, end) = next_weekend(today);
    form.set_value(TRIP_NAME, WEEKEND_TEMPLATE_NAME);
    form.set_value(TRIP_START, &format_iso_date(start));
    form.set_value(TRIP_END, &format_iso_date(end));
    form.error = None;
}
