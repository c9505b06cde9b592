use time::Date;
use trip_api::{
    format_iso_date, BudgetEnvelope, BudgetSummary, Destination, Event, Expense, LocationCreate,
    Trip, TripMember,
};

use super::budget::{new_envelope_form, new_expense_form, BudgetData, EnvelopeEdit};
use super::forms::{optional, required, Form, FormError};
use super::itinerary::{event_form_from, itinerary_rows, new_event_form, plan_days, ItineraryRow};
use super::members::{member_form_from, member_label, new_member_form};
use super::trips::trip_form_from;
use super::weather::WeatherState;
use super::{BudgetFocus, DeleteContext, DeleteTarget, DetailTab, OverviewFocus};

pub const DESTINATION_NAME: usize = 0;
pub const DESTINATION_TYPE: usize = 1;
pub const DESTINATION_ADDRESS: usize = 2;

const DEFAULT_DESTINATION_TYPE: &str = "city";

/// The one form open on the detail screen, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailEditor {
    Trip(Form),
    Destination(Form),
    /// `user_id` is set when changing an existing member's role.
    Member { user_id: Option<i64>, form: Form },
    Event { event_id: Option<i64>, form: Form },
    NewEnvelope(Form),
    EditEnvelope(EnvelopeEdit),
    Expense(Form),
}

impl DetailEditor {
    pub fn form(&self) -> &Form {
        match self {
            DetailEditor::Trip(form)
            | DetailEditor::Destination(form)
            | DetailEditor::NewEnvelope(form)
            | DetailEditor::Expense(form) => form,
            DetailEditor::Event { form, .. } | DetailEditor::Member { form, .. } => form,
            DetailEditor::EditEnvelope(edit) => &edit.form,
        }
    }

    pub fn form_mut(&mut self) -> &mut Form {
        match self {
            DetailEditor::Trip(form)
            | DetailEditor::Destination(form)
            | DetailEditor::NewEnvelope(form)
            | DetailEditor::Expense(form) => form,
            DetailEditor::Event { form, .. } | DetailEditor::Member { form, .. } => form,
            DetailEditor::EditEnvelope(edit) => &mut edit.form,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DetailEditor::Trip(_) => "Edit Trip",
            DetailEditor::Destination(_) => "Add Destination",
            DetailEditor::Member { user_id: None, .. } => "Add Member",
            DetailEditor::Member { .. } => "Change Role",
            DetailEditor::Event { event_id: None, .. } => "Add Event",
            DetailEditor::Event { .. } => "Edit Event",
            DetailEditor::NewEnvelope(_) => "Add Envelope",
            DetailEditor::EditEnvelope(_) => "Edit Envelope",
            DetailEditor::Expense(_) => "Add Expense",
        }
    }
}

/// Everything the trip detail screen shows, loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetail {
    pub trip: Trip,
    pub events: Vec<Event>,
    pub budget: BudgetData,
    pub destinations: Vec<Destination>,
    pub members: Vec<TripMember>,
    pub tab: DetailTab,
    pub weather: WeatherState,
    pub editor: Option<DetailEditor>,
    pub selected_destination: usize,
    pub selected_member: usize,
    pub selected_row: usize,
    pub selected_envelope: usize,
    pub selected_expense: usize,
    pub budget_focus: BudgetFocus,
    pub overview_focus: OverviewFocus,
}

impl TripDetail {
    pub fn new(
        trip: Trip,
        events: Vec<Event>,
        budget: BudgetSummary,
        destinations: Vec<Destination>,
    ) -> Self {
        let mut detail = Self {
            trip,
            events,
            budget: BudgetData::from_summary(budget),
            destinations: Vec::new(),
            members: Vec::new(),
            tab: DetailTab::Overview,
            weather: WeatherState::NotLoaded,
            editor: None,
            selected_destination: 0,
            selected_member: 0,
            selected_row: 0,
            selected_envelope: 0,
            selected_expense: 0,
            budget_focus: BudgetFocus::Envelopes,
            overview_focus: OverviewFocus::Destinations,
        };
        detail.set_destinations(destinations);
        detail
    }

    pub fn trip_id(&self) -> i64 {
        self.trip.id
    }

    /// Switch tab. Returns true when the switch should start the one-time
    /// forecast fetch.
    pub fn select_tab(&mut self, tab: DetailTab) -> bool {
        self.tab = tab;
        tab == DetailTab::Weather && self.weather.needs_fetch()
    }

    pub fn next_tab(&mut self) -> bool {
        self.select_tab(self.tab.next())
    }

    pub fn previous_tab(&mut self) -> bool {
        self.select_tab(self.tab.previous())
    }

    pub fn set_trip(&mut self, trip: Trip) {
        self.trip = trip;
        self.clamp_selection();
    }

    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
        self.clamp_selection();
    }

    pub fn set_destinations(&mut self, mut destinations: Vec<Destination>) {
        destinations.sort_by_key(|d| d.sort_order);
        self.destinations = destinations;
        self.clamp_selection();
    }

    pub fn set_members(&mut self, members: Vec<TripMember>) {
        self.members = members;
        self.clamp_selection();
    }

    pub fn set_budget(&mut self, budget: BudgetData) {
        self.budget = budget;
        self.clamp_selection();
    }

    /// Every event of the trip, including any dated outside the trip range.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn rows(&self) -> Vec<ItineraryRow<'_>> {
        let plans = plan_days(self.trip.start_date, self.trip.end_date, &self.events);
        itinerary_rows(&plans)
    }

    pub fn focused_date(&self) -> Date {
        self.rows()
            .get(self.selected_row)
            .map(|row| row.date())
            .unwrap_or(self.trip.start_date)
    }

    pub fn focused_event(&self) -> Option<&Event> {
        match self.rows().get(self.selected_row) {
            Some(ItineraryRow::Event(event)) => Some(*event),
            _ => None,
        }
    }

    pub fn selected_destination(&self) -> Option<&Destination> {
        self.destinations.get(self.selected_destination)
    }

    pub fn selected_member(&self) -> Option<&TripMember> {
        self.members.get(self.selected_member)
    }

    pub fn selected_envelope(&self) -> Option<&BudgetEnvelope> {
        self.budget.envelopes.get(self.selected_envelope)
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.budget.expenses.get(self.selected_expense)
    }

    pub fn select_next(&mut self) {
        let (index, len) = match self.tab {
            DetailTab::Overview => match self.overview_focus {
                OverviewFocus::Destinations => {
                    (&mut self.selected_destination, self.destinations.len())
                }
                OverviewFocus::Members => (&mut self.selected_member, self.members.len()),
            },
            DetailTab::Itinerary => {
                let len = self.rows().len();
                (&mut self.selected_row, len)
            }
            DetailTab::Budget => match self.budget_focus {
                BudgetFocus::Envelopes => {
                    (&mut self.selected_envelope, self.budget.envelopes.len())
                }
                BudgetFocus::Expenses => (&mut self.selected_expense, self.budget.expenses.len()),
            },
            DetailTab::Weather => return,
        };
        if *index + 1 < len {
            *index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        let index = match self.tab {
            DetailTab::Overview => match self.overview_focus {
                OverviewFocus::Destinations => &mut self.selected_destination,
                OverviewFocus::Members => &mut self.selected_member,
            },
            DetailTab::Itinerary => &mut self.selected_row,
            DetailTab::Budget => match self.budget_focus {
                BudgetFocus::Envelopes => &mut self.selected_envelope,
                BudgetFocus::Expenses => &mut self.selected_expense,
            },
            DetailTab::Weather => return,
        };
        *index = index.saturating_sub(1);
    }

    /// Keep the cursor on a destination after the list was reordered.
    pub fn select_destination(&mut self, destination_id: i64) {
        if let Some(pos) = self.destinations.iter().position(|d| d.id == destination_id) {
            self.selected_destination = pos;
        }
    }

    pub fn toggle_budget_focus(&mut self) {
        self.budget_focus = match self.budget_focus {
            BudgetFocus::Envelopes => BudgetFocus::Expenses,
            BudgetFocus::Expenses => BudgetFocus::Envelopes,
        };
    }

    pub fn toggle_overview_focus(&mut self) {
        self.overview_focus = match self.overview_focus {
            OverviewFocus::Destinations => OverviewFocus::Members,
            OverviewFocus::Members => OverviewFocus::Destinations,
        };
    }

    pub fn open_trip_form(&mut self) {
        self.editor = Some(DetailEditor::Trip(trip_form_from(&self.trip)));
    }

    pub fn open_destination_form(&mut self) {
        self.editor = Some(DetailEditor::Destination(new_destination_form()));
    }

    pub fn open_member_form(&mut self) {
        self.editor = Some(DetailEditor::Member {
            user_id: None,
            form: new_member_form(),
        });
    }

    pub fn open_member_edit(&mut self) -> bool {
        let Some(member) = self.selected_member() else {
            return false;
        };
        let editor = DetailEditor::Member {
            user_id: Some(member.user_id),
            form: member_form_from(member),
        };
        self.editor = Some(editor);
        true
    }

    /// New event form, seeded with the day under the cursor.
    pub fn open_event_form(&mut self) {
        let form = new_event_form(self.focused_date());
        self.editor = Some(DetailEditor::Event {
            event_id: None,
            form,
        });
    }

    pub fn open_event_edit(&mut self) -> bool {
        let Some(event) = self.focused_event() else {
            return false;
        };
        let editor = DetailEditor::Event {
            event_id: Some(event.id),
            form: event_form_from(event),
        };
        self.editor = Some(editor);
        true
    }

    pub fn open_envelope_form(&mut self) {
        self.editor = Some(DetailEditor::NewEnvelope(new_envelope_form()));
    }

    /// Start editing the selected envelope. Any edit in progress, including
    /// one on a different envelope, is dropped.
    pub fn start_envelope_edit(&mut self) -> bool {
        let Some(envelope) = self.selected_envelope() else {
            return false;
        };
        self.editor = Some(DetailEditor::EditEnvelope(EnvelopeEdit::start(envelope)));
        true
    }

    pub fn editing_envelope_id(&self) -> Option<i64> {
        match &self.editor {
            Some(DetailEditor::EditEnvelope(edit)) => Some(edit.envelope_id),
            _ => None,
        }
    }

    /// Expense form dated today when the trip is under way, else clamped to the
    /// nearest trip day.
    pub fn open_expense_form(&mut self, today: Date) {
        let date = today.clamp(self.trip.start_date, self.trip.end_date.max(self.trip.start_date));
        self.editor = Some(DetailEditor::Expense(new_expense_form(date)));
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// What `d` would delete on the current tab.
    pub fn delete_context(&self) -> Option<DeleteContext> {
        match self.tab {
            DetailTab::Overview => match self.overview_focus {
                OverviewFocus::Destinations => self.selected_destination().map(|d| DeleteContext {
                    target: DeleteTarget::Destination(d.id),
                    label: d.location.name.clone(),
                    detail: format!(
                        "Stop {} of {}",
                        self.selected_destination + 1,
                        self.destinations.len()
                    ),
                }),
                OverviewFocus::Members => self.selected_member().map(|m| DeleteContext {
                    target: DeleteTarget::Member(m.user_id),
                    label: member_label(m),
                    detail: format!("Role: {}", m.role),
                }),
            },
            DetailTab::Itinerary => self.focused_event().map(|e| DeleteContext {
                target: DeleteTarget::Event(e.id),
                label: e.title.clone(),
                detail: match e.start_label() {
                    Some(start) => format!("{}  ·  {}", format_iso_date(e.date), start),
                    None => format_iso_date(e.date),
                },
            }),
            DetailTab::Budget => match self.budget_focus {
                BudgetFocus::Envelopes => self.selected_envelope().map(|e| DeleteContext {
                    target: DeleteTarget::Envelope(e.id),
                    label: e.category.clone(),
                    detail: format!("Planned ${:.2}", e.planned_amount),
                }),
                BudgetFocus::Expenses => self.selected_expense().map(|e| DeleteContext {
                    target: DeleteTarget::Expense(e.id),
                    label: e.description.clone(),
                    detail: format!(
                        "{}  ·  {:.2} {}",
                        format_iso_date(e.spent_at_date),
                        e.amount,
                        e.currency
                    ),
                }),
            },
            DetailTab::Weather => None,
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.selected_destination = self
            .selected_destination
            .min(self.destinations.len().saturating_sub(1));
        self.selected_member = self
            .selected_member
            .min(self.members.len().saturating_sub(1));
        self.selected_envelope = self
            .selected_envelope
            .min(self.budget.envelopes.len().saturating_sub(1));
        self.selected_expense = self
            .selected_expense
            .min(self.budget.expenses.len().saturating_sub(1));
    }
}

pub fn new_destination_form() -> Form {
    Form::new(&["Name", "Type", "Address"]).with_value(DESTINATION_TYPE, DEFAULT_DESTINATION_TYPE)
}

pub fn destination_create_from(form: &Form) -> Result<LocationCreate, FormError> {
    let name = required(form, DESTINATION_NAME)?.to_string();
    Ok(LocationCreate {
        name,
        kind: optional(form, DESTINATION_TYPE)
            .unwrap_or_else(|| DEFAULT_DESTINATION_TYPE.to_string()),
        address: optional(form, DESTINATION_ADDRESS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::budget::ENVELOPE_PLANNED;
    use time::macros::date;
    use trip_api::Location;

    fn trip() -> Trip {
        Trip {
            id: 3,
            owner_id: Some(1),
            name: "Rome Trip".to_string(),
            destination: "Rome".to_string(),
            start_date: date!(2024 - 05 - 01),
            end_date: date!(2024 - 05 - 03),
        }
    }

    fn envelope(id: i64, category: &str) -> BudgetEnvelope {
        BudgetEnvelope {
            id,
            trip_id: 3,
            category: category.to_string(),
            planned_amount: 100.0,
            notes: None,
        }
    }

    fn destination(id: i64, sort_order: i32, name: &str) -> Destination {
        Destination {
            id,
            trip_id: 3,
            sort_order,
            location: Location {
                id: id * 10,
                name: name.to_string(),
                kind: "city".to_string(),
                address: None,
                latitude: None,
                longitude: None,
            },
        }
    }

    fn event(id: i64, date: Date) -> Event {
        Event {
            id,
            trip_id: 3,
            location_id: None,
            title: format!("event {id}"),
            kind: "activity".to_string(),
            date,
            start_time: Some("10:00".to_string()),
            end_time: None,
            cost: None,
            notes: None,
        }
    }

    fn member(user_id: i64, role: &str) -> TripMember {
        TripMember {
            id: user_id * 10,
            trip_id: 3,
            user_id,
            role: role.to_string(),
        }
    }

    fn detail() -> TripDetail {
        TripDetail::new(
            trip(),
            vec![event(1, date!(2024 - 05 - 02))],
            BudgetSummary {
                trip_id: 3,
                envelopes: vec![envelope(1, "Food"), envelope(2, "Lodging")],
                ..Default::default()
            },
            vec![destination(8, 2, "Florence"), destination(7, 1, "Rome")],
        )
    }

    #[test]
    fn weather_tab_requests_fetch_only_once() {
        let mut detail = detail();
        assert!(!detail.select_tab(DetailTab::Budget));
        assert!(detail.select_tab(DetailTab::Weather));

        detail.weather = WeatherState::Loading;
        detail.select_tab(DetailTab::Overview);
        assert!(!detail.select_tab(DetailTab::Weather));

        detail.weather = WeatherState::Failed;
        assert!(!detail.previous_tab());
        assert!(!detail.next_tab());
    }

    #[test]
    fn destinations_are_shown_in_sort_order() {
        let detail = detail();
        let names: Vec<&str> = detail
            .destinations
            .iter()
            .map(|d| d.location.name.as_str())
            .collect();
        assert_eq!(names, vec!["Rome", "Florence"]);
    }

    #[test]
    fn new_event_form_uses_focused_day() {
        let mut detail = detail();
        detail.tab = DetailTab::Itinerary;
        // Rows: day 1, day 2, event 1, day 3.
        detail.select_next();
        detail.select_next();
        detail.select_next();
        assert_eq!(detail.focused_date(), date!(2024 - 05 - 03));

        detail.open_event_form();
        let form = detail.editor.as_ref().unwrap().form();
        assert_eq!(form.value(crate::app::itinerary::EVENT_DATE), "2024-05-03");
    }

    #[test]
    fn focused_event_can_be_edited() {
        let mut detail = detail();
        detail.tab = DetailTab::Itinerary;
        assert!(!detail.open_event_edit());

        detail.select_next();
        detail.select_next();
        assert!(detail.open_event_edit());
        assert!(matches!(
            detail.editor,
            Some(DetailEditor::Event {
                event_id: Some(1),
                ..
            })
        ));
    }

    #[test]
    fn editing_another_envelope_discards_pending_edits() {
        let mut detail = detail();
        detail.tab = DetailTab::Budget;
        assert!(detail.start_envelope_edit());
        if let Some(editor) = detail.editor.as_mut() {
            editor.form_mut().set_value(ENVELOPE_PLANNED, "999");
        }
        assert_eq!(detail.editing_envelope_id(), Some(1));

        detail.select_next();
        assert!(detail.start_envelope_edit());
        assert_eq!(detail.editing_envelope_id(), Some(2));
        let form = detail.editor.as_ref().unwrap().form();
        assert_eq!(form.value(ENVELOPE_PLANNED), "100.00");

        detail.select_previous();
        detail.start_envelope_edit();
        let form = detail.editor.as_ref().unwrap().form();
        assert_eq!(form.value(ENVELOPE_PLANNED), "100.00");
    }

    #[test]
    fn delete_targets_follow_the_tab() {
        let mut detail = detail();
        assert_eq!(
            detail.delete_context().map(|c| c.target),
            Some(DeleteTarget::Destination(7))
        );

        detail.tab = DetailTab::Budget;
        assert_eq!(
            detail.delete_context().map(|c| c.target),
            Some(DeleteTarget::Envelope(1))
        );
        detail.toggle_budget_focus();
        assert_eq!(detail.delete_context(), None);

        detail.tab = DetailTab::Weather;
        assert_eq!(detail.delete_context(), None);
    }

    #[test]
    fn member_focus_moves_its_own_cursor() {
        let mut detail = detail();
        detail.set_members(vec![member(12, "editor"), member(13, "viewer")]);
        detail.toggle_overview_focus();
        detail.select_next();
        assert_eq!(detail.selected_destination, 0);
        assert_eq!(detail.selected_member().map(|m| m.user_id), Some(13));

        let context = detail.delete_context().unwrap();
        assert_eq!(context.target, DeleteTarget::Member(13));
        assert_eq!(context.label, "User #13");
        assert_eq!(context.detail, "Role: viewer");

        assert!(detail.open_member_edit());
        assert_eq!(detail.editor.as_ref().map(|e| e.title()), Some("Change Role"));

        detail.set_members(vec![member(12, "editor")]);
        assert_eq!(detail.selected_member, 0);
        detail.set_members(Vec::new());
        assert!(!detail.open_member_edit());
        assert_eq!(detail.delete_context(), None);
    }

    #[test]
    fn expense_date_is_clamped_into_trip() {
        let mut detail = detail();
        detail.open_expense_form(date!(2024 - 06 - 20));
        let form = detail.editor.as_ref().unwrap().form();
        assert_eq!(form.value(crate::app::budget::EXPENSE_DATE), "2024-05-03");

        detail.open_expense_form(date!(2024 - 05 - 02));
        let form = detail.editor.as_ref().unwrap().form();
        assert_eq!(form.value(crate::app::budget::EXPENSE_DATE), "2024-05-02");
    }

    #[test]
    fn destination_form_requires_name() {
        let form = new_destination_form();
        assert_eq!(
            destination_create_from(&form),
            Err(FormError::Required("Name"))
        );
        let create = destination_create_from(&form.with_value(DESTINATION_NAME, "Naples")).unwrap();
        assert_eq!(create.name, "Naples");
        assert_eq!(create.kind, "city");
        assert_eq!(create.address, None);
    }
}
