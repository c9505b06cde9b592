use std::sync::{Arc, Mutex, MutexGuard};
use time::{Date, Duration};
use trip_api::{
    format_iso_date, ApiError, BudgetEnvelope, BudgetSummary, Destination, EnvelopeCreate,
    EnvelopeUpdate, Event, EventCreate, EventUpdate, Expense, ExpenseCreate, Location,
    LocationCreate, MemberUpsert, MoveDirection, StatusCode, TokenResponse, Trip, TripCreate,
    TripMember, TripUpdate, TripWeather, User, WeatherForecastDay,
};

use crate::time_utils::today;

/// In-memory backend for `trip-tui dev`. Clones share one store.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug, Default)]
struct DevStore {
    last_id: i64,
    users: Vec<DevUser>,
    tokens: Vec<(String, i64)>,
    trips: Vec<Trip>,
    events: Vec<Event>,
    destinations: Vec<Destination>,
    envelopes: Vec<BudgetEnvelope>,
    expenses: Vec<Expense>,
    members: Vec<TripMember>,
}

#[derive(Debug)]
struct DevUser {
    user: User,
    password: String,
}

fn not_found(call: &str) -> ApiError {
    ApiError::Status {
        call: call.to_string(),
        status: StatusCode::NOT_FOUND,
        body: "Not found".to_string(),
    }
}

fn bad_request(call: &str, body: &str) -> ApiError {
    ApiError::Status {
        call: call.to_string(),
        status: StatusCode::BAD_REQUEST,
        body: body.to_string(),
    }
}

impl DevStore {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn authorize(&self, token: Option<&str>) -> Result<i64, ApiError> {
        let token = token.ok_or(ApiError::Unauthorized)?;
        self.tokens
            .iter()
            .find(|(issued, _)| issued == token)
            .map(|(_, user_id)| *user_id)
            .ok_or(ApiError::Unauthorized)
    }

    fn is_member(&self, user_id: i64, trip_id: i64) -> bool {
        self.members
            .iter()
            .any(|m| m.trip_id == trip_id && m.user_id == user_id)
    }

    /// A trip the user owns or was added to. Anything else is reported as
    /// missing.
    fn shared_trip(&self, user_id: i64, trip_id: i64, call: &str) -> Result<&Trip, ApiError> {
        self.trips
            .iter()
            .find(|t| {
                t.id == trip_id
                    && (t.owner_id == Some(user_id) || self.is_member(user_id, trip_id))
            })
            .ok_or_else(|| not_found(call))
    }

    fn shares_trip(&self, user_id: i64, trip_id: i64) -> bool {
        self.shared_trip(user_id, trip_id, "").is_ok()
    }

    /// Renaming, deleting and sharing a trip are left to its owner.
    fn owned_trip(&self, user_id: i64, trip_id: i64, call: &str) -> Result<&Trip, ApiError> {
        self.trips
            .iter()
            .find(|t| t.id == trip_id && t.owner_id == Some(user_id))
            .ok_or_else(|| not_found(call))
    }

    fn trip_destinations(&self, trip_id: i64) -> Vec<Destination> {
        let mut destinations: Vec<Destination> = self
            .destinations
            .iter()
            .filter(|d| d.trip_id == trip_id)
            .cloned()
            .collect();
        destinations.sort_by_key(|d| d.sort_order);
        destinations
    }

    fn insert_trip(&mut self, owner_id: i64, trip: &TripCreate) -> Trip {
        let trip = Trip {
            id: self.next_id(),
            owner_id: Some(owner_id),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
        };
        self.trips.push(trip.clone());
        trip
    }

    fn insert_event(&mut self, trip_id: i64, event: &EventCreate) -> Event {
        let event = Event {
            id: self.next_id(),
            trip_id,
            location_id: event.location_id,
            title: event.title.clone(),
            kind: event.kind.clone(),
            date: event.date,
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            cost: event.cost,
            notes: event.notes.clone(),
        };
        self.events.push(event.clone());
        event
    }

    fn insert_destination(&mut self, trip_id: i64, location: &LocationCreate) -> Destination {
        let sort_order = self
            .destinations
            .iter()
            .filter(|d| d.trip_id == trip_id)
            .map(|d| d.sort_order)
            .max()
            .map_or(0, |max| max + 1);
        let location_id = self.next_id();
        let destination = Destination {
            id: self.next_id(),
            trip_id,
            sort_order,
            location: Location {
                id: location_id,
                name: location.name.clone(),
                kind: location.kind.clone(),
                address: location.address.clone(),
                latitude: None,
                longitude: None,
            },
        };
        self.destinations.push(destination.clone());
        destination
    }

    fn insert_envelope(&mut self, trip_id: i64, envelope: &EnvelopeCreate) -> BudgetEnvelope {
        let envelope = BudgetEnvelope {
            id: self.next_id(),
            trip_id,
            category: envelope.category.clone(),
            planned_amount: envelope.planned_amount,
            notes: envelope.notes.clone(),
        };
        self.envelopes.push(envelope.clone());
        envelope
    }

    fn insert_expense(&mut self, trip_id: i64, expense: &ExpenseCreate) -> Expense {
        let expense = Expense {
            id: self.next_id(),
            trip_id,
            envelope_id: expense.envelope_id,
            event_id: expense.event_id,
            description: expense.description.clone(),
            amount: expense.amount,
            currency: expense.currency.clone(),
            spent_at_date: expense.spent_at_date,
        };
        self.expenses.push(expense.clone());
        expense
    }
}

impl DevBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(seed_dev_store(today()))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DevStore> {
        self.store.lock().expect("dev store lock poisoned")
    }

    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let mut store = self.lock();
        let user_id = store
            .users
            .iter()
            .find(|u| u.user.username == username && u.password == password)
            .map(|u| u.user.id)
            .ok_or(ApiError::Unauthorized)?;
        let token = format!("dev-token-{}-{}", user_id, store.tokens.len() + 1);
        store.tokens.push((token.clone(), user_id));
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    pub fn register(&self, email: &str, username: &str, password: &str) -> Result<User, ApiError> {
        let call = "POST /auth/register";
        let mut store = self.lock();
        if store
            .users
            .iter()
            .any(|u| u.user.username == username || u.user.email == email)
        {
            return Err(bad_request(call, "Username or email already registered"));
        }
        let user = User {
            id: store.next_id(),
            email: email.to_string(),
            username: username.to_string(),
        };
        store.users.push(DevUser {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }

    pub fn me(&self, token: Option<&str>) -> Result<User, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store
            .users
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user.clone())
            .ok_or(ApiError::Unauthorized)
    }

    pub fn list_trips(&self, token: Option<&str>) -> Result<Vec<Trip>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        Ok(store
            .trips
            .iter()
            .filter(|t| t.owner_id == Some(user_id) || store.is_member(user_id, t.id))
            .cloned()
            .collect())
    }

    pub fn get_trip(&self, token: Option<&str>, trip_id: i64) -> Result<Trip, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store
            .shared_trip(user_id, trip_id, "GET /trips/:id")
            .cloned()
    }

    pub fn create_trip(&self, token: Option<&str>, trip: &TripCreate) -> Result<Trip, ApiError> {
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        if trip.end_date < trip.start_date {
            return Err(bad_request(
                "POST /trips",
                "end_date must not be before start_date",
            ));
        }
        Ok(store.insert_trip(user_id, trip))
    }

    pub fn update_trip(
        &self,
        token: Option<&str>,
        trip_id: i64,
        update: &TripUpdate,
    ) -> Result<Trip, ApiError> {
        let call = "PATCH /trips/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let mut trip = store.owned_trip(user_id, trip_id, call)?.clone();
        if let Some(name) = &update.name {
            trip.name = name.clone();
        }
        if let Some(destination) = &update.destination {
            trip.destination = destination.clone();
        }
        if let Some(start) = update.start_date {
            trip.start_date = start;
        }
        if let Some(end) = update.end_date {
            trip.end_date = end;
        }
        if trip.end_date < trip.start_date {
            return Err(bad_request(call, "end_date must not be before start_date"));
        }
        if let Some(stored) = store.trips.iter_mut().find(|t| t.id == trip_id) {
            *stored = trip.clone();
        }
        Ok(trip)
    }

    pub fn delete_trip(&self, token: Option<&str>, trip_id: i64) -> Result<(), ApiError> {
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.owned_trip(user_id, trip_id, "DELETE /trips/:id")?;
        store.trips.retain(|t| t.id != trip_id);
        store.members.retain(|m| m.trip_id != trip_id);
        store.events.retain(|e| e.trip_id != trip_id);
        store.destinations.retain(|d| d.trip_id != trip_id);
        store.envelopes.retain(|e| e.trip_id != trip_id);
        store.expenses.retain(|e| e.trip_id != trip_id);
        Ok(())
    }

    pub fn list_members(
        &self,
        token: Option<&str>,
        trip_id: i64,
    ) -> Result<Vec<TripMember>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "GET /trips/:id/members")?;
        Ok(store
            .members
            .iter()
            .filter(|m| m.trip_id == trip_id)
            .cloned()
            .collect())
    }

    pub fn upsert_member(
        &self,
        token: Option<&str>,
        trip_id: i64,
        member: &MemberUpsert,
    ) -> Result<TripMember, ApiError> {
        let call = "POST /trips/:id/members";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.owned_trip(user_id, trip_id, call)?;
        if member.role.trim().is_empty() {
            return Err(bad_request(call, "role is required"));
        }
        if !store.users.iter().any(|u| u.user.id == member.user_id) {
            return Err(not_found(call));
        }
        if let Some(existing) = store
            .members
            .iter_mut()
            .find(|m| m.trip_id == trip_id && m.user_id == member.user_id)
        {
            existing.role = member.role.clone();
            return Ok(existing.clone());
        }
        let created = TripMember {
            id: store.next_id(),
            trip_id,
            user_id: member.user_id,
            role: member.role.clone(),
        };
        store.members.push(created.clone());
        Ok(created)
    }

    pub fn remove_member(
        &self,
        token: Option<&str>,
        trip_id: i64,
        member_user_id: i64,
    ) -> Result<(), ApiError> {
        let call = "DELETE /trips/:id/members/:user_id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.owned_trip(user_id, trip_id, call)?;
        let before = store.members.len();
        store
            .members
            .retain(|m| !(m.trip_id == trip_id && m.user_id == member_user_id));
        if store.members.len() == before {
            return Err(not_found(call));
        }
        Ok(())
    }

    pub fn list_events(&self, token: Option<&str>, trip_id: i64) -> Result<Vec<Event>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "GET /trips/:id/events")?;
        let mut events: Vec<Event> = store
            .events
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        Ok(events)
    }

    pub fn create_event(
        &self,
        token: Option<&str>,
        trip_id: i64,
        event: &EventCreate,
    ) -> Result<Event, ApiError> {
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "POST /trips/:id/events")?;
        Ok(store.insert_event(trip_id, event))
    }

    pub fn update_event(
        &self,
        token: Option<&str>,
        event_id: i64,
        update: &EventUpdate,
    ) -> Result<Event, ApiError> {
        let call = "PATCH /events/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let trip_id = store
            .events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.trip_id)
            .ok_or_else(|| not_found(call))?;
        if !store.shares_trip(user_id, trip_id) {
            return Err(not_found(call));
        }
        let event = store
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| not_found(call))?;
        if let Some(title) = &update.title {
            event.title = title.clone();
        }
        if let Some(kind) = &update.kind {
            event.kind = kind.clone();
        }
        if let Some(date) = update.date {
            event.date = date;
        }
        if let Some(location_id) = update.location_id {
            event.location_id = location_id;
        }
        if let Some(start_time) = &update.start_time {
            event.start_time = start_time.clone();
        }
        if let Some(end_time) = &update.end_time {
            event.end_time = end_time.clone();
        }
        if let Some(cost) = update.cost {
            event.cost = cost;
        }
        if let Some(notes) = &update.notes {
            event.notes = notes.clone();
        }
        Ok(event.clone())
    }

    pub fn delete_event(&self, token: Option<&str>, event_id: i64) -> Result<(), ApiError> {
        let call = "DELETE /events/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let trip_id = store
            .events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.trip_id)
            .ok_or_else(|| not_found(call))?;
        if !store.shares_trip(user_id, trip_id) {
            return Err(not_found(call));
        }
        store.events.retain(|e| e.id != event_id);
        Ok(())
    }

    pub fn list_destinations(
        &self,
        token: Option<&str>,
        trip_id: i64,
    ) -> Result<Vec<Destination>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "GET /trips/:id/destinations")?;
        Ok(store.trip_destinations(trip_id))
    }

    pub fn add_destination(
        &self,
        token: Option<&str>,
        trip_id: i64,
        location: &LocationCreate,
    ) -> Result<Destination, ApiError> {
        let call = "POST /trips/:id/destinations";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, call)?;
        if location.name.trim().is_empty() {
            return Err(bad_request(call, "name is required"));
        }
        Ok(store.insert_destination(trip_id, location))
    }

    /// Removing a stop closes the gap in the ordering.
    pub fn remove_destination(
        &self,
        token: Option<&str>,
        trip_id: i64,
        destination_id: i64,
    ) -> Result<(), ApiError> {
        let call = "DELETE /trips/:id/destinations/:dest_id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, call)?;
        let before = store.destinations.len();
        store
            .destinations
            .retain(|d| !(d.id == destination_id && d.trip_id == trip_id));
        if store.destinations.len() == before {
            return Err(not_found(call));
        }
        let order: Vec<i64> = store
            .trip_destinations(trip_id)
            .iter()
            .map(|d| d.id)
            .collect();
        for d in store.destinations.iter_mut().filter(|d| d.trip_id == trip_id) {
            if let Some(pos) = order.iter().position(|id| *id == d.id) {
                d.sort_order = pos as i32;
            }
        }
        Ok(())
    }

    /// Swap a stop with its neighbour. Moving past either end is a no-op.
    pub fn move_destination(
        &self,
        token: Option<&str>,
        trip_id: i64,
        destination_id: i64,
        direction: MoveDirection,
    ) -> Result<(), ApiError> {
        let call = "PATCH /trips/:id/destinations/:dest_id/move";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, call)?;
        let ordered = store.trip_destinations(trip_id);
        let pos = ordered
            .iter()
            .position(|d| d.id == destination_id)
            .ok_or_else(|| not_found(call))?;
        let neighbour = match direction {
            MoveDirection::Up if pos > 0 => pos - 1,
            MoveDirection::Down if pos + 1 < ordered.len() => pos + 1,
            _ => return Ok(()),
        };
        let (a, b) = (&ordered[pos], &ordered[neighbour]);
        let swaps = [(a.id, b.sort_order), (b.id, a.sort_order)];
        for (id, sort_order) in swaps {
            if let Some(d) = store.destinations.iter_mut().find(|d| d.id == id) {
                d.sort_order = sort_order;
            }
        }
        Ok(())
    }

    pub fn list_envelopes(
        &self,
        token: Option<&str>,
        trip_id: i64,
    ) -> Result<Vec<BudgetEnvelope>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "GET /trips/:id/envelopes")?;
        Ok(store
            .envelopes
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect())
    }

    pub fn create_envelope(
        &self,
        token: Option<&str>,
        trip_id: i64,
        envelope: &EnvelopeCreate,
    ) -> Result<BudgetEnvelope, ApiError> {
        let call = "POST /trips/:id/envelopes";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, call)?;
        if envelope.planned_amount <= 0.0 {
            return Err(bad_request(call, "planned_amount must be positive"));
        }
        Ok(store.insert_envelope(trip_id, envelope))
    }

    pub fn update_envelope(
        &self,
        token: Option<&str>,
        envelope_id: i64,
        update: &EnvelopeUpdate,
    ) -> Result<BudgetEnvelope, ApiError> {
        let call = "PATCH /envelopes/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let trip_id = store
            .envelopes
            .iter()
            .find(|e| e.id == envelope_id)
            .map(|e| e.trip_id)
            .ok_or_else(|| not_found(call))?;
        if !store.shares_trip(user_id, trip_id) {
            return Err(not_found(call));
        }
        if update.planned_amount.is_some_and(|p| p <= 0.0) {
            return Err(bad_request(call, "planned_amount must be positive"));
        }
        let envelope = store
            .envelopes
            .iter_mut()
            .find(|e| e.id == envelope_id)
            .ok_or_else(|| not_found(call))?;
        if let Some(category) = &update.category {
            envelope.category = category.clone();
        }
        if let Some(planned) = update.planned_amount {
            envelope.planned_amount = planned;
        }
        if let Some(notes) = &update.notes {
            envelope.notes = notes.clone();
        }
        Ok(envelope.clone())
    }

    /// Expenses filed under a deleted envelope become uncategorized.
    pub fn delete_envelope(&self, token: Option<&str>, envelope_id: i64) -> Result<(), ApiError> {
        let call = "DELETE /envelopes/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let trip_id = store
            .envelopes
            .iter()
            .find(|e| e.id == envelope_id)
            .map(|e| e.trip_id)
            .ok_or_else(|| not_found(call))?;
        if !store.shares_trip(user_id, trip_id) {
            return Err(not_found(call));
        }
        store.envelopes.retain(|e| e.id != envelope_id);
        for expense in store
            .expenses
            .iter_mut()
            .filter(|e| e.envelope_id == Some(envelope_id))
        {
            expense.envelope_id = None;
        }
        Ok(())
    }

    pub fn list_expenses(
        &self,
        token: Option<&str>,
        trip_id: i64,
    ) -> Result<Vec<Expense>, ApiError> {
        let store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, "GET /trips/:id/expenses")?;
        Ok(store
            .expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect())
    }

    pub fn create_expense(
        &self,
        token: Option<&str>,
        trip_id: i64,
        expense: &ExpenseCreate,
    ) -> Result<Expense, ApiError> {
        let call = "POST /trips/:id/expenses";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        store.shared_trip(user_id, trip_id, call)?;
        if let Some(envelope_id) = expense.envelope_id {
            if !store
                .envelopes
                .iter()
                .any(|e| e.id == envelope_id && e.trip_id == trip_id)
            {
                return Err(bad_request(call, "envelope does not belong to this trip"));
            }
        }
        Ok(store.insert_expense(trip_id, expense))
    }

    pub fn delete_expense(&self, token: Option<&str>, expense_id: i64) -> Result<(), ApiError> {
        let call = "DELETE /expenses/:id";
        let mut store = self.lock();
        let user_id = store.authorize(token)?;
        let trip_id = store
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .map(|e| e.trip_id)
            .ok_or_else(|| not_found(call))?;
        if !store.shares_trip(user_id, trip_id) {
            return Err(not_found(call));
        }
        store.expenses.retain(|e| e.id != expense_id);
        Ok(())
    }

    pub fn budget_summary(
        &self,
        token: Option<&str>,
        trip_id: i64,
    ) -> Result<BudgetSummary, ApiError> {
        let envelopes = self.list_envelopes(token, trip_id)?;
        let expenses = self.list_expenses(token, trip_id)?;
        Ok(BudgetSummary {
            trip_id,
            total_planned: envelopes.iter().map(|e| e.planned_amount).sum(),
            total_actual: expenses.iter().map(|e| e.amount).sum(),
            envelopes,
            expenses,
        })
    }

    pub fn trip_weather(&self, token: Option<&str>, trip_id: i64) -> Result<TripWeather, ApiError> {
        let trip = self.get_trip(token, trip_id)?;
        let mut days = Vec::new();
        let mut date = trip.start_date;
        while date <= trip.end_date {
            days.push(synthetic_day(date, trip.id));
            date += Duration::days(1);
        }
        Ok(TripWeather {
            city: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            days,
        })
    }

    pub fn export_trip_pdf(&self, token: Option<&str>, trip_id: i64) -> Result<Vec<u8>, ApiError> {
        let trip = self.get_trip(token, trip_id)?;
        let events = self.list_events(token, trip_id)?;
        Ok(render_pdf(&trip, &events))
    }
}

/// Summary and advice for one forecast day. Temperatures in Celsius.
pub fn forecast_outlook(precip_prob: i32, temp_max: f64, temp_min: f64) -> (&'static str, &'static str) {
    let (summary, mut advice) = if precip_prob >= 70 {
        ("Rainy", "Heavy rain expected. Plan indoor activities or rideshares.")
    } else if precip_prob >= 40 {
        (
            "Cloudy",
            "Chance of showers. Keep an umbrella handy and have an indoor backup.",
        )
    } else {
        ("Clear", "Good weather for walking and outdoor plans.")
    };
    if temp_max >= 32.0 {
        advice = "Very hot. Schedule outdoor activities early and stay hydrated.";
    }
    if temp_min <= 2.0 {
        advice = "Cold weather. Bring layers and keep walks shorter.";
    }
    (summary, advice)
}

// Deterministic per date and trip so the tab shows the same forecast every run.
fn synthetic_day(date: Date, seed: i64) -> WeatherForecastDay {
    let n = i64::from(date.to_julian_day()) + seed * 7;
    let precip_prob = (n * 37).rem_euclid(100) as i32;
    let temp_max = 10.0 + (n * 13).rem_euclid(25) as f64;
    let temp_min = temp_max - 8.0 - n.rem_euclid(4) as f64;
    let (summary, advice) = forecast_outlook(precip_prob, temp_max, temp_min);
    WeatherForecastDay {
        date,
        summary: summary.to_string(),
        temp_max,
        temp_min,
        precip_prob,
        advice: advice.to_string(),
    }
}

fn pdf_escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '(' | ')' | '\\' => format!("\\{}", c),
            c if c.is_ascii() && !c.is_ascii_control() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

/// A one-page PDF listing the trip and its events.
fn render_pdf(trip: &Trip, events: &[Event]) -> Vec<u8> {
    let mut lines = vec![
        trip.name.clone(),
        format!("Destination: {}", trip.destination),
        format!(
            "Dates: {} to {}",
            format_iso_date(trip.start_date),
            format_iso_date(trip.end_date)
        ),
        String::new(),
    ];
    if events.is_empty() {
        lines.push("No events planned.".to_string());
    }
    for event in events {
        let start = event.start_label().unwrap_or("--:--");
        lines.push(format!(
            "{}  {}  {} ({})",
            format_iso_date(event.date),
            start,
            event.title,
            event.kind
        ));
    }

    let mut content = String::from("BT\n/F1 12 Tf\n16 TL\n72 740 Td\n");
    for line in &lines {
        content.push_str(&format!("({}) Tj T*\n", pdf_escape(line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", idx + 1, body));
    }
    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.into_bytes()
}

fn seed_dev_store(today: Date) -> DevStore {
    let mut store = DevStore::default();
    let user_id = store.next_id();
    store.users.push(DevUser {
        user: User {
            id: user_id,
            email: "demo@localhost".to_string(),
            username: "demo".to_string(),
        },
        password: "demo".to_string(),
    });
    let friend_id = store.next_id();
    store.users.push(DevUser {
        user: User {
            id: friend_id,
            email: "sam@localhost".to_string(),
            username: "sam".to_string(),
        },
        password: "sam".to_string(),
    });

    let trip = |name: &str, destination: &str, start: i64, len: i64| TripCreate {
        name: name.to_string(),
        destination: destination.to_string(),
        start_date: today + Duration::days(start),
        end_date: today + Duration::days(start + len),
    };

    store.insert_trip(user_id, &trip("Lisbon Long Weekend", "Lisbon", -30, 3));
    store.insert_trip(user_id, &trip("Kyoto in Autumn", "Kyoto", 40, 6));
    let rome = store.insert_trip(user_id, &trip("Rome Trip", "Rome", 14, 4));
    let member_id = store.next_id();
    store.members.push(TripMember {
        id: member_id,
        trip_id: rome.id,
        user_id: friend_id,
        role: "editor".to_string(),
    });

    let day = |offset: i64| rome.start_date + Duration::days(offset);
    let event = |title: &str, kind: &str, date: Date, start: Option<&str>, cost: Option<f64>| {
        EventCreate {
            trip_id: rome.id,
            title: title.to_string(),
            kind: kind.to_string(),
            location_id: None,
            date,
            start_time: start.map(str::to_string),
            end_time: None,
            cost,
            notes: None,
        }
    };
    for create in [
        event("Flight to FCO", "transport", day(0), Some("07:45"), Some(240.0)),
        event("Check in at hotel", "lodging", day(0), Some("15:00"), None),
        event("Colosseum tour", "activity", day(1), Some("09:00"), Some(32.0)),
        event("Trastevere dinner", "food", day(1), Some("19:30"), Some(60.0)),
        event("Vatican Museums", "activity", day(2), Some("08:30"), Some(27.0)),
        event("Train to Florence", "transport", day(3), None, Some(45.0)),
    ] {
        store.insert_event(rome.id, &create);
    }

    for (name, address) in [
        ("Rome", Some("Lazio, Italy")),
        ("Florence", Some("Tuscany, Italy")),
        ("Pisa", None),
    ] {
        store.insert_destination(
            rome.id,
            &LocationCreate {
                name: name.to_string(),
                kind: "city".to_string(),
                address: address.map(str::to_string),
            },
        );
    }

    let envelope = |category: &str, planned: f64| EnvelopeCreate {
        trip_id: rome.id,
        category: category.to_string(),
        planned_amount: planned,
        notes: None,
    };
    let food = store.insert_envelope(rome.id, &envelope("Food", 400.0));
    let lodging = store.insert_envelope(rome.id, &envelope("Lodging", 900.0));
    store.insert_envelope(rome.id, &envelope("Museums", 120.0));

    let expense = |envelope_id: Option<i64>, description: &str, amount: f64| ExpenseCreate {
        trip_id: rome.id,
        envelope_id,
        event_id: None,
        description: description.to_string(),
        amount,
        currency: "USD".to_string(),
        spent_at_date: rome.start_date,
    };
    for create in [
        expense(Some(lodging.id), "Hotel deposit", 300.0),
        expense(Some(food.id), "Pasta class", 85.0),
        expense(None, "Travel insurance", 42.5),
    ] {
        store.insert_expense(rome.id, &create);
    }

    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn signed_in() -> (DevBackend, String) {
        let backend = DevBackend::new();
        let token = backend.login("demo", "demo").unwrap().access_token;
        (backend, token)
    }

    fn rome_id(backend: &DevBackend, token: &str) -> i64 {
        backend
            .list_trips(Some(token))
            .unwrap()
            .into_iter()
            .find(|t| t.name == "Rome Trip")
            .map(|t| t.id)
            .unwrap()
    }

    #[test]
    fn requests_without_token_are_unauthorized() {
        let backend = DevBackend::new();
        assert!(backend.list_trips(None).unwrap_err().is_unauthorized());
        assert!(backend
            .list_trips(Some("forged"))
            .unwrap_err()
            .is_unauthorized());
        assert!(backend.login("demo", "nope").unwrap_err().is_unauthorized());
    }

    #[test]
    fn registered_user_starts_with_no_trips() {
        let backend = DevBackend::new();
        let user = backend.register("ana@example.com", "ana", "pw").unwrap();
        assert_eq!(user.username, "ana");
        assert!(backend.register("ana@example.com", "ana", "pw").is_err());

        let token = backend.login("ana", "pw").unwrap().access_token;
        assert!(backend.list_trips(Some(&token)).unwrap().is_empty());
        assert_eq!(backend.me(Some(&token)).unwrap().email, "ana@example.com");
    }

    #[test]
    fn other_users_trips_are_not_found() {
        let (backend, demo_token) = signed_in();
        let rome = rome_id(&backend, &demo_token);
        backend.register("b@example.com", "bo", "pw").unwrap();
        let token = backend.login("bo", "pw").unwrap().access_token;

        let err = backend.get_trip(Some(&token), rome).unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[test]
    fn move_swaps_with_neighbour_and_stops_at_edges() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let names = |backend: &DevBackend| -> Vec<String> {
            backend
                .list_destinations(Some(&token), rome)
                .unwrap()
                .into_iter()
                .map(|d| d.location.name)
                .collect()
        };
        assert_eq!(names(&backend), vec!["Rome", "Florence", "Pisa"]);

        let pisa = backend.list_destinations(Some(&token), rome).unwrap()[2].id;
        backend
            .move_destination(Some(&token), rome, pisa, MoveDirection::Up)
            .unwrap();
        assert_eq!(names(&backend), vec!["Rome", "Pisa", "Florence"]);

        let first = backend.list_destinations(Some(&token), rome).unwrap()[0].id;
        backend
            .move_destination(Some(&token), rome, first, MoveDirection::Up)
            .unwrap();
        assert_eq!(names(&backend), vec!["Rome", "Pisa", "Florence"]);
    }

    #[test]
    fn removing_a_destination_keeps_order_contiguous() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let middle = backend.list_destinations(Some(&token), rome).unwrap()[1].id;
        backend
            .remove_destination(Some(&token), rome, middle)
            .unwrap();

        let orders: Vec<i32> = backend
            .list_destinations(Some(&token), rome)
            .unwrap()
            .iter()
            .map(|d| d.sort_order)
            .collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn deleting_envelope_uncategorizes_its_expenses() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let before = backend.budget_summary(Some(&token), rome).unwrap();
        let food = before
            .envelopes
            .iter()
            .find(|e| e.category == "Food")
            .unwrap()
            .id;

        backend.delete_envelope(Some(&token), food).unwrap();

        let after = backend.budget_summary(Some(&token), rome).unwrap();
        assert_eq!(after.envelopes.len(), before.envelopes.len() - 1);
        assert_eq!(after.total_actual, before.total_actual);
        assert!(after.expenses.iter().all(|e| e.envelope_id != Some(food)));
    }

    #[test]
    fn envelope_plan_must_be_positive() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let create = EnvelopeCreate {
            trip_id: rome,
            category: "Gifts".to_string(),
            planned_amount: 0.0,
            notes: None,
        };
        assert!(backend.create_envelope(Some(&token), rome, &create).is_err());
    }

    #[test]
    fn null_in_update_clears_the_field() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let flight = backend
            .list_events(Some(&token), rome)
            .unwrap()
            .into_iter()
            .find(|e| e.title == "Flight to FCO")
            .unwrap();

        let update = EventUpdate {
            start_time: Some(None),
            end_time: Some(Some("10:15".to_string())),
            ..EventUpdate::default()
        };
        let updated = backend
            .update_event(Some(&token), flight.id, &update)
            .unwrap();

        assert_eq!(updated.start_time, None);
        assert_eq!(updated.end_time.as_deref(), Some("10:15"));
        assert_eq!(updated.cost, flight.cost);
        assert_eq!(updated.title, flight.title);
    }

    #[test]
    fn members_see_the_shared_trip_but_cannot_rename_it() {
        let (backend, _) = signed_in();
        let sam = backend.login("sam", "sam").unwrap().access_token;

        let trips = backend.list_trips(Some(&sam)).unwrap();
        assert_eq!(trips.len(), 1);
        let rome = trips[0].id;
        assert_eq!(backend.list_events(Some(&sam), rome).unwrap().len(), 6);

        let rename = TripUpdate {
            name: Some("Sam's Rome".to_string()),
            ..TripUpdate::default()
        };
        assert!(backend.update_trip(Some(&sam), rome, &rename).is_err());
        assert!(backend.delete_trip(Some(&sam), rome).is_err());
    }

    #[test]
    fn posting_an_existing_member_changes_the_role() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let sam = backend.list_members(Some(&token), rome).unwrap()[0].clone();
        assert_eq!(sam.role, "editor");

        let upsert = MemberUpsert {
            user_id: sam.user_id,
            role: "viewer".to_string(),
        };
        let updated = backend.upsert_member(Some(&token), rome, &upsert).unwrap();

        assert_eq!(updated.id, sam.id);
        let members = backend.list_members(Some(&token), rome).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, "viewer");
    }

    #[test]
    fn removed_member_loses_access() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let sam = backend.login("sam", "sam").unwrap().access_token;
        let sam_id = backend.me(Some(&sam)).unwrap().id;

        backend.remove_member(Some(&token), rome, sam_id).unwrap();

        assert!(backend.list_trips(Some(&sam)).unwrap().is_empty());
        assert!(backend.get_trip(Some(&sam), rome).is_err());
        assert!(backend.remove_member(Some(&token), rome, sam_id).is_err());
    }

    #[test]
    fn unknown_user_cannot_be_added() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let upsert = MemberUpsert {
            user_id: 9999,
            role: "viewer".to_string(),
        };
        assert!(backend.upsert_member(Some(&token), rome, &upsert).is_err());
    }

    #[test]
    fn deleting_trip_removes_children() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        backend.delete_trip(Some(&token), rome).unwrap();
        assert!(backend.list_events(Some(&token), rome).is_err());
        assert_eq!(backend.list_trips(Some(&token)).unwrap().len(), 2);
    }

    #[test]
    fn outlook_follows_rain_and_temperature_rules() {
        assert_eq!(forecast_outlook(75, 20.0, 12.0).0, "Rainy");
        assert_eq!(forecast_outlook(40, 20.0, 12.0).0, "Cloudy");
        assert_eq!(forecast_outlook(39, 20.0, 12.0).0, "Clear");
        assert!(forecast_outlook(10, 33.0, 20.0).1.starts_with("Very hot"));
        assert!(forecast_outlook(80, 6.0, 1.0).1.starts_with("Cold weather"));
        assert_eq!(forecast_outlook(80, 6.0, 1.0).0, "Rainy");
        assert!(forecast_outlook(0, 33.0, 1.0).1.starts_with("Cold weather"));
    }

    #[test]
    fn weather_covers_every_trip_day() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let trip = backend.get_trip(Some(&token), rome).unwrap();
        let weather = backend.trip_weather(Some(&token), rome).unwrap();

        assert_eq!(weather.city, "Rome");
        assert_eq!(weather.days.len() as i64, trip.day_count());
        for day in &weather.days {
            assert!((0..100).contains(&day.precip_prob));
            assert!(day.temp_min < day.temp_max);
        }
    }

    #[test]
    fn seed_is_relative_to_today() {
        let store = seed_dev_store(date!(2024 - 05 - 08));
        let rome = store.trips.iter().find(|t| t.name == "Rome Trip").unwrap();
        assert_eq!(rome.start_date, date!(2024 - 05 - 22));
        assert_eq!(rome.end_date, date!(2024 - 05 - 26));
    }

    #[test]
    fn exported_pdf_is_well_formed() {
        let (backend, token) = signed_in();
        let rome = rome_id(&backend, &token);
        let bytes = backend.export_trip_pdf(Some(&token), rome).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("(Rome Trip) Tj"));

        let startxref: usize = text
            .lines()
            .skip_while(|l| *l != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[startxref..].starts_with("xref"));
    }

    #[test]
    fn pdf_text_is_escaped() {
        assert_eq!(pdf_escape("Rome (Copy)"), "Rome \\(Copy\\)");
        assert_eq!(pdf_escape("Zürich"), "Z?rich");
    }
}
