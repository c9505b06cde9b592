use anyhow::{Context, Result};
use trip_api::{
    BudgetEnvelope, BudgetSummary, Destination, EnvelopeCreate, EnvelopeUpdate, Event,
    EventCreate, EventUpdate, Expense, ExpenseCreate, HealthResponse, LocationCreate,
    MemberUpsert, MoveDirection, Trip, TripClient, TripCreate, TripMember, TripUpdate,
    TripWeather, User,
};

use crate::api::dev_backend::DevBackend;

/// The backend as the TUI sees it: either the REST client or, in dev mode,
/// the in-memory stand-in.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: TripClient,
    dev_backend: Option<DevBackend>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut inner = TripClient::new(base_url)
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        inner.set_token(token);
        Ok(Self {
            inner,
            dev_backend: None,
        })
    }

    pub fn dev() -> Result<Self> {
        Ok(Self {
            inner: TripClient::new("http://localhost")?,
            dev_backend: Some(DevBackend::new()),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.dev_backend.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url().as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.inner.token()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.inner.set_token(token);
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        if self.dev_backend.is_some() {
            return Ok(HealthResponse {
                status: "ok".to_string(),
            });
        }
        self.inner.health().await.context("Backend health check failed")
    }

    /// Returns the access token for the credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.login(username, password)?.access_token);
        }
        let response = self.inner.login(username, password).await?;
        Ok(response.access_token)
    }

    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<User> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.register(email, username, password)?);
        }
        Ok(self.inner.register(email, username, password).await?)
    }

    pub async fn me(&self) -> Result<User> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.me(self.token())?);
        }
        Ok(self.inner.me().await?)
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_trips(self.token())?);
        }
        Ok(self.inner.list_trips().await?)
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Trip> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.get_trip(self.token(), trip_id)?);
        }
        Ok(self.inner.get_trip(trip_id).await?)
    }

    pub async fn create_trip(&self, trip: &TripCreate) -> Result<Trip> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.create_trip(self.token(), trip)?);
        }
        Ok(self.inner.create_trip(trip).await?)
    }

    pub async fn update_trip(&self, trip_id: i64, update: &TripUpdate) -> Result<Trip> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.update_trip(self.token(), trip_id, update)?);
        }
        Ok(self.inner.update_trip(trip_id, update).await?)
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.delete_trip(self.token(), trip_id)?);
        }
        Ok(self.inner.delete_trip(trip_id).await?)
    }

    pub async fn list_events(&self, trip_id: i64) -> Result<Vec<Event>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_events(self.token(), trip_id)?);
        }
        Ok(self.inner.list_events(trip_id).await?)
    }

    pub async fn create_event(&self, trip_id: i64, event: &EventCreate) -> Result<Event> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.create_event(self.token(), trip_id, event)?);
        }
        Ok(self.inner.create_event(trip_id, event).await?)
    }

    pub async fn update_event(&self, event_id: i64, update: &EventUpdate) -> Result<Event> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.update_event(self.token(), event_id, update)?);
        }
        Ok(self.inner.update_event(event_id, update).await?)
    }

    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.delete_event(self.token(), event_id)?);
        }
        Ok(self.inner.delete_event(event_id).await?)
    }

    pub async fn list_destinations(&self, trip_id: i64) -> Result<Vec<Destination>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_destinations(self.token(), trip_id)?);
        }
        Ok(self.inner.list_destinations(trip_id).await?)
    }

    pub async fn add_destination(
        &self,
        trip_id: i64,
        location: &LocationCreate,
    ) -> Result<Destination> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.add_destination(self.token(), trip_id, location)?);
        }
        Ok(self.inner.add_destination(trip_id, location).await?)
    }

    pub async fn remove_destination(&self, trip_id: i64, destination_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.remove_destination(self.token(), trip_id, destination_id)?);
        }
        Ok(self.inner.remove_destination(trip_id, destination_id).await?)
    }

    pub async fn move_destination(
        &self,
        trip_id: i64,
        destination_id: i64,
        direction: MoveDirection,
    ) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.move_destination(self.token(), trip_id, destination_id, direction)?);
        }
        Ok(self
            .inner
            .move_destination(trip_id, destination_id, direction)
            .await?)
    }

    pub async fn list_members(&self, trip_id: i64) -> Result<Vec<TripMember>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_members(self.token(), trip_id)?);
        }
        Ok(self.inner.list_members(trip_id).await?)
    }

    pub async fn upsert_member(&self, trip_id: i64, member: &MemberUpsert) -> Result<TripMember> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.upsert_member(self.token(), trip_id, member)?);
        }
        Ok(self.inner.upsert_member(trip_id, member).await?)
    }

    pub async fn remove_member(&self, trip_id: i64, user_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.remove_member(self.token(), trip_id, user_id)?);
        }
        Ok(self.inner.remove_member(trip_id, user_id).await?)
    }

    pub async fn list_envelopes(&self, trip_id: i64) -> Result<Vec<BudgetEnvelope>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_envelopes(self.token(), trip_id)?);
        }
        Ok(self.inner.list_envelopes(trip_id).await?)
    }

    pub async fn create_envelope(
        &self,
        trip_id: i64,
        envelope: &EnvelopeCreate,
    ) -> Result<BudgetEnvelope> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.create_envelope(self.token(), trip_id, envelope)?);
        }
        Ok(self.inner.create_envelope(trip_id, envelope).await?)
    }

    pub async fn update_envelope(
        &self,
        envelope_id: i64,
        update: &EnvelopeUpdate,
    ) -> Result<BudgetEnvelope> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.update_envelope(self.token(), envelope_id, update)?);
        }
        Ok(self.inner.update_envelope(envelope_id, update).await?)
    }

    pub async fn delete_envelope(&self, envelope_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.delete_envelope(self.token(), envelope_id)?);
        }
        Ok(self.inner.delete_envelope(envelope_id).await?)
    }

    pub async fn list_expenses(&self, trip_id: i64) -> Result<Vec<Expense>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_expenses(self.token(), trip_id)?);
        }
        Ok(self.inner.list_expenses(trip_id).await?)
    }

    pub async fn create_expense(&self, trip_id: i64, expense: &ExpenseCreate) -> Result<Expense> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.create_expense(self.token(), trip_id, expense)?);
        }
        Ok(self.inner.create_expense(trip_id, expense).await?)
    }

    pub async fn delete_expense(&self, expense_id: i64) -> Result<()> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.delete_expense(self.token(), expense_id)?);
        }
        Ok(self.inner.delete_expense(expense_id).await?)
    }

    pub async fn budget_summary(&self, trip_id: i64) -> Result<BudgetSummary> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.budget_summary(self.token(), trip_id)?);
        }
        Ok(self.inner.budget_summary(trip_id).await?)
    }

    pub async fn trip_weather(&self, trip_id: i64) -> Result<TripWeather> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.trip_weather(self.token(), trip_id)?);
        }
        Ok(self.inner.trip_weather(trip_id).await?)
    }

    pub async fn export_trip_pdf(&self, trip_id: i64) -> Result<Vec<u8>> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.export_trip_pdf(self.token(), trip_id)?);
        }
        Ok(self.inner.export_trip_pdf(trip_id).await?)
    }
}
