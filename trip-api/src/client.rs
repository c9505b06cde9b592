use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::{
    BudgetEnvelope, BudgetSummary, Destination, EnvelopeCreate, EnvelopeUpdate, Event,
    EventCreate, EventUpdate, Expense, ExpenseCreate, HealthResponse, LocationCreate,
    LoginRequest, MemberUpsert, MoveDestinationRequest, MoveDirection, RegisterRequest,
    TokenResponse, Trip, TripCreate, TripMember, TripUpdate, TripWeather, User,
};
use crate::ApiUrl;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{call} returned {status}: {body}")]
    Status {
        call: String,
        status: StatusCode,
        body: String,
    },
    #[error("Failed to call {call}: {source}")]
    Request {
        call: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to parse {call} response: {message}")]
    Parsing { call: String, message: String },
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// REST client for the trip planner backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TripClient {
    client: Client,
    base_url: ApiUrl,
    token: Option<String>,
}

impl TripClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = ApiUrl::parse(base_url)?;
        let client = Client::builder()
            .build()
            .map_err(|source| ApiError::Request {
                call: "client builder".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.base_url.append_path(path);
        let request = self.client.request(method, url.as_ref());
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Request {
            call: call_name.to_string(),
            source,
        })?;

        let status = response.status();
        debug!(call = call_name, %status, "backend responded");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(call = call_name, %status, "request rejected as unauthorized");
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(call = call_name, %status, "backend returned error");
            return Err(ApiError::Status {
                call: call_name.to_string(),
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call_name).await?;
        response.json::<T>().await.map_err(|e| ApiError::Parsing {
            call: call_name.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        call_name: &str,
    ) -> Result<T, ApiError> {
        self.get_json(self.request(method, path).json(body), call_name)
            .await
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(self.request(Method::GET, "/health"), "GET /health")
            .await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/auth/login",
            &LoginRequest { username, password },
            "POST /auth/login",
        )
        .await
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        self.send_json(
            Method::POST,
            "/auth/register",
            &RegisterRequest {
                email,
                username,
                password,
            },
            "POST /auth/register",
        )
        .await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json(self.request(Method::GET, "/auth/me"), "GET /auth/me")
            .await
    }

    pub async fn list_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.get_json(self.request(Method::GET, "/trips"), "GET /trips")
            .await
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Trip, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}", trip_id)),
            "GET /trips/:id",
        )
        .await
    }

    pub async fn create_trip(&self, trip: &TripCreate) -> Result<Trip, ApiError> {
        self.send_json(Method::POST, "/trips", trip, "POST /trips")
            .await
    }

    pub async fn update_trip(&self, trip_id: i64, update: &TripUpdate) -> Result<Trip, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/trips/{}", trip_id),
            update,
            "PATCH /trips/:id",
        )
        .await
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(Method::DELETE, &format!("/trips/{}", trip_id)),
            "DELETE /trips/:id",
        )
        .await
    }

    pub async fn list_members(&self, trip_id: i64) -> Result<Vec<TripMember>, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/members", trip_id)),
            "GET /trips/:id/members",
        )
        .await
    }

    /// Add a member, or change the role of an existing one. Owner only.
    pub async fn upsert_member(
        &self,
        trip_id: i64,
        member: &MemberUpsert,
    ) -> Result<TripMember, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/trips/{}/members", trip_id),
            member,
            "POST /trips/:id/members",
        )
        .await
    }

    pub async fn remove_member(&self, trip_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(
                Method::DELETE,
                &format!("/trips/{}/members/{}", trip_id, user_id),
            ),
            "DELETE /trips/:id/members/:user_id",
        )
        .await
    }

    pub async fn list_events(&self, trip_id: i64) -> Result<Vec<Event>, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/events", trip_id)),
            "GET /trips/:id/events",
        )
        .await
    }

    pub async fn create_event(&self, trip_id: i64, event: &EventCreate) -> Result<Event, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/trips/{}/events", trip_id),
            event,
            "POST /trips/:id/events",
        )
        .await
    }

    pub async fn update_event(&self, event_id: i64, update: &EventUpdate) -> Result<Event, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/events/{}", event_id),
            update,
            "PATCH /events/:id",
        )
        .await
    }

    pub async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(Method::DELETE, &format!("/events/{}", event_id)),
            "DELETE /events/:id",
        )
        .await
    }

    pub async fn list_destinations(&self, trip_id: i64) -> Result<Vec<Destination>, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/destinations", trip_id)),
            "GET /trips/:id/destinations",
        )
        .await
    }

    pub async fn add_destination(
        &self,
        trip_id: i64,
        location: &LocationCreate,
    ) -> Result<Destination, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/trips/{}/destinations", trip_id),
            location,
            "POST /trips/:id/destinations",
        )
        .await
    }

    pub async fn remove_destination(
        &self,
        trip_id: i64,
        destination_id: i64,
    ) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(
                Method::DELETE,
                &format!("/trips/{}/destinations/{}", trip_id, destination_id),
            ),
            "DELETE /trips/:id/destinations/:dest_id",
        )
        .await
    }

    pub async fn move_destination(
        &self,
        trip_id: i64,
        destination_id: i64,
        direction: MoveDirection,
    ) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(
                Method::PATCH,
                &format!("/trips/{}/destinations/{}/move", trip_id, destination_id),
            )
            .json(&MoveDestinationRequest { direction }),
            "PATCH /trips/:id/destinations/:dest_id/move",
        )
        .await
    }

    pub async fn list_envelopes(&self, trip_id: i64) -> Result<Vec<BudgetEnvelope>, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/envelopes", trip_id)),
            "GET /trips/:id/envelopes",
        )
        .await
    }

    pub async fn create_envelope(
        &self,
        trip_id: i64,
        envelope: &EnvelopeCreate,
    ) -> Result<BudgetEnvelope, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/trips/{}/envelopes", trip_id),
            envelope,
            "POST /trips/:id/envelopes",
        )
        .await
    }

    pub async fn update_envelope(
        &self,
        envelope_id: i64,
        update: &EnvelopeUpdate,
    ) -> Result<BudgetEnvelope, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/envelopes/{}", envelope_id),
            update,
            "PATCH /envelopes/:id",
        )
        .await
    }

    pub async fn delete_envelope(&self, envelope_id: i64) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(Method::DELETE, &format!("/envelopes/{}", envelope_id)),
            "DELETE /envelopes/:id",
        )
        .await
    }

    pub async fn list_expenses(&self, trip_id: i64) -> Result<Vec<Expense>, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/expenses", trip_id)),
            "GET /trips/:id/expenses",
        )
        .await
    }

    pub async fn create_expense(
        &self,
        trip_id: i64,
        expense: &ExpenseCreate,
    ) -> Result<Expense, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/trips/{}/expenses", trip_id),
            expense,
            "POST /trips/:id/expenses",
        )
        .await
    }

    pub async fn delete_expense(&self, expense_id: i64) -> Result<(), ApiError> {
        self.send_without_body(
            self.request(Method::DELETE, &format!("/expenses/{}", expense_id)),
            "DELETE /expenses/:id",
        )
        .await
    }

    pub async fn budget_summary(&self, trip_id: i64) -> Result<BudgetSummary, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/budget", trip_id)),
            "GET /trips/:id/budget",
        )
        .await
    }

    pub async fn trip_weather(&self, trip_id: i64) -> Result<TripWeather, ApiError> {
        self.get_json(
            self.request(Method::GET, &format!("/trips/{}/weather", trip_id)),
            "GET /trips/:id/weather",
        )
        .await
    }

    /// Download the PDF rendering of a trip produced by the backend.
    pub async fn export_trip_pdf(&self, trip_id: i64) -> Result<Vec<u8>, ApiError> {
        let call_name = "GET /trips/:id/export/pdf";
        let response = self
            .send(
                self.request(Method::GET, &format!("/trips/{}/export/pdf", trip_id)),
                call_name,
            )
            .await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Request {
            call: call_name.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_base_url() {
        assert!(matches!(
            TripClient::new("::nope"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn token_is_attached_after_with_token() {
        let client = TripClient::new("http://localhost:8000")
            .unwrap()
            .with_token("abc");
        assert_eq!(client.token(), Some("abc"));

        let mut client = client;
        client.set_token(None);
        assert_eq!(client.token(), None);
    }

    #[test]
    fn bearer_header_is_set_on_requests() {
        let client = TripClient::new("http://localhost:8000")
            .unwrap()
            .with_token("secret-token");
        let request = client.request(Method::GET, "/trips").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/trips");
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Bearer secret-token"
        );
    }

    #[test]
    fn anonymous_requests_carry_no_authorization() {
        let client = TripClient::new("http://localhost:8000").unwrap();
        let request = client.request(Method::POST, "/auth/login").build().unwrap();
        assert!(request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .is_none());
    }

    #[test]
    fn unauthorized_is_distinguishable() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Parsing {
            call: "GET /trips".to_string(),
            message: "eof".to_string()
        }
        .is_unauthorized());
    }
}
