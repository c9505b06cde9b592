use crate::api::{is_unauthorized, ApiClient};
use crate::app::{
    self, budget, detail as detail_forms, itinerary, members, trips, App, BudgetData, DeleteTarget,
    DetailEditor, FormError, Screen, TripDetail, WeatherState,
};
use crate::export;
use crate::time_utils::today;
use anyhow::Result;
use tracing::{info, warn};
use trip_api::{
    EnvelopeCreate, EnvelopeUpdate, EventCreate, EventUpdate, ExpenseCreate, LocationCreate,
    MemberUpsert, MoveDirection, TripUpdate,
};

use super::action_queue::Action;

const SAVE_FAILED: &str = "Could not save your changes. Please try again.";
const LOGIN_FAILED: &str = "Invalid username or password.";

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    client: &mut ApiClient,
) -> Result<()> {
    match action {
        Action::SubmitLogin => {
            submit_login(app, client).await;
        }
        Action::SubmitRegister => {
            submit_register(app, client).await;
        }
        Action::Logout => {
            client.set_token(None);
            app.logout();
            app.set_status("Logged out");
        }
        Action::LoadTrips => {
            load_trips(app, client).await;
        }
        Action::SubmitTripForm => {
            submit_trip_form(app, client).await;
        }
        Action::DuplicateTrip { trip_id } => {
            duplicate_trip(trip_id, app, client).await;
        }
        Action::OpenTrip { trip_id } => {
            open_trip(trip_id, app, client).await;
        }
        Action::LoadWeather => {
            load_weather(app, client).await;
        }
        Action::SubmitDetailForm => {
            submit_detail_form(app, client).await;
        }
        Action::MoveDestination {
            destination_id,
            direction,
        } => {
            move_destination(destination_id, direction, app, client).await;
        }
        Action::ConfirmDelete => {
            confirm_delete(app, client).await;
        }
        Action::ExportTrip => {
            export_current_trip(app, client).await;
        }
    }
    Ok(())
}

/// Fetch the trip list. Failing to list trips means the session is unusable.
pub(crate) async fn load_trips(app: &mut App, client: &mut ApiClient) {
    match client.list_trips().await {
        Ok(trips) => {
            info!(count = trips.len(), "loaded trips");
            app.trips.set_trips(trips, today());
        }
        Err(e) => {
            warn!("failed to load trips: {e:#}");
            expire_session(app, client);
        }
    }
}

fn expire_session(app: &mut App, client: &mut ApiClient) {
    client.set_token(None);
    app.expire_session();
}

/// Report a failed backend call. A rejected token ends the session; anything
/// else is shown on the open form, or in the status line when none is open.
fn report_failure(app: &mut App, client: &mut ApiClient, err: anyhow::Error, message: &str) {
    warn!("{message} {err:#}");
    if is_unauthorized(&err) {
        expire_session(app, client);
        return;
    }
    match active_form_mut(app) {
        Some(form) => form.set_error(message),
        None => app.set_status(message),
    }
}

fn active_form_mut(app: &mut App) -> Option<&mut app::Form> {
    match app.screen {
        Screen::Trips => app.trips.form.as_mut(),
        Screen::TripDetail => app
            .detail
            .as_mut()
            .and_then(|d| d.editor.as_mut())
            .map(DetailEditor::form_mut),
        Screen::Login | Screen::Register => None,
    }
}

async fn submit_login(app: &mut App, client: &mut ApiClient) {
    let username = app.login_form.value(app::LOGIN_USERNAME).to_string();
    let password = app.login_form.raw_value(app::LOGIN_PASSWORD).to_string();
    if username.is_empty() || password.is_empty() {
        app.login_form
            .set_error("Username and password are required");
        return;
    }

    match app.auth.login(client, &username, &password).await {
        Ok(()) => {
            app.login_form = app::new_login_form();
            app.clear_status();
            app.navigate(Screen::Trips);
            load_trips(app, client).await;
        }
        Err(e) => {
            warn!("login failed: {e:#}");
            app.login_form.set_error(LOGIN_FAILED);
        }
    }
}

async fn submit_register(app: &mut App, client: &mut ApiClient) {
    let username = app.register_form.value(app::REGISTER_USERNAME).to_string();
    let email = app.register_form.value(app::REGISTER_EMAIL).to_string();
    let password = app.register_form.raw_value(app::REGISTER_PASSWORD).to_string();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        app.register_form
            .set_error("Username, email and password are required");
        return;
    }

    if let Err(e) = client.register(&email, &username, &password).await {
        warn!("registration failed: {e:#}");
        app.register_form
            .set_error("Could not create the account. The username or email may be taken.");
        return;
    }
    info!(username = %username, "registered account");

    match app.auth.login(client, &username, &password).await {
        Ok(()) => {
            app.register_form = app::new_register_form();
            app.set_status(format!("Welcome, {}!", username));
            app.navigate(Screen::Trips);
            load_trips(app, client).await;
        }
        Err(e) => {
            warn!("sign-in after registration failed: {e:#}");
            app.navigate(Screen::Login);
            app.set_status("Account created. Please log in.");
        }
    }
}

async fn submit_trip_form(app: &mut App, client: &mut ApiClient) {
    let Some(form) = app.trips.form.as_ref() else {
        return;
    };
    let create = match trips::trip_create_from(form) {
        Ok(create) => create,
        Err(e) => {
            if let Some(form) = app.trips.form.as_mut() {
                form.set_error(e);
            }
            return;
        }
    };

    match client.create_trip(&create).await {
        Ok(trip) => {
            info!(trip_id = trip.id, "created trip");
            app.trips.form = None;
            app.set_status(format!("Created \"{}\"", trip.name));
            load_trips(app, client).await;
        }
        Err(e) => report_failure(app, client, e, "Could not create the trip. Please try again."),
    }
}

async fn duplicate_trip(trip_id: i64, app: &mut App, client: &mut ApiClient) {
    let Some(trip) = app.trips.trips.iter().find(|t| t.id == trip_id) else {
        return;
    };
    let payload = trips::duplicate_payload(trip);

    match client.create_trip(&payload).await {
        Ok(copy) => {
            info!(trip_id, copy_id = copy.id, "duplicated trip");
            app.set_status(format!("Duplicated as \"{}\"", copy.name));
            load_trips(app, client).await;
        }
        Err(e) => report_failure(app, client, e, "Could not duplicate the trip."),
    }
}

/// The detail screen loads everything at once. Any failure is treated as a
/// broken session.
async fn open_trip(trip_id: i64, app: &mut App, client: &mut ApiClient) {
    match fetch_trip_detail(client, trip_id).await {
        Ok(detail) => {
            app.clear_status();
            app.open_detail(detail);
        }
        Err(e) => {
            warn!(trip_id, "failed to load trip detail: {e:#}");
            expire_session(app, client);
        }
    }
}

async fn fetch_trip_detail(client: &ApiClient, trip_id: i64) -> Result<TripDetail> {
    let (trip, events, summary, destinations, members) = tokio::try_join!(
        client.get_trip(trip_id),
        client.list_events(trip_id),
        client.budget_summary(trip_id),
        client.list_destinations(trip_id),
        client.list_members(trip_id),
    )?;
    let mut detail = TripDetail::new(trip, events, summary, destinations);
    detail.set_members(members);

    // Older backends send totals without the lists behind them.
    let budget = &detail.budget;
    if budget.envelopes.is_empty()
        && budget.expenses.is_empty()
        && (budget.summary.total_planned > 0.0 || budget.summary.total_actual > 0.0)
    {
        detail.set_budget(fetch_budget(client, trip_id).await?);
    }
    Ok(detail)
}

async fn fetch_budget(client: &ApiClient, trip_id: i64) -> Result<BudgetData> {
    let (envelopes, expenses, summary) = tokio::try_join!(
        client.list_envelopes(trip_id),
        client.list_expenses(trip_id),
        client.budget_summary(trip_id),
    )?;
    Ok(BudgetData {
        envelopes,
        expenses,
        summary,
    })
}

/// Forecast failures stay on the weather tab and never end the session.
async fn load_weather(app: &mut App, client: &mut ApiClient) {
    let Some(trip_id) = current_trip_id(app) else {
        return;
    };
    let result = client.trip_weather(trip_id).await;
    let Some(detail) = detail_for(app, trip_id) else {
        return;
    };
    detail.weather = match result {
        Ok(weather) => WeatherState::Loaded(weather),
        Err(e) => {
            warn!(trip_id, "failed to load forecast: {e:#}");
            WeatherState::Failed
        }
    };
}

fn current_trip_id(app: &App) -> Option<i64> {
    app.detail.as_ref().map(TripDetail::trip_id)
}

fn detail_for(app: &mut App, trip_id: i64) -> Option<&mut TripDetail> {
    app.detail.as_mut().filter(|d| d.trip_id() == trip_id)
}

/// Which part of the detail screen to fetch again after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    Trip,
    Destinations,
    Members,
    Events,
    Budget,
}

async fn reload(app: &mut App, client: &ApiClient, trip_id: i64, refresh: Refresh) -> Result<()> {
    match refresh {
        Refresh::Trip => {
            let trip = client.get_trip(trip_id).await?;
            if let Some(detail) = detail_for(app, trip_id) {
                detail.set_trip(trip);
            }
        }
        Refresh::Destinations => {
            let destinations = client.list_destinations(trip_id).await?;
            if let Some(detail) = detail_for(app, trip_id) {
                detail.set_destinations(destinations);
            }
        }
        Refresh::Members => {
            let members = client.list_members(trip_id).await?;
            if let Some(detail) = detail_for(app, trip_id) {
                detail.set_members(members);
            }
        }
        Refresh::Events => {
            let events = client.list_events(trip_id).await?;
            if let Some(detail) = detail_for(app, trip_id) {
                detail.set_events(events);
            }
        }
        Refresh::Budget => {
            let budget = fetch_budget(client, trip_id).await?;
            if let Some(detail) = detail_for(app, trip_id) {
                detail.set_budget(budget);
            }
        }
    }
    Ok(())
}

/// A validated change from one of the detail screen's forms.
#[derive(Debug, Clone, PartialEq)]
enum DetailMutation {
    UpdateTrip(TripUpdate),
    AddDestination(LocationCreate),
    UpsertMember(MemberUpsert),
    CreateEvent(EventCreate),
    UpdateEvent(i64, EventUpdate),
    CreateEnvelope(EnvelopeCreate),
    UpdateEnvelope(i64, EnvelopeUpdate),
    CreateExpense(ExpenseCreate),
}

impl DetailMutation {
    fn from_editor(detail: &TripDetail, editor: &DetailEditor) -> Result<Self, FormError> {
        let trip_id = detail.trip_id();
        Ok(match editor {
            DetailEditor::Trip(form) => Self::UpdateTrip(trips::trip_update_from(form)?),
            DetailEditor::Destination(form) => {
                Self::AddDestination(detail_forms::destination_create_from(form)?)
            }
            DetailEditor::Member { user_id, form } => {
                let mut member = members::member_upsert_from(form)?;
                // Changing a role never moves it to another user.
                if let Some(id) = user_id {
                    member.user_id = *id;
                }
                Self::UpsertMember(member)
            }
            DetailEditor::Event {
                event_id: None,
                form,
            } => Self::CreateEvent(itinerary::event_create_from(form, trip_id)?),
            DetailEditor::Event {
                event_id: Some(id),
                form,
            } => Self::UpdateEvent(*id, itinerary::event_update_from(form)?),
            DetailEditor::NewEnvelope(form) => {
                Self::CreateEnvelope(budget::envelope_create_from(form, trip_id)?)
            }
            DetailEditor::EditEnvelope(edit) => {
                Self::UpdateEnvelope(edit.envelope_id, budget::envelope_update_from(&edit.form)?)
            }
            DetailEditor::Expense(form) => Self::CreateExpense(budget::expense_create_from(
                form,
                trip_id,
                &detail.budget.envelopes,
            )?),
        })
    }

    async fn apply(&self, client: &ApiClient, trip_id: i64) -> Result<Refresh> {
        Ok(match self {
            Self::UpdateTrip(update) => {
                client.update_trip(trip_id, update).await?;
                Refresh::Trip
            }
            Self::AddDestination(location) => {
                client.add_destination(trip_id, location).await?;
                Refresh::Destinations
            }
            Self::UpsertMember(member) => {
                client.upsert_member(trip_id, member).await?;
                Refresh::Members
            }
            Self::CreateEvent(event) => {
                client.create_event(trip_id, event).await?;
                Refresh::Events
            }
            Self::UpdateEvent(id, update) => {
                client.update_event(*id, update).await?;
                Refresh::Events
            }
            Self::CreateEnvelope(envelope) => {
                client.create_envelope(trip_id, envelope).await?;
                Refresh::Budget
            }
            Self::UpdateEnvelope(id, update) => {
                client.update_envelope(*id, update).await?;
                Refresh::Budget
            }
            Self::CreateExpense(expense) => {
                client.create_expense(trip_id, expense).await?;
                Refresh::Budget
            }
        })
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::UpdateTrip(_) => "Trip updated",
            Self::AddDestination(_) => "Destination added",
            Self::UpsertMember(_) => "Member saved",
            Self::CreateEvent(_) => "Event added",
            Self::UpdateEvent(..) => "Event updated",
            Self::CreateEnvelope(_) => "Envelope added",
            Self::UpdateEnvelope(..) => "Envelope updated",
            Self::CreateExpense(_) => "Expense added",
        }
    }
}

async fn submit_detail_form(app: &mut App, client: &mut ApiClient) {
    let Some(detail) = app.detail.as_ref() else {
        return;
    };
    let Some(editor) = detail.editor.as_ref() else {
        return;
    };
    let trip_id = detail.trip_id();
    let mutation = match DetailMutation::from_editor(detail, editor) {
        Ok(mutation) => mutation,
        Err(e) => {
            if let Some(form) = active_form_mut(app) {
                form.set_error(e);
            }
            return;
        }
    };

    match mutation.apply(client, trip_id).await {
        Ok(refresh) => {
            info!(trip_id, ?refresh, "saved trip change");
            if let Some(detail) = detail_for(app, trip_id) {
                detail.close_editor();
            }
            app.set_status(mutation.success_message());
            if let Err(e) = reload(app, client, trip_id, refresh).await {
                report_failure(app, client, e, "Saved, but reloading the trip failed.");
            }
        }
        Err(e) => report_failure(app, client, e, SAVE_FAILED),
    }
}

async fn move_destination(
    destination_id: i64,
    direction: MoveDirection,
    app: &mut App,
    client: &mut ApiClient,
) {
    let Some(trip_id) = current_trip_id(app) else {
        return;
    };
    let moved = client
        .move_destination(trip_id, destination_id, direction)
        .await;
    let result = match moved {
        Ok(()) => reload(app, client, trip_id, Refresh::Destinations).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => {
            if let Some(detail) = detail_for(app, trip_id) {
                detail.select_destination(destination_id);
            }
        }
        Err(e) => report_failure(app, client, e, "Could not move the destination."),
    }
}

async fn confirm_delete(app: &mut App, client: &mut ApiClient) {
    let Some(ctx) = app.delete_context.take() else {
        return;
    };
    let trip_id = current_trip_id(app);

    let result = match (ctx.target, trip_id) {
        (DeleteTarget::Trip(id), _) => client.delete_trip(id).await.map(|()| None),
        (DeleteTarget::Destination(id), Some(trip_id)) => client
            .remove_destination(trip_id, id)
            .await
            .map(|()| Some(Refresh::Destinations)),
        (DeleteTarget::Member(user_id), Some(trip_id)) => client
            .remove_member(trip_id, user_id)
            .await
            .map(|()| Some(Refresh::Members)),
        (DeleteTarget::Event(id), Some(_)) => {
            client.delete_event(id).await.map(|()| Some(Refresh::Events))
        }
        (DeleteTarget::Envelope(id), Some(_)) => {
            client.delete_envelope(id).await.map(|()| Some(Refresh::Budget))
        }
        (DeleteTarget::Expense(id), Some(_)) => {
            client.delete_expense(id).await.map(|()| Some(Refresh::Budget))
        }
        (_, None) => return,
    };

    match result {
        Ok(refresh) => {
            info!(deleted = ?ctx.target, "deleted");
            app.set_status(format!("Deleted \"{}\"", ctx.label));
            match (refresh, trip_id) {
                (Some(refresh), Some(trip_id)) => {
                    if let Err(e) = reload(app, client, trip_id, refresh).await {
                        report_failure(app, client, e, "Deleted, but reloading the trip failed.");
                    }
                }
                _ => load_trips(app, client).await,
            }
        }
        Err(e) => {
            let message = format!("Could not delete \"{}\".", ctx.label);
            report_failure(app, client, e, &message);
        }
    }
}

async fn export_current_trip(app: &mut App, client: &mut ApiClient) {
    let Some(trip_id) = current_trip_id(app) else {
        return;
    };
    let exported = export::export_trip(client, trip_id, &app.export_dir).await;
    match exported {
        Ok(path) => app.set_status(format!("Saved PDF to {}", path.display())),
        Err(e) => report_failure(app, client, e, "Could not export the trip."),
    }
}
