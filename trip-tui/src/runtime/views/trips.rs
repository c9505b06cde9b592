use crate::app::{trips, App, DeleteContext, DeleteTarget};
use crate::time_utils::today;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use trip_api::format_iso_date;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;
use super::form::{handle_form_key, FormOutcome};

const FORM_INCOMPLETE: &str = "Name, destination and both dates are required";

pub(super) fn handle_trips_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.trips.form.is_some() {
        handle_trip_form_key(key, app, action_tx);
        return;
    }
    if app.trips.searching {
        handle_search_key(key, app);
        return;
    }

    let today = today();
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.trips.select_next(today),
        KeyCode::Up | KeyCode::Char('k') => app.trips.select_previous(),
        KeyCode::Enter => {
            if let Some(trip) = app.trips.selected_trip(today) {
                enqueue_action(action_tx, Action::OpenTrip { trip_id: trip.id });
            }
        }
        KeyCode::Char('/') => app.trips.searching = true,
        KeyCode::Esc => {
            app.trips.search_input.clear();
            app.trips.selected = 0;
        }
        KeyCode::Char('f') => app.trips.cycle_filter(),
        KeyCode::Char('r') => enqueue_action(action_tx, Action::LoadTrips),
        KeyCode::Char('n') => app.trips.open_form(),
        KeyCode::Char('w') => app.trips.open_weekend_template(today),
        KeyCode::Char('c') => {
            if let Some(trip) = app.trips.selected_trip(today) {
                enqueue_action(action_tx, Action::DuplicateTrip { trip_id: trip.id });
            }
        }
        KeyCode::Char('d') => {
            let context = app.trips.selected_trip(today).map(|trip| DeleteContext {
                target: DeleteTarget::Trip(trip.id),
                label: trip.name.clone(),
                detail: format!(
                    "{}  ·  {} to {}",
                    trip.destination,
                    format_iso_date(trip.start_date),
                    format_iso_date(trip.end_date)
                ),
            });
            app.delete_context = context;
        }
        KeyCode::Char('L') => enqueue_action(action_tx, Action::Logout),
        _ => {}
    }
}

/// Typing filters the list live. Esc drops the query, Enter keeps it.
fn handle_search_key(key: KeyEvent, app: &mut App) {
    let page = &mut app.trips;
    match key.code {
        KeyCode::Esc => {
            page.search_input.clear();
            page.searching = false;
        }
        KeyCode::Enter => page.searching = false,
        KeyCode::Backspace => page.search_input.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            page.search_input.insert(c)
        }
        _ => return,
    }
    page.selected = 0;
}

fn handle_trip_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(form) = app.trips.form.as_mut() else {
        return;
    };
    // Ctrl+W: fill in next weekend
    if key.code == KeyCode::Char('w') && key.modifiers.contains(KeyModifiers::CONTROL) {
        trips::apply_weekend_template(form, today());
        return;
    }
    match handle_form_key(key, form) {
        Some(FormOutcome::Submit) => {
            if trips::trip_form_ready(form) {
                enqueue_action(action_tx, Action::SubmitTripForm);
            } else {
                form.set_error(FORM_INCOMPLETE);
            }
        }
        Some(FormOutcome::Cancel) => app.trips.form = None,
        None => {}
    }
}
