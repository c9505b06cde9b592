use crate::app::{App, BudgetFocus, DetailTab, OverviewFocus, Screen, TripDetail, WeatherState};
use crate::time_utils::today;
use crossterm::event::{KeyCode, KeyEvent};
use trip_api::MoveDirection;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;
use super::form::{handle_form_key, FormOutcome};

pub(super) fn handle_detail_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(detail) = app.detail.as_mut() else {
        return;
    };

    if let Some(editor) = detail.editor.as_mut() {
        match handle_form_key(key, editor.form_mut()) {
            Some(FormOutcome::Submit) => enqueue_action(action_tx, Action::SubmitDetailForm),
            Some(FormOutcome::Cancel) => detail.close_editor(),
            None => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Esc | KeyCode::Backspace => {
            app.navigate(Screen::Trips);
            enqueue_action(action_tx, Action::LoadTrips);
        }
        KeyCode::Tab | KeyCode::Char('l') => {
            let fetch = detail.next_tab();
            fetch_weather_if(fetch, detail, action_tx);
        }
        KeyCode::BackTab | KeyCode::Char('h') => {
            let fetch = detail.previous_tab();
            fetch_weather_if(fetch, detail, action_tx);
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            let fetch = detail.select_tab(DetailTab::ALL[idx]);
            fetch_weather_if(fetch, detail, action_tx);
        }
        KeyCode::Down | KeyCode::Char('j') => detail.select_next(),
        KeyCode::Up | KeyCode::Char('k') => detail.select_previous(),
        KeyCode::Char('e') => {
            let opened = match (detail.tab, detail.overview_focus) {
                (DetailTab::Overview, OverviewFocus::Members) => detail.open_member_edit(),
                (DetailTab::Overview, _) => {
                    detail.open_trip_form();
                    true
                }
                (DetailTab::Itinerary, _) => detail.open_event_edit(),
                (DetailTab::Budget, _) => {
                    detail.budget_focus == BudgetFocus::Envelopes && detail.start_envelope_edit()
                }
                (DetailTab::Weather, _) => true,
            };
            if !opened {
                app.set_status("Nothing selected to edit");
            }
        }
        KeyCode::Char('a') => match detail.tab {
            DetailTab::Overview => match detail.overview_focus {
                OverviewFocus::Destinations => detail.open_destination_form(),
                OverviewFocus::Members => detail.open_member_form(),
            },
            DetailTab::Itinerary => detail.open_event_form(),
            DetailTab::Budget => match detail.budget_focus {
                BudgetFocus::Envelopes => detail.open_envelope_form(),
                BudgetFocus::Expenses => detail.open_expense_form(today()),
            },
            DetailTab::Weather => {}
        },
        KeyCode::Char('d') => {
            let context = detail.delete_context();
            app.delete_context = context;
        }
        KeyCode::Char('f') => match detail.tab {
            DetailTab::Overview => detail.toggle_overview_focus(),
            DetailTab::Budget => detail.toggle_budget_focus(),
            _ => {}
        },
        KeyCode::Char('K') => move_destination(detail, MoveDirection::Up, action_tx),
        KeyCode::Char('J') => move_destination(detail, MoveDirection::Down, action_tx),
        KeyCode::Char('p') => enqueue_action(action_tx, Action::ExportTrip),
        // r: retry a failed forecast
        KeyCode::Char('r')
            if detail.tab == DetailTab::Weather && detail.weather == WeatherState::Failed =>
        {
            fetch_weather_if(true, detail, action_tx);
        }
        _ => {}
    }
}

fn fetch_weather_if(fetch: bool, detail: &mut TripDetail, action_tx: &ActionTx) {
    if fetch {
        detail.weather = WeatherState::Loading;
        enqueue_action(action_tx, Action::LoadWeather);
    }
}

fn move_destination(detail: &TripDetail, direction: MoveDirection, action_tx: &ActionTx) {
    if detail.tab != DetailTab::Overview || detail.overview_focus != OverviewFocus::Destinations {
        return;
    }
    if let Some(destination) = detail.selected_destination() {
        enqueue_action(
            action_tx,
            Action::MoveDestination {
                destination_id: destination.id,
                direction,
            },
        );
    }
}
