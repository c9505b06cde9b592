use crate::app::{App, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod confirm_delete;
mod detail;
mod form;
mod login;
mod trips;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Ctrl+C always quits. An open delete dialog takes every other key.
pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    if app.delete_context.is_some() {
        confirm_delete::handle_confirm_delete_key(key, app, action_tx);
        return;
    }
    handle_view_key(key, app, action_tx);
}

fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match app.screen {
        Screen::Login => login::handle_login_key(key, app, action_tx),
        Screen::Register => login::handle_register_key(key, app, action_tx),
        Screen::Trips => trips::handle_trips_key(key, app, action_tx),
        Screen::TripDetail => detail::handle_detail_key(key, app, action_tx),
    }
}
