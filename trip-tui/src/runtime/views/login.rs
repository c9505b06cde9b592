use crate::app::{App, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;
use super::form::{handle_form_key, FormOutcome};

pub(super) fn handle_login_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let wants_register = key.code == KeyCode::F(2)
        || (key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL));
    if wants_register {
        app.clear_status();
        app.navigate(Screen::Register);
        return;
    }
    match handle_form_key(key, &mut app.login_form) {
        Some(FormOutcome::Submit) => enqueue_action(action_tx, Action::SubmitLogin),
        Some(FormOutcome::Cancel) => app.quit(),
        None => {}
    }
}

pub(super) fn handle_register_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match handle_form_key(key, &mut app.register_form) {
        Some(FormOutcome::Submit) => enqueue_action(action_tx, Action::SubmitRegister),
        Some(FormOutcome::Cancel) => {
            app.register_form.error = None;
            app.navigate(Screen::Login);
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{test_app, LOGIN_PASSWORD};

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, key: KeyEvent) -> Option<Action> {
        let (tx, mut rx) = channel();
        match app.screen {
            Screen::Register => handle_register_key(key, app, &tx),
            _ => handle_login_key(key, app, &tx),
        }
        rx.try_recv().ok()
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_submits_credentials() {
        let mut app = test_app();
        assert_eq!(press(&mut app, plain(KeyCode::Enter)), Some(Action::SubmitLogin));
    }

    #[test]
    fn password_is_typed_into_the_second_field() {
        let mut app = test_app();
        press(&mut app, plain(KeyCode::Tab));
        press(&mut app, plain(KeyCode::Char('p')));
        assert_eq!(app.login_form.raw_value(LOGIN_PASSWORD), "p");
    }

    #[test]
    fn ctrl_r_opens_registration_and_esc_returns() {
        let mut app = test_app();
        press(
            &mut app,
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
        );
        assert_eq!(app.screen, Screen::Register);
        assert_eq!(
            press(&mut app, plain(KeyCode::Enter)),
            Some(Action::SubmitRegister)
        );

        press(&mut app, plain(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Login);
        assert!(app.running);
    }

    #[test]
    fn esc_on_login_quits() {
        let mut app = test_app();
        press(&mut app, plain(KeyCode::Esc));
        assert!(!app.running);
    }
}
