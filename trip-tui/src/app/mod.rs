use crate::auth::AuthContext;
use crate::config::TripConfig;
use std::path::PathBuf;

pub mod budget;
pub mod detail;
pub mod forms;
pub mod itinerary;
pub mod members;
mod state;
pub mod trips;
pub mod weather;

pub use budget::{BudgetData, EnvelopeEdit};
pub use detail::{DetailEditor, TripDetail};
pub use forms::{Form, FormError};
pub use state::{
    BudgetFocus, DeleteContext, DeleteTarget, DetailTab, OverviewFocus, Screen, TextInput,
};
pub use trips::{TripFilter, TripsPage};
pub use weather::WeatherState;

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

pub const LOGIN_USERNAME: usize = 0;
pub const LOGIN_PASSWORD: usize = 1;

pub const REGISTER_USERNAME: usize = 0;
pub const REGISTER_EMAIL: usize = 1;
pub const REGISTER_PASSWORD: usize = 2;

pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub auth: AuthContext,
    pub status_message: Option<String>,

    // Loading indicator
    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,

    pub login_form: Form,
    pub register_form: Form,
    pub trips: TripsPage,
    /// Set while the trip detail screen is open.
    pub detail: Option<TripDetail>,

    // Delete confirmation, drawn over the current screen
    pub delete_context: Option<DeleteContext>,

    pub export_dir: PathBuf,
}

impl App {
    pub fn new(cfg: &TripConfig, auth: AuthContext) -> Self {
        let screen = if auth.is_authenticated() {
            Screen::Trips
        } else {
            Screen::Login
        };
        Self {
            running: true,
            screen,
            auth,
            status_message: None,
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            login_form: new_login_form(),
            register_form: new_register_form(),
            trips: TripsPage::default(),
            detail: None,
            delete_context: None,
            export_dir: cfg.export_dir(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Change screen, sending anonymous users to the login screen instead of
    /// any screen that needs a session. Returns the screen actually shown.
    pub fn navigate(&mut self, screen: Screen) -> Screen {
        self.screen = if screen.requires_auth() && !self.auth.is_authenticated() {
            Screen::Login
        } else {
            screen
        };
        if self.screen != Screen::TripDetail {
            self.detail = None;
        }
        self.screen
    }

    pub fn open_detail(&mut self, detail: TripDetail) {
        self.detail = Some(detail);
        self.navigate(Screen::TripDetail);
    }

    /// Drop every piece of user data and return to the login screen.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.trips.clear();
        self.detail = None;
        self.delete_context = None;
        self.login_form = new_login_form();
        self.register_form = new_register_form();
        self.navigate(Screen::Login);
    }

    pub fn expire_session(&mut self) {
        self.logout();
        self.set_status(SESSION_EXPIRED);
    }

    pub fn username(&self) -> Option<&str> {
        self.auth.username()
    }
}

pub fn new_login_form() -> Form {
    Form::new(&["Username", "Password"]).masked(LOGIN_PASSWORD)
}

pub fn new_register_form() -> Form {
    Form::new(&["Username", "Email", "Password"]).masked(REGISTER_PASSWORD)
}

#[cfg(test)]
pub(crate) fn test_app() -> App {
    App::new(
        &TripConfig::default(),
        AuthContext::init(crate::session_store::SessionStore::in_memory()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;

    fn signed_in_app() -> App {
        let mut app = test_app();
        app.auth
            .sign_in(Session {
                token: "token".to_string(),
                username: "ana".to_string(),
            })
            .unwrap();
        app
    }

    #[test]
    fn anonymous_users_are_sent_to_login() {
        let mut app = test_app();
        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.navigate(Screen::Trips), Screen::Login);
        assert_eq!(app.navigate(Screen::TripDetail), Screen::Login);
        assert_eq!(app.navigate(Screen::Register), Screen::Register);
    }

    #[test]
    fn signed_in_users_reach_trips() {
        let mut app = signed_in_app();
        assert_eq!(app.navigate(Screen::Trips), Screen::Trips);
        assert_eq!(app.username(), Some("ana"));
    }

    #[test]
    fn expired_session_clears_state() {
        let mut app = signed_in_app();
        app.navigate(Screen::Trips);
        app.trips.search_input = TextInput::from_str("rome");

        app.expire_session();

        assert_eq!(app.screen, Screen::Login);
        assert!(!app.auth.is_authenticated());
        assert!(app.trips.search_input.is_blank());
        assert_eq!(app.status_message.as_deref(), Some(SESSION_EXPIRED));
    }
}
