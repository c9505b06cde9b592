use crate::api::ApiClient;
use crate::app::{self, App};
use crate::runtime::load_trips;
use tracing::{info, warn};

const DEV_USER: &str = "demo";

pub async fn initialize_app_state(app: &mut App, client: &mut ApiClient) {
    app.is_loading = true;

    match client.health().await {
        Ok(health) => info!(status = %health.status, url = client.base_url(), "backend reachable"),
        Err(e) => {
            warn!("health check failed: {e:#}");
            app.set_status(format!("Backend not reachable at {}", client.base_url()));
        }
    }

    if client.is_dev() {
        app.login_form = app::new_login_form()
            .with_value(app::LOGIN_USERNAME, DEV_USER)
            .with_value(app::LOGIN_PASSWORD, DEV_USER);
        app.set_status("Dev mode: sample data, log in as demo / demo");
    }

    // A saved session goes straight to the trip list; if it has expired this
    // sends the user back to login.
    if app.auth.is_authenticated() {
        load_trips(app, client).await;
    }

    app.is_loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{test_app, Screen, SESSION_EXPIRED};
    use crate::auth::Session;

    #[tokio::test]
    async fn dev_mode_prefills_the_demo_account() {
        let mut app = test_app();
        let mut client = ApiClient::dev().unwrap();

        initialize_app_state(&mut app, &mut client).await;

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.login_form.value(app::LOGIN_USERNAME), DEV_USER);
        assert!(!app.is_loading);
    }

    #[tokio::test]
    async fn stale_saved_session_is_dropped() {
        let mut app = test_app();
        app.auth
            .sign_in(Session {
                token: "stale".to_string(),
                username: "demo".to_string(),
            })
            .unwrap();
        app.navigate(Screen::Trips);
        let mut client = ApiClient::dev().unwrap();
        client.set_token(Some("stale".to_string()));

        initialize_app_state(&mut app, &mut client).await;

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.status_message.as_deref(), Some(SESSION_EXPIRED));
    }
}
