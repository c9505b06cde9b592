use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::session_store::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

/// Who is signed in. Changed only by `login`/`sign_in` and `logout`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    state: AuthState,
    store: SessionStore,
}

impl AuthContext {
    /// Restore the persisted session, if any. An unreadable session file
    /// counts as signed out.
    pub fn init(store: SessionStore) -> Self {
        let state = match store.load() {
            Ok(Some(session)) => AuthState::Authenticated(session),
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session file");
                AuthState::Anonymous
            }
        };
        Self { state, store }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.session().map(|s| s.username.as_str())
    }

    /// Exchange credentials for a token. On failure the context and the
    /// client's token stay as they were.
    pub async fn login(
        &mut self,
        client: &mut ApiClient,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let token = client.login(username, password).await?;
        self.sign_in(Session {
            token: token.clone(),
            username: username.to_string(),
        })?;
        client.set_token(Some(token));
        info!(username, "signed in");
        Ok(())
    }

    pub fn sign_in(&mut self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        self.state = AuthState::Authenticated(session);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to remove session file");
        }
        self.state = AuthState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_success_authenticates() {
        let mut client = ApiClient::dev().unwrap();
        let mut auth = AuthContext::init(SessionStore::in_memory());

        auth.login(&mut client, "demo", "demo").await.unwrap();

        assert!(auth.is_authenticated());
        assert_eq!(auth.username(), Some("demo"));
        assert_eq!(client.token(), auth.token());
    }

    #[tokio::test]
    async fn login_failure_stays_anonymous() {
        let mut client = ApiClient::dev().unwrap();
        let mut auth = AuthContext::init(SessionStore::in_memory());

        assert!(auth.login(&mut client, "demo", "wrong").await.is_err());
        assert_eq!(auth.state, AuthState::Anonymous);
        assert_eq!(client.token(), None);
    }

    #[tokio::test]
    async fn unsaved_session_leaves_client_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut client = ApiClient::dev().unwrap();
        let mut auth = AuthContext::init(SessionStore::at(blocker.join("session")));

        assert!(auth.login(&mut client, "demo", "demo").await.is_err());
        assert_eq!(auth.state, AuthState::Anonymous);
        assert_eq!(client.token(), None);
    }

    #[test]
    fn session_survives_restart_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");

        let mut auth = AuthContext::init(SessionStore::at(&path));
        assert!(!auth.is_authenticated());
        auth.sign_in(Session {
            token: "t".to_string(),
            username: "ana".to_string(),
        })
        .unwrap();

        let mut restored = AuthContext::init(SessionStore::at(&path));
        assert_eq!(restored.username(), Some("ana"));

        restored.logout();
        assert!(!restored.is_authenticated());
        assert!(!AuthContext::init(SessionStore::at(&path)).is_authenticated());
    }

    #[test]
    fn corrupt_session_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "not json").unwrap();
        assert!(!AuthContext::init(SessionStore::at(path)).is_authenticated());
    }
}
