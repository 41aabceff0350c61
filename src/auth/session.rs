//! Session context
//!
//! One `Session` exists per process and is shared by `Arc`. It owns the two
//! durable keys (credential and cached user), publishes the current
//! `SessionState` and holds the `Navigator` used for forced redirects.

use crate::api::models::User;
use crate::app::navigation::{Navigator, Route};
use crate::core::error::Result;
use crate::storage::{LocalStorage, TOKEN_KEY, USER_KEY};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Stored credentials not yet inspected
    Loading,
    Authenticated { user: User, token: String },
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

pub struct Session {
    storage: Arc<dyn LocalStorage>,
    state: watch::Sender<SessionState>,
    navigator: Navigator,
}

impl Session {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self::with_navigator(storage, Navigator::default())
    }

    pub fn with_navigator(storage: Arc<dyn LocalStorage>, navigator: Navigator) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            storage,
            state,
            navigator,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Credential to attach to outgoing calls, read from durable storage
    pub async fn credential(&self) -> Result<Option<String>> {
        self.storage.get(TOKEN_KEY).await
    }

    /// Read the stored credential and user.
    ///
    /// Both keys must be present and the user must deserialize; anything less
    /// counts as no stored session.
    pub async fn stored(&self) -> Result<Option<(String, User)>> {
        let token = self.storage.get(TOKEN_KEY).await?;
        let user = self.storage.get(USER_KEY).await?;

        let (token, raw_user) = match (token, user) {
            (Some(token), Some(raw_user)) => (token, raw_user),
            _ => return Ok(None),
        };

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Ok(Some((token, user))),
            Err(e) => {
                warn!(error = %e, "Stored user is unreadable");
                Ok(None)
            }
        }
    }

    /// Persist a fresh credential and user, then publish `Authenticated`
    pub async fn establish(&self, token: String, user: User) -> Result<()> {
        self.storage.set(TOKEN_KEY, &token).await?;
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?).await?;

        info!(user_id = user.id, apartment = %user.apartment_number, "Session established");
        self.publish(SessionState::Authenticated { user, token });
        Ok(())
    }

    /// Replace the cached user, keeping the current credential
    pub async fn replace_user(&self, user: User) -> Result<()> {
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?).await?;

        let token = match &*self.state.borrow() {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        };
        if let Some(token) = token {
            self.publish(SessionState::Authenticated { user, token });
        }
        Ok(())
    }

    /// Remove both durable keys and publish `Unauthenticated`.
    ///
    /// Storage failures are logged; the in-memory session is cleared anyway.
    pub async fn purge(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key, error = %e, "Failed to remove stored session key");
            }
        }
        self.publish(SessionState::Unauthenticated);
    }

    /// Purge and force navigation to the login entry point
    pub async fn invalidate(&self, reason: &str) {
        warn!(reason, "Session invalidated");
        self.purge().await;
        self.navigator.replace(Route::Login);
    }

    pub(crate) fn publish(&self, next: SessionState) {
        let label = match &next {
            SessionState::Loading => "loading",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Unauthenticated => "unauthenticated",
        };
        info!(state = label, "Session state changed");
        self.state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ada() -> User {
        User {
            id: 7,
            apartment_number: "4B".to_string(),
            name: "Ada".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_new_session_is_loading() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        assert_eq!(session.state(), SessionState::Loading);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_establish_persists_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());

        session.establish("tok".to_string(), ada()).await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok"));
        let (token, user) = session.stored().await.unwrap().unwrap();
        assert_eq!(token, "tok");
        assert_eq!(user, ada());
    }

    #[tokio::test]
    async fn test_stored_requires_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").await.unwrap();
        let session = Session::new(storage.clone());
        assert!(session.stored().await.unwrap().is_none());

        storage.set(USER_KEY, "{broken").await.unwrap();
        assert!(session.stored().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_purges_and_redirects() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());
        session.establish("tok".to_string(), ada()).await.unwrap();
        session.navigator().push(Route::Requests);

        session.invalidate("Token expired").await;

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.navigator().current(), Route::Login);
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(storage.get(USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_user_keeps_token() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        session.establish("tok".to_string(), ada()).await.unwrap();

        let mut renamed = ada();
        renamed.name = "Ada L.".to_string();
        session.replace_user(renamed.clone()).await.unwrap();

        match session.state() {
            SessionState::Authenticated { user, token } => {
                assert_eq!(user, renamed);
                assert_eq!(token, "tok");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }
}
