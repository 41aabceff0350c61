//! Login, registration, logout and profile flows

use crate::api::models::{UpdateProfileRequest, User};
use crate::api::ApiClient;
use crate::app::navigation::Route;
use crate::auth::session::{Session, SessionState};
use crate::auth::validation;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const NAME_UPDATE_FAILED: &str = "Failed to update name";
pub const PASSWORD_UPDATE_FAILED: &str = "Failed to update password";
pub const NAME_UPDATED: &str = "Name updated successfully!";
pub const PASSWORD_UPDATED: &str = "Password updated successfully!";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.api.session()
    }

    /// Hydrate from storage and re-validate against the server.
    ///
    /// Publishes `Authenticated` as soon as a stored session is found, then
    /// either refreshes the cached user or falls back to `Unauthenticated`.
    pub async fn initialize(&self) -> Result<SessionState> {
        if self.restore().await?.is_authenticated() {
            // Failures are already reflected in the session state
            let _ = self.revalidate().await;
        }
        Ok(self.session().state())
    }

    /// Optimistic half of `initialize`: trust whatever storage holds
    pub async fn restore(&self) -> Result<SessionState> {
        let session = self.session();
        session.publish(SessionState::Loading);

        match session.stored().await? {
            Some((token, user)) => {
                info!(user_id = user.id, "Restored stored session");
                session.publish(SessionState::Authenticated { user, token });
            }
            None => {
                // Drop any half-written leftovers
                session.purge().await;
            }
        }

        Ok(session.state())
    }

    /// Confirm the stored credential by fetching the profile
    pub async fn revalidate(&self) -> Result<User> {
        match self.api.profile().await {
            Ok(user) => {
                self.session().replace_user(user.clone()).await?;
                Ok(user)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    // 401s were already handled by the client
                    self.session().invalidate(&e.to_string()).await;
                }
                Err(e)
            }
        }
    }

    pub async fn login(&self, apartment_number: &str, password: &str) -> Result<User> {
        validation::validate_login(apartment_number, password)?;

        let response = self.api.login(apartment_number.trim(), password).await?;
        self.enter(response.token, response.user).await
    }

    pub async fn register(
        &self,
        apartment_number: &str,
        name: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User> {
        validation::validate_registration(apartment_number, name, password, confirm_password)?;

        let response = self
            .api
            .register(apartment_number.trim(), name.trim(), password)
            .await?;
        self.enter(response.token, response.user).await
    }

    pub async fn logout(&self) {
        info!("Logging out");
        self.session().purge().await;
        self.session().navigator().replace(Route::Login);
    }

    /// Re-fetch the profile and cache it
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self.api.profile().await?;
        self.session().replace_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn update_name(&self, name: &str) -> Result<User> {
        validation::validate_name(name)?;

        let update = UpdateProfileRequest {
            name: Some(name.trim()),
            ..Default::default()
        };
        let user = self.api.update_profile(&update).await?;
        self.session().replace_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn change_password(&self, password: &str, confirm_password: &str) -> Result<()> {
        validation::validate_new_password(password, confirm_password)?;

        let update = UpdateProfileRequest {
            password: Some(password),
            ..Default::default()
        };
        if let Err(e) = self.api.update_profile(&update).await {
            warn!(error = %e, "Password change failed");
            return Err(e);
        }
        Ok(())
    }

    async fn enter(&self, token: String, user: User) -> Result<User> {
        self.session().establish(token, user.clone()).await?;
        self.session().navigator().push(Route::Dashboard);
        Ok(user)
    }
}
