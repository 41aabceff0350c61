use crate::api::client::ApiClient;
use crate::api::models::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest, User,
};
use crate::core::error::Result;

impl ApiClient {
    /// `POST /auth/register`
    pub async fn register(
        &self,
        apartment_number: &str,
        name: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let body = RegisterRequest {
            apartment_number,
            name,
            password,
        };
        self.post("/auth/register", &body).await
    }

    /// `POST /auth/login`
    pub async fn login(&self, apartment_number: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            apartment_number,
            password,
        };
        self.post("/auth/login", &body).await
    }

    /// `GET /auth/profile`
    pub async fn profile(&self) -> Result<User> {
        let response: ProfileResponse = self.get("/auth/profile").await?;
        Ok(response.user)
    }

    /// `PUT /auth/profile`
    pub async fn update_profile(&self, update: &UpdateProfileRequest<'_>) -> Result<User> {
        let response: ProfileResponse = self.put("/auth/profile", update).await?;
        Ok(response.user)
    }
}
