use serde::{Deserialize, Serialize};

/// Signed-in resident, as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Unique per user; doubles as the login handle
    pub apartment_number: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub apartment_number: &'a str,
    pub password: &'a str,
}

/// Register request body
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub apartment_number: &'a str,
    pub name: &'a str,
    pub password: &'a str,
}

/// Login and register response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// `GET/PUT /auth/profile` response
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// Profile update; absent fields are left unchanged
#[derive(Debug, Default, Serialize)]
pub struct UpdateProfileRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}
