use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The account record returned by the authentication endpoints.
///
/// This is also the value mirrored into durable storage under the `user` key;
/// a stored record that no longer parses as this type is treated as corrupt
/// and the whole session is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Credentials for an existing account
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload. The backend validates the confirmation match and
/// email uniqueness and reports problems as a structured `errors` list.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Successful login or signup response: the session pair plus a display
/// message.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub message: Option<String>,
}
