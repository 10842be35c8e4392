//! User model and auth request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ropero_core::UserId;

/// A registered account.
///
/// The password hash is never part of this struct; repository methods that
/// need it return the hash separately so it cannot leak into a response.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub is_authenticated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to register a user.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Command to partially update a user. A present `password` is re-hashed;
/// a present `email` is re-validated and re-checked for uniqueness.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub is_admin: Option<bool>,
    pub is_authenticated: Option<bool>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response: the bearer token plus the account it belongs to.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Request body for token validation.
#[derive(Debug, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}
