//! User account and authentication handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use ropero_core::UserId;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::user::{
    LoginRequest, LoginResponse, RegisterUser, UpdateUser, User, ValidateTokenRequest,
};
use crate::services::auth::{AuthService, Claims};
use crate::state::AppState;

/// Build the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/validate-token", post(validate_token))
        .route("/api/users/logout/{id}", post(logout))
        .route("/api/users", get(list))
        .route("/api/users/{id}", get(get_one))
        .route("/api/users/{id}", put(update))
        .route("/api/users/{id}", delete(remove))
}

/// Response for token validation.
#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub valid: bool,
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
    pub exp: i64,
}

/// Response for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Reject callers acting on another user's account, unless they're an admin.
fn authorize(claims: &Claims, target: UserId) -> Result<(), AppError> {
    if claims.is_admin || claims.user_id() == target {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "cannot access another user's account".to_owned(),
        ))
    }
}

/// Register a new account.
///
/// # Errors
///
/// Returns 400 for an invalid email, a weak password, or an email that is
/// already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let user = auth.register(&body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password.
///
/// # Errors
///
/// Returns 401 for a wrong email or password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (user, token) = auth.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        message: "login successful".to_owned(),
        token,
        user,
    }))
}

/// Validate a bearer token and echo its claims.
///
/// # Errors
///
/// Returns 401 for a malformed, expired or wrongly-signed token.
pub async fn validate_token(
    State(state): State<AppState>,
    Json(body): Json<ValidateTokenRequest>,
) -> Result<Json<TokenInfo>, AppError> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let claims = auth.decode_token(&body.token)?;

    Ok(Json(TokenInfo {
        valid: true,
        user_id: claims.user_id(),
        email: claims.email,
        is_admin: claims.is_admin,
        exp: claims.exp,
    }))
}

/// Mark an account as logged out.
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 403 for another user's account.
pub async fn logout(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<LogoutResponse>, AppError> {
    authorize(&claims, id)?;

    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    auth.logout(id).await?;

    Ok(Json(LogoutResponse {
        message: "logout successful".to_owned(),
    }))
}

/// List all users.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Get a user by id.
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 403 for another user's account.
pub async fn get_one(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    authorize(&claims, id)?;

    let user = UserRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;

    Ok(Json(user))
}

/// Update a user. Present fields are re-validated: emails re-checked for
/// uniqueness, passwords re-hashed.
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 403 for another user's account or
/// a non-admin trying to grant admin.
pub async fn update(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    authorize(&claims, id)?;

    if body.is_admin.is_some() && !claims.is_admin {
        return Err(AppError::Forbidden(
            "only admins can change the admin flag".to_owned(),
        ));
    }

    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let user = auth.update_user(id, &body).await?;
    Ok(Json(user))
}

/// Delete a user.
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 400 while the user still owns a
/// cart, 403 for another user's account.
pub async fn remove(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    authorize(&claims, id)?;

    UserRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
