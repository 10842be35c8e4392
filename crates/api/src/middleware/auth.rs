//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a valid bearer token in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::services::auth::{Claims, decode_token};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(claims): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireAuth(pub Claims);

/// Extractor that requires a valid bearer token belonging to an admin.
pub struct RequireAdmin(pub Claims);

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let header_value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_owned()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("expected a bearer token".to_owned()))?;

    decode_token(token, &state.config().jwt_secret)
        .map_err(|_| AppError::Unauthorized("invalid or expired token".to_owned()))
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;
        Ok(Self(claims))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;
        if !claims.is_admin {
            return Err(AppError::Forbidden("admin access required".to_owned()));
        }
        Ok(Self(claims))
    }
}
