//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::{CartError, RepositoryError};
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart workflow error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => repository_status(e),
            Self::Cart(e) => cart_status(e),
            Self::Auth(e) => auth_status(e),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

const fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
    }
}

const fn cart_status(e: &CartError) -> StatusCode {
    match e {
        CartError::Repository(inner) => repository_status(inner),
        CartError::UserNotFound
        | CartError::CartNotFound
        | CartError::StockEntryNotFound
        | CartError::LineNotFound => StatusCode::NOT_FOUND,
        CartError::NotAvailable
        | CartError::InsufficientStock { .. }
        | CartError::EmptyCart
        | CartError::InvalidQuantity => StatusCode::BAD_REQUEST,
    }
}

const fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::InvalidEmail(_)
        | AuthError::MissingName
        | AuthError::UserAlreadyExists
        | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
        AuthError::Repository(inner) => repository_status(inner),
        AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            message,
            error: None,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("brand 123".to_string());
        assert_eq!(err.to_string(), "Not found: brand 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_maps_to_bad_request() {
        // Duplicate names, emails and stock combinations are client errors.
        let err = AppError::Database(RepositoryError::Conflict("dup".to_string()));
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cart_error_status_codes() {
        assert_eq!(get_status(AppError::Cart(CartError::EmptyCart)), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::Cart(CartError::InsufficientStock {
                requested: 6,
                on_hand: 5
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::CartNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_redact_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
