//! Size catalog handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::SizeId;

use crate::db::SizeRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::size::{CreateSize, Size, UpdateSize};
use crate::state::AppState;

/// Build the size router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/talles", get(list))
        .route("/api/talles/{id}", get(get_one))
        .route("/api/talles", post(create))
        .route("/api/talles/{id}", put(update))
        .route("/api/talles/{id}", delete(remove))
}

/// List all sizes.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Size>>, AppError> {
    let sizes = SizeRepository::new(state.pool()).list().await?;
    Ok(Json(sizes))
}

/// Get a size by id.
///
/// # Errors
///
/// Returns 404 if the size doesn't exist.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<SizeId>,
) -> Result<Json<Size>, AppError> {
    let size = SizeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("size not found".to_owned()))?;

    Ok(Json(size))
}

/// Create a size.
///
/// # Errors
///
/// Returns 400 if the name is already taken.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateSize>,
) -> Result<(StatusCode, Json<Size>), AppError> {
    let size = SizeRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(size)))
}

/// Update a size.
///
/// # Errors
///
/// Returns 404 if the size doesn't exist, 400 on a name conflict.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SizeId>,
    Json(body): Json<UpdateSize>,
) -> Result<Json<Size>, AppError> {
    let size = SizeRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(size))
}

/// Delete a size.
///
/// # Errors
///
/// Returns 404 if the size doesn't exist, 400 if stock still references it.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SizeId>,
) -> Result<StatusCode, AppError> {
    SizeRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
