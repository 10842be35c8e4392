//! Garment catalog handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::GarmentId;

use crate::db::GarmentRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::garment::{CreateGarment, Garment, UpdateGarment};
use crate::state::AppState;

/// Build the garment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/prendas", get(list))
        .route("/api/prendas/{id}", get(get_one))
        .route("/api/prendas", post(create))
        .route("/api/prendas/{id}", put(update))
        .route("/api/prendas/{id}", delete(remove))
}

/// List all garments with their brand names.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Garment>>, AppError> {
    let garments = GarmentRepository::new(state.pool()).list().await?;
    Ok(Json(garments))
}

/// Get a garment by id.
///
/// # Errors
///
/// Returns 404 if the garment doesn't exist.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<GarmentId>,
) -> Result<Json<Garment>, AppError> {
    let garment = GarmentRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("garment not found".to_owned()))?;

    Ok(Json(garment))
}

/// Create a garment.
///
/// # Errors
///
/// Returns 404 if the referenced brand doesn't exist.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateGarment>,
) -> Result<(StatusCode, Json<Garment>), AppError> {
    let garment = GarmentRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(garment)))
}

/// Update a garment.
///
/// # Errors
///
/// Returns 404 if the garment or a newly assigned brand doesn't exist.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<GarmentId>,
    Json(body): Json<UpdateGarment>,
) -> Result<Json<Garment>, AppError> {
    let garment = GarmentRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(garment))
}

/// Delete a garment.
///
/// # Errors
///
/// Returns 404 if the garment doesn't exist, 400 if stock still references it.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<GarmentId>,
) -> Result<StatusCode, AppError> {
    GarmentRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
