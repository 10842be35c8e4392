//! Color catalog handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::ColorId;

use crate::db::ColorRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::color::{Color, CreateColor, UpdateColor};
use crate::state::AppState;

/// Build the color router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/colores", get(list))
        .route("/api/colores/{id}", get(get_one))
        .route("/api/colores", post(create))
        .route("/api/colores/{id}", put(update))
        .route("/api/colores/{id}", delete(remove))
}

/// List all colors.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Color>>, AppError> {
    let colors = ColorRepository::new(state.pool()).list().await?;
    Ok(Json(colors))
}

/// Get a color by id.
///
/// # Errors
///
/// Returns 404 if the color doesn't exist.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<ColorId>,
) -> Result<Json<Color>, AppError> {
    let color = ColorRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("color not found".to_owned()))?;

    Ok(Json(color))
}

/// Create a color.
///
/// # Errors
///
/// Returns 400 if the name is already taken.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateColor>,
) -> Result<(StatusCode, Json<Color>), AppError> {
    let color = ColorRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(color)))
}

/// Update a color.
///
/// # Errors
///
/// Returns 404 if the color doesn't exist, 400 on a name conflict.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ColorId>,
    Json(body): Json<UpdateColor>,
) -> Result<Json<Color>, AppError> {
    let color = ColorRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(color))
}

/// Delete a color.
///
/// # Errors
///
/// Returns 404 if the color doesn't exist, 400 if stock still references it.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ColorId>,
) -> Result<StatusCode, AppError> {
    ColorRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
