//! Brand catalog handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::BrandId;

use crate::db::BrandRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::brand::{Brand, CreateBrand, UpdateBrand};
use crate::state::AppState;

/// Build the brand router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/marcas", get(list))
        .route("/api/marcas/{id}", get(get_one))
        .route("/api/marcas", post(create))
        .route("/api/marcas/{id}", put(update))
        .route("/api/marcas/{id}", delete(remove))
}

/// List all brands.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, AppError> {
    let brands = BrandRepository::new(state.pool()).list().await?;
    Ok(Json(brands))
}

/// Get a brand by id.
///
/// # Errors
///
/// Returns 404 if the brand doesn't exist.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<Json<Brand>, AppError> {
    let brand = BrandRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("brand not found".to_owned()))?;

    Ok(Json(brand))
}

/// Create a brand.
///
/// # Errors
///
/// Returns 400 if the name is already taken.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateBrand>,
) -> Result<(StatusCode, Json<Brand>), AppError> {
    let brand = BrandRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// Update a brand.
///
/// # Errors
///
/// Returns 404 if the brand doesn't exist, 400 on a name conflict.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
    Json(body): Json<UpdateBrand>,
) -> Result<Json<Brand>, AppError> {
    let brand = BrandRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(brand))
}

/// Delete a brand.
///
/// # Errors
///
/// Returns 404 if the brand doesn't exist, 400 if garments still reference it.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<StatusCode, AppError> {
    BrandRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
