//! Stock entry handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::{GarmentId, StockEntryId};

use crate::db::StockRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::stock::{
    AvailabilityQuery, AvailabilityResponse, CreateStockEntry, SetAvailability, StockEntry,
    StockEntryDetail, UpdateStockEntry,
};
use crate::state::AppState;

/// Build the stock router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stocks", get(list))
        .route("/api/stocks/product/{id}", get(list_by_garment))
        .route("/api/stocks/check-availability", post(check_availability))
        .route("/api/stocks", post(create))
        .route("/api/stocks/{id}", put(update))
        .route("/api/stocks/{id}/availability", put(set_availability))
        .route("/api/stocks/{id}", delete(remove))
}

/// List all stock entries.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<StockEntryDetail>>, AppError> {
    let entries = StockRepository::new(state.pool()).list().await?;
    Ok(Json(entries))
}

/// List the stock entries of one garment.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list_by_garment(
    State(state): State<AppState>,
    Path(id): Path<GarmentId>,
) -> Result<Json<Vec<StockEntryDetail>>, AppError> {
    let entries = StockRepository::new(state.pool()).list_by_garment(id).await?;
    Ok(Json(entries))
}

/// Check whether a quantity of a combination can be fulfilled.
///
/// Responds 404 when no available entry exists for the combination, 200
/// otherwise; the body says whether the requested quantity fits.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn check_availability(
    State(state): State<AppState>,
    Json(body): Json<AvailabilityQuery>,
) -> Result<(StatusCode, Json<AvailabilityResponse>), AppError> {
    let entry = StockRepository::new(state.pool())
        .find_available(body.garment_id, body.size_id, body.color_id)
        .await?;

    let Some(entry) = entry else {
        let response = AvailabilityResponse {
            available: false,
            current_stock: None,
            message: "no stock registered for this combination".to_owned(),
        };
        return Ok((StatusCode::NOT_FOUND, Json(response)));
    };

    let available = body.quantity <= entry.quantity;
    let message = if available {
        "stock available".to_owned()
    } else {
        format!("only {} unit(s) in stock", entry.quantity)
    };

    let response = AvailabilityResponse {
        available,
        current_stock: Some(entry.quantity),
        message,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Create a stock entry.
///
/// # Errors
///
/// Returns 404 if a referenced catalog record doesn't exist, 400 if the
/// combination already has an entry.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateStockEntry>,
) -> Result<(StatusCode, Json<StockEntry>), AppError> {
    let entry = StockRepository::new(state.pool()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Update a stock entry.
///
/// # Errors
///
/// Returns 404 if the entry doesn't exist, 400 if the change would duplicate
/// another combination.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StockEntryId>,
    Json(body): Json<UpdateStockEntry>,
) -> Result<Json<StockEntry>, AppError> {
    let entry = StockRepository::new(state.pool()).update(id, &body).await?;
    Ok(Json(entry))
}

/// Toggle the availability flag.
///
/// # Errors
///
/// Returns 404 if the entry doesn't exist.
pub async fn set_availability(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StockEntryId>,
    Json(body): Json<SetAvailability>,
) -> Result<Json<StockEntry>, AppError> {
    let entry = StockRepository::new(state.pool())
        .set_availability(id, body.available)
        .await?;
    Ok(Json(entry))
}

/// Delete a stock entry. Cart lines referencing it go with it.
///
/// # Errors
///
/// Returns 404 if the entry doesn't exist.
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StockEntryId>,
) -> Result<StatusCode, AppError> {
    StockRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
