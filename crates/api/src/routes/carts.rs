//! Cart and checkout handlers.
//!
//! Every cart route requires a bearer token. Users may only act on their own
//! cart; admins may act on any cart.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use ropero_core::{CartId, StockEntryId, UserId};

use crate::db::CartRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::cart::{CartItemRequest, CartWithItems, PurchaseSummary};
use crate::services::auth::Claims;
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/carritos/user/{usuario_id}", get(get_or_create))
        .route("/api/carritos/{id}", get(get_one))
        .route("/api/carritos/{id}", delete(remove))
        .route("/api/carritos/item", post(add_item))
        .route("/api/carritos/item", put(update_item))
        .route(
            "/api/carritos/{carrito_id}/item/{stock_id}",
            delete(remove_item),
        )
        .route("/api/carritos/{carrito_id}/checkout", post(checkout))
}

/// Reject callers acting on a cart they don't own, unless they're an admin.
fn authorize(claims: &Claims, owner: UserId) -> Result<(), AppError> {
    if claims.is_admin || claims.user_id() == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "cannot access another user's cart".to_owned(),
        ))
    }
}

async fn authorize_cart(
    repo: &CartRepository<'_>,
    claims: &Claims,
    cart_id: CartId,
) -> Result<(), AppError> {
    let owner = repo.owner(cart_id).await?;
    authorize(claims, owner)
}

/// Get the user's cart, creating it on first access.
///
/// # Errors
///
/// Returns 404 if the user doesn't exist, 403 for another user's cart.
pub async fn get_or_create(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(usuario_id): Path<UserId>,
) -> Result<Json<CartWithItems>, AppError> {
    authorize(&claims, usuario_id)?;

    let cart = CartRepository::new(state.pool())
        .get_or_create(usuario_id)
        .await?;
    Ok(Json(cart))
}

/// Get a cart with its items.
///
/// # Errors
///
/// Returns 404 if the cart doesn't exist, 403 for another user's cart.
pub async fn get_one(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<CartWithItems>, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, id).await?;

    let cart = repo.get_with_items(id).await?;
    Ok(Json(cart))
}

/// Delete a cart and its items.
///
/// # Errors
///
/// Returns 404 if the cart doesn't exist, 403 for another user's cart.
pub async fn remove(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<StatusCode, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, id).await?;

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a quantity of a stock entry to a cart. Quantities aggregate across
/// repeated adds of the same entry.
///
/// # Errors
///
/// Returns 400 for unavailable entries, non-positive quantities, or requests
/// that exceed the on-hand stock.
pub async fn add_item(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<CartWithItems>, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, body.cart_id).await?;

    let cart = repo.add_item(&body).await?;
    Ok(Json(cart))
}

/// Set the absolute quantity of a cart line. Zero removes the line.
///
/// # Errors
///
/// Returns 404 if the cart has no such line, 400 if the quantity exceeds the
/// on-hand stock.
pub async fn update_item(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<CartWithItems>, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, body.cart_id).await?;

    let cart = repo.update_item(&body).await?;
    Ok(Json(cart))
}

/// Remove a line from a cart.
///
/// # Errors
///
/// Returns 404 if the cart has no such line.
pub async fn remove_item(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path((carrito_id, stock_id)): Path<(CartId, StockEntryId)>,
) -> Result<Json<CartWithItems>, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, carrito_id).await?;

    let cart = repo.remove_item(carrito_id, stock_id).await?;
    Ok(Json(cart))
}

/// Check out a cart: decrement stock for every line, empty the cart, and
/// return a priced purchase summary.
///
/// # Errors
///
/// Returns 400 for an empty cart or when any line can't be fulfilled; in that
/// case nothing is decremented.
pub async fn checkout(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(carrito_id): Path<CartId>,
) -> Result<Json<PurchaseSummary>, AppError> {
    let repo = CartRepository::new(state.pool());
    authorize_cart(&repo, &claims, carrito_id).await?;

    let summary = repo.checkout(carrito_id).await?;
    Ok(Json(summary))
}
