//! Database operations for the store's `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Accounts and credentials
//! - `brands`, `sizes`, `colors`, `garments` - Catalog records
//! - `stock_entries` - One row per (garment, size, color) combination
//! - `carts`, `cart_items` - One cart per user, lines keyed by stock entry
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p ropero-cli -- migrate
//! ```

pub mod brands;
pub mod carts;
pub mod colors;
pub mod garments;
pub mod sizes;
pub mod stock;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use brands::BrandRepository;
pub use carts::{CartError, CartRepository};
pub use colors::ColorRepository;
pub use garments::GarmentRepository;
pub use sizes::SizeRepository;
pub use stock::StockRepository;
pub use users::{UserChanges, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, referenced record).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
