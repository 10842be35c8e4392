//! Garment model and commands.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ropero_core::{BrandId, GarmentId};

/// A sellable clothing item, independent of size and color.
///
/// Queries join the brand so responses carry the brand name alongside the id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Garment {
    pub id: GarmentId,
    pub name: String,
    pub description: Option<String>,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub price: Decimal,
    pub images: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a garment.
#[derive(Debug, Deserialize)]
pub struct CreateGarment {
    pub name: String,
    pub description: Option<String>,
    pub brand_id: BrandId,
    pub price: Decimal,
    pub images: Option<String>,
}

/// Command to partially update a garment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGarment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand_id: Option<BrandId>,
    pub price: Option<Decimal>,
    pub images: Option<String>,
}
