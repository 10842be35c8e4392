//! Stock entry model and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ropero_core::{ColorId, GarmentId, SizeId, StockEntryId};

use super::default_true;

/// The sellable unit: a specific garment+size+color combination with a
/// quantity on hand and an availability flag.
///
/// At most one entry exists per (garment, size, color) triple.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockEntry {
    pub id: StockEntryId,
    pub garment_id: GarmentId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub quantity: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stock entry joined with the names of its referenced catalog records.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockEntryDetail {
    pub id: StockEntryId,
    pub garment_id: GarmentId,
    pub garment_name: String,
    pub size_id: SizeId,
    pub size_name: String,
    pub color_id: ColorId,
    pub color_name: String,
    pub quantity: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a stock entry.
#[derive(Debug, Deserialize)]
pub struct CreateStockEntry {
    pub garment_id: GarmentId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// Command to partially update a stock entry.
///
/// When any of the garment/size/color references change, the uniqueness of
/// the resulting triple is re-checked excluding this entry.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStockEntry {
    pub garment_id: Option<GarmentId>,
    pub size_id: Option<SizeId>,
    pub color_id: Option<ColorId>,
    pub quantity: Option<i32>,
    pub available: Option<bool>,
}

/// Request body for an availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub garment_id: GarmentId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub quantity: i32,
}

/// Outcome of an availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<i32>,
    pub message: String,
}

/// Request body for toggling the availability flag.
#[derive(Debug, Deserialize)]
pub struct SetAvailability {
    pub available: bool,
}
