//! Color model and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ropero_core::ColorId;

/// A garment color with a display hex code.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub hex_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a color.
#[derive(Debug, Deserialize)]
pub struct CreateColor {
    pub name: String,
    pub hex_code: String,
}

/// Command to partially update a color.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateColor {
    pub name: Option<String>,
    pub hex_code: Option<String>,
}
