//! Size model and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ropero_core::SizeId;

/// A garment size (e.g. "S", "M", "42").
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Size {
    pub id: SizeId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a size.
#[derive(Debug, Deserialize)]
pub struct CreateSize {
    pub name: String,
}

/// Command to partially update a size.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSize {
    pub name: Option<String>,
}
