//! Brand model and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ropero_core::BrandId;

use super::default_true;

/// A label/manufacturer grouping garments.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to create a brand.
#[derive(Debug, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Command to partially update a brand. Unset fields keep their prior value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub active: Option<bool>,
}
