//! Domain models and request/response types.
//!
//! Each entity has a plain record struct plus explicit command structs for
//! creation and partial update. Update commands carry `Option` fields that
//! are applied one by one; handlers never merge raw request bodies over
//! stored records.

pub mod brand;
pub mod cart;
pub mod color;
pub mod garment;
pub mod size;
pub mod stock;
pub mod user;

/// Serde default helper for boolean fields that default to `true`.
pub(crate) const fn default_true() -> bool {
    true
}
