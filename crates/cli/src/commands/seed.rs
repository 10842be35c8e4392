//! Seed the catalog with baseline sizes and colors.
//!
//! Idempotent: existing rows are left alone, so the command can run on every
//! deploy.

use super::{CommandError, connect};

const SIZES: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

const COLORS: &[(&str, &str)] = &[
    ("negro", "#000000"),
    ("blanco", "#FFFFFF"),
    ("rojo", "#FF0000"),
    ("azul", "#0000FF"),
    ("verde", "#008000"),
];

/// Insert the baseline catalog rows.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Seeding sizes...");
    for name in SIZES {
        sqlx::query("INSERT INTO sizes (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&pool)
            .await?;
    }

    tracing::info!("Seeding colors...");
    for (name, hex_code) in COLORS {
        sqlx::query(
            r"
            INSERT INTO colors (name, hex_code)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(hex_code)
        .execute(&pool)
        .await?;
    }

    tracing::info!(
        "Seed complete: {} sizes, {} colors",
        SIZES.len(),
        COLORS.len()
    );
    Ok(())
}
