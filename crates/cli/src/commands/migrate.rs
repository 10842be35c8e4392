//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ropero-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ROPERO_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/api/migrations/`.

use super::{CommandError, connect};

/// Run the API database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
