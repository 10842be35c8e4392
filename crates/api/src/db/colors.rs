//! Color repository.

use sqlx::PgPool;

use ropero_core::ColorId;

use super::RepositoryError;
use crate::models::color::{Color, CreateColor, UpdateColor};

/// Repository for color database operations.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    /// Create a new color repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all colors.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Color>, RepositoryError> {
        let colors = sqlx::query_as::<_, Color>(
            r"
            SELECT id, name, hex_code, created_at, updated_at
            FROM colors
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(colors)
    }

    /// Get a color by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let color = sqlx::query_as::<_, Color>(
            r"
            SELECT id, name, hex_code, created_at, updated_at
            FROM colors
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(color)
    }

    /// Create a new color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn create(&self, input: &CreateColor) -> Result<Color, RepositoryError> {
        let color = sqlx::query_as::<_, Color>(
            r"
            INSERT INTO colors (name, hex_code)
            VALUES ($1, $2)
            RETURNING id, name, hex_code, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.hex_code)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("color name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(color)
    }

    /// Partially update a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the color doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn update(&self, id: ColorId, input: &UpdateColor) -> Result<Color, RepositoryError> {
        let color = sqlx::query_as::<_, Color>(
            r"
            UPDATE colors
            SET name = COALESCE($2, name),
                hex_code = COALESCE($3, hex_code),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, hex_code, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.hex_code.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("color name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(color)
    }

    /// Delete a color.
    ///
    /// Deletion is blocked while any stock entry references the color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the color doesn't exist.
    /// Returns `RepositoryError::Conflict` if stock entries reference it.
    pub async fn delete(&self, id: ColorId) -> Result<(), RepositoryError> {
        let (stock_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stock_entries WHERE color_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if stock_count > 0 {
            return Err(RepositoryError::Conflict(
                "color has associated stock entries; delete the stock first".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
