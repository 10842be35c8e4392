//! Size repository.

use sqlx::PgPool;

use ropero_core::SizeId;

use super::RepositoryError;
use crate::models::size::{CreateSize, Size, UpdateSize};

/// Repository for size database operations.
pub struct SizeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SizeRepository<'a> {
    /// Create a new size repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all sizes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Size>, RepositoryError> {
        let sizes = sqlx::query_as::<_, Size>(
            r"
            SELECT id, name, created_at, updated_at
            FROM sizes
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sizes)
    }

    /// Get a size by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let size = sqlx::query_as::<_, Size>(
            r"
            SELECT id, name, created_at, updated_at
            FROM sizes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(size)
    }

    /// Create a new size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn create(&self, input: &CreateSize) -> Result<Size, RepositoryError> {
        let size = sqlx::query_as::<_, Size>(
            r"
            INSERT INTO sizes (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("size name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(size)
    }

    /// Partially update a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn update(&self, id: SizeId, input: &UpdateSize) -> Result<Size, RepositoryError> {
        let size = sqlx::query_as::<_, Size>(
            r"
            UPDATE sizes
            SET name = COALESCE($2, name),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("size name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(size)
    }

    /// Delete a size.
    ///
    /// Deletion is blocked while any stock entry references the size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the size doesn't exist.
    /// Returns `RepositoryError::Conflict` if stock entries reference it.
    pub async fn delete(&self, id: SizeId) -> Result<(), RepositoryError> {
        let (stock_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stock_entries WHERE size_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if stock_count > 0 {
            return Err(RepositoryError::Conflict(
                "size has associated stock entries; delete the stock first".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM sizes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
