//! Brand repository.

use sqlx::PgPool;

use ropero_core::BrandId;

use super::RepositoryError;
use crate::models::brand::{Brand, CreateBrand, UpdateBrand};

/// Repository for brand database operations.
pub struct BrandRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepository<'a> {
    /// Create a new brand repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all brands.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Brand>, RepositoryError> {
        let brands = sqlx::query_as::<_, Brand>(
            r"
            SELECT id, name, active, created_at, updated_at
            FROM brands
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(brands)
    }

    /// Get a brand by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BrandId) -> Result<Option<Brand>, RepositoryError> {
        let brand = sqlx::query_as::<_, Brand>(
            r"
            SELECT id, name, active, created_at, updated_at
            FROM brands
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(brand)
    }

    /// Create a new brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateBrand) -> Result<Brand, RepositoryError> {
        let brand = sqlx::query_as::<_, Brand>(
            r"
            INSERT INTO brands (name, active)
            VALUES ($1, $2)
            RETURNING id, name, active, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("brand name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(brand)
    }

    /// Partially update a brand. Unset fields keep their prior value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the brand doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn update(&self, id: BrandId, input: &UpdateBrand) -> Result<Brand, RepositoryError> {
        let brand = sqlx::query_as::<_, Brand>(
            r"
            UPDATE brands
            SET name = COALESCE($2, name),
                active = COALESCE($3, active),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("brand name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(brand)
    }

    /// Delete a brand.
    ///
    /// Deletion is blocked while any garment references the brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the brand doesn't exist.
    /// Returns `RepositoryError::Conflict` if garments reference it.
    pub async fn delete(&self, id: BrandId) -> Result<(), RepositoryError> {
        let (garment_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM garments WHERE brand_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if garment_count > 0 {
            return Err(RepositoryError::Conflict(
                "brand has associated garments; delete the garments first".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
