//! Garment repository.
//!
//! Garments always load with their brand joined so API responses can show
//! the brand name without a second round trip.

use sqlx::PgPool;

use ropero_core::{BrandId, GarmentId};

use super::RepositoryError;
use crate::models::garment::{CreateGarment, Garment, UpdateGarment};

const SELECT_GARMENT: &str = r"
    SELECT g.id, g.name, g.description, g.brand_id, b.name AS brand_name,
           g.price, g.images, g.created_at, g.updated_at
    FROM garments g
    JOIN brands b ON b.id = g.brand_id
";

/// Repository for garment database operations.
pub struct GarmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GarmentRepository<'a> {
    /// Create a new garment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all garments with their brand names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Garment>, RepositoryError> {
        let garments =
            sqlx::query_as::<_, Garment>(&format!("{SELECT_GARMENT} ORDER BY g.id ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(garments)
    }

    /// Get a garment by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: GarmentId) -> Result<Option<Garment>, RepositoryError> {
        let garment = sqlx::query_as::<_, Garment>(&format!("{SELECT_GARMENT} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(garment)
    }

    /// Create a new garment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the brand doesn't exist.
    pub async fn create(&self, input: &CreateGarment) -> Result<Garment, RepositoryError> {
        if !self.brand_exists(input.brand_id).await? {
            return Err(RepositoryError::NotFound);
        }

        let (id,): (GarmentId,) = sqlx::query_as(
            r"
            INSERT INTO garments (name, description, brand_id, price, images)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.brand_id)
        .bind(input.price)
        .bind(input.images.as_deref())
        .fetch_one(self.pool)
        .await?;

        self.get(id).await?.ok_or(RepositoryError::DataCorruption(
            "garment disappeared after insert".to_owned(),
        ))
    }

    /// Partially update a garment. Unset fields keep their prior value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the garment (or a newly
    /// assigned brand) doesn't exist.
    pub async fn update(
        &self,
        id: GarmentId,
        input: &UpdateGarment,
    ) -> Result<Garment, RepositoryError> {
        if let Some(brand_id) = input.brand_id
            && !self.brand_exists(brand_id).await?
        {
            return Err(RepositoryError::NotFound);
        }

        let result = sqlx::query(
            r"
            UPDATE garments
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                brand_id = COALESCE($4, brand_id),
                price = COALESCE($5, price),
                images = COALESCE($6, images),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.description.as_deref())
        .bind(input.brand_id)
        .bind(input.price)
        .bind(input.images.as_deref())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::DataCorruption(
            "garment disappeared after update".to_owned(),
        ))
    }

    /// Delete a garment.
    ///
    /// Deletion is blocked while any stock entry references the garment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the garment doesn't exist.
    /// Returns `RepositoryError::Conflict` if stock entries reference it.
    pub async fn delete(&self, id: GarmentId) -> Result<(), RepositoryError> {
        let (stock_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stock_entries WHERE garment_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if stock_count > 0 {
            return Err(RepositoryError::Conflict(
                "garment has associated stock entries; delete the stock first".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM garments WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn brand_exists(&self, brand_id: BrandId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM brands WHERE id = $1)")
                .bind(brand_id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }
}
