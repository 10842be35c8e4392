//! Stock entry repository.
//!
//! A stock entry is the sellable unit: one row per (garment, size, color)
//! combination, guarded by a unique constraint on the triple.

use sqlx::PgPool;

use ropero_core::{ColorId, GarmentId, SizeId, StockEntryId};

use super::RepositoryError;
use crate::models::stock::{CreateStockEntry, StockEntry, StockEntryDetail, UpdateStockEntry};

const SELECT_ENTRY: &str = r"
    SELECT id, garment_id, size_id, color_id, quantity, available,
           created_at, updated_at
    FROM stock_entries
";

const SELECT_DETAIL: &str = r"
    SELECT s.id, s.garment_id, g.name AS garment_name,
           s.size_id, t.name AS size_name,
           s.color_id, c.name AS color_name,
           s.quantity, s.available, s.created_at, s.updated_at
    FROM stock_entries s
    JOIN garments g ON g.id = s.garment_id
    JOIN sizes t ON t.id = s.size_id
    JOIN colors c ON c.id = s.color_id
";

/// Repository for stock entry database operations.
pub struct StockRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockRepository<'a> {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all stock entries with catalog names joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<StockEntryDetail>, RepositoryError> {
        let entries =
            sqlx::query_as::<_, StockEntryDetail>(&format!("{SELECT_DETAIL} ORDER BY s.id ASC"))
                .fetch_all(self.pool)
                .await?;

        Ok(entries)
    }

    /// List the stock entries of one garment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_garment(
        &self,
        garment_id: GarmentId,
    ) -> Result<Vec<StockEntryDetail>, RepositoryError> {
        let entries = sqlx::query_as::<_, StockEntryDetail>(&format!(
            "{SELECT_DETAIL} WHERE s.garment_id = $1 ORDER BY s.id ASC"
        ))
        .bind(garment_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Get a stock entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StockEntryId) -> Result<Option<StockEntry>, RepositoryError> {
        let entry = sqlx::query_as::<_, StockEntry>(&format!("{SELECT_ENTRY} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(entry)
    }

    /// Find the entry for a combination that is flagged available.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_available(
        &self,
        garment_id: GarmentId,
        size_id: SizeId,
        color_id: ColorId,
    ) -> Result<Option<StockEntry>, RepositoryError> {
        let entry = sqlx::query_as::<_, StockEntry>(&format!(
            r"{SELECT_ENTRY}
            WHERE garment_id = $1 AND size_id = $2 AND color_id = $3
              AND available = TRUE"
        ))
        .bind(garment_id)
        .bind(size_id)
        .bind(color_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    /// Create a stock entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if any referenced garment, size or
    /// color doesn't exist.
    /// Returns `RepositoryError::Conflict` if an entry already exists for the
    /// same (garment, size, color) triple.
    pub async fn create(&self, input: &CreateStockEntry) -> Result<StockEntry, RepositoryError> {
        if input.quantity < 0 {
            return Err(RepositoryError::Conflict(
                "quantity must not be negative".to_owned(),
            ));
        }

        self.check_references(input.garment_id, input.size_id, input.color_id)
            .await?;

        let entry = sqlx::query_as::<_, StockEntry>(
            r"
            INSERT INTO stock_entries (garment_id, size_id, color_id, quantity, available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, garment_id, size_id, color_id, quantity, available,
                      created_at, updated_at
            ",
        )
        .bind(input.garment_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(input.quantity)
        .bind(input.available)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "a stock entry already exists for this garment, size and color".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(entry)
    }

    /// Partially update a stock entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry or a newly assigned
    /// reference doesn't exist.
    /// Returns `RepositoryError::Conflict` if the change would duplicate
    /// another entry's (garment, size, color) triple.
    pub async fn update(
        &self,
        id: StockEntryId,
        input: &UpdateStockEntry,
    ) -> Result<StockEntry, RepositoryError> {
        if let Some(quantity) = input.quantity
            && quantity < 0
        {
            return Err(RepositoryError::Conflict(
                "quantity must not be negative".to_owned(),
            ));
        }

        if input.garment_id.is_some() || input.size_id.is_some() || input.color_id.is_some() {
            let current = self.get(id).await?.ok_or(RepositoryError::NotFound)?;
            let garment_id = input.garment_id.unwrap_or(current.garment_id);
            let size_id = input.size_id.unwrap_or(current.size_id);
            let color_id = input.color_id.unwrap_or(current.color_id);

            self.check_references(garment_id, size_id, color_id).await?;

            let (duplicate,): (bool,) = sqlx::query_as(
                r"
                SELECT EXISTS(
                    SELECT 1 FROM stock_entries
                    WHERE garment_id = $1 AND size_id = $2 AND color_id = $3
                      AND id <> $4
                )
                ",
            )
            .bind(garment_id)
            .bind(size_id)
            .bind(color_id)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

            if duplicate {
                return Err(RepositoryError::Conflict(
                    "a stock entry already exists for this garment, size and color".to_owned(),
                ));
            }
        }

        let entry = sqlx::query_as::<_, StockEntry>(
            r"
            UPDATE stock_entries
            SET garment_id = COALESCE($2, garment_id),
                size_id = COALESCE($3, size_id),
                color_id = COALESCE($4, color_id),
                quantity = COALESCE($5, quantity),
                available = COALESCE($6, available),
                updated_at = now()
            WHERE id = $1
            RETURNING id, garment_id, size_id, color_id, quantity, available,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.garment_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(input.quantity)
        .bind(input.available)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(entry)
    }

    /// Set the availability flag without touching the quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn set_availability(
        &self,
        id: StockEntryId,
        available: bool,
    ) -> Result<StockEntry, RepositoryError> {
        let entry = sqlx::query_as::<_, StockEntry>(
            r"
            UPDATE stock_entries
            SET available = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, garment_id, size_id, color_id, quantity, available,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(available)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(entry)
    }

    /// Delete a stock entry.
    ///
    /// Cart lines referencing the entry are removed by the `ON DELETE
    /// CASCADE` on `cart_items.stock_entry_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn delete(&self, id: StockEntryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stock_entries WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn check_references(
        &self,
        garment_id: GarmentId,
        size_id: SizeId,
        color_id: ColorId,
    ) -> Result<(), RepositoryError> {
        let (garment, size, color): (bool, bool, bool) = sqlx::query_as(
            r"
            SELECT EXISTS(SELECT 1 FROM garments WHERE id = $1),
                   EXISTS(SELECT 1 FROM sizes WHERE id = $2),
                   EXISTS(SELECT 1 FROM colors WHERE id = $3)
            ",
        )
        .bind(garment_id)
        .bind(size_id)
        .bind(color_id)
        .fetch_one(self.pool)
        .await?;

        if garment && size && color {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}
