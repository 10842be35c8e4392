//! Cart repository and the checkout transaction.
//!
//! Every mutation that touches stock runs inside a transaction and locks the
//! affected `stock_entries` rows with `FOR UPDATE`, so two concurrent
//! checkouts of the same stock cannot both succeed past the on-hand count.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use ropero_core::{CartId, StockEntryId, UserId};

use super::RepositoryError;
use crate::models::cart::{
    Cart, CartItemRequest, CartLine, CartWithItems, CheckoutLine, PurchaseSummary,
};

/// Errors from the cart workflow.
#[derive(Debug, Error)]
pub enum CartError {
    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The referenced user doesn't exist.
    #[error("user not found")]
    UserNotFound,

    /// The referenced cart doesn't exist.
    #[error("cart not found")]
    CartNotFound,

    /// The referenced stock entry doesn't exist.
    #[error("stock entry not found")]
    StockEntryNotFound,

    /// The cart has no line for the given stock entry.
    #[error("item not found in cart")]
    LineNotFound,

    /// The stock entry is flagged unavailable.
    #[error("stock entry is not available")]
    NotAvailable,

    /// The requested quantity exceeds what is on hand.
    #[error("insufficient stock: requested {requested}, on hand {on_hand}")]
    InsufficientStock { requested: i32, on_hand: i32 },

    /// Checkout was attempted on a cart with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The quantity is not a positive number.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

impl From<sqlx::Error> for CartError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

#[derive(sqlx::FromRow)]
struct LockedStock {
    quantity: i32,
    available: bool,
}

#[derive(sqlx::FromRow)]
struct CheckoutRow {
    stock_entry_id: StockEntryId,
    garment_name: String,
    size_name: String,
    color_name: String,
    quantity: i32,
    on_hand: i32,
    available: bool,
    unit_price: rust_decimal::Decimal,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it if none exists.
    ///
    /// At most one cart per user; repeated calls return the same cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UserNotFound` if the user doesn't exist.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<CartWithItems, CartError> {
        let (user_exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        if !user_exists {
            return Err(CartError::UserNotFound);
        }

        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(CartError::CartNotFound)?;

        let items = self.items(cart.id).await?;
        Ok(CartWithItems { cart, items })
    }

    /// Get a cart with its lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the cart doesn't exist.
    pub async fn get_with_items(&self, cart_id: CartId) -> Result<CartWithItems, CartError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at, updated_at FROM carts WHERE id = $1",
        )
        .bind(cart_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(CartError::CartNotFound)?;

        let items = self.items(cart_id).await?;
        Ok(CartWithItems { cart, items })
    }

    /// Find the owner of a cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the cart doesn't exist.
    pub async fn owner(&self, cart_id: CartId) -> Result<UserId, CartError> {
        let (user_id,): (UserId,) = sqlx::query_as("SELECT user_id FROM carts WHERE id = $1")
            .bind(cart_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(CartError::CartNotFound)?;

        Ok(user_id)
    }

    /// Add a quantity of a stock entry to the cart.
    ///
    /// Quantities aggregate: adding 2 then 3 of the same entry yields a line
    /// of 5. The aggregated quantity is validated against the on-hand count.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1,
    /// `CartError::NotAvailable` for unavailable entries, and
    /// `CartError::InsufficientStock` when the aggregate exceeds stock.
    pub async fn add_item(&self, request: &CartItemRequest) -> Result<CartWithItems, CartError> {
        if request.quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await?;

        Self::assert_cart_exists(&mut tx, request.cart_id).await?;
        let stock = Self::lock_stock(&mut tx, request.stock_id).await?;
        if !stock.available {
            return Err(CartError::NotAvailable);
        }

        let existing: Option<(i32,)> = sqlx::query_as(
            "SELECT quantity FROM cart_items WHERE cart_id = $1 AND stock_entry_id = $2",
        )
        .bind(request.cart_id)
        .bind(request.stock_id)
        .fetch_optional(&mut *tx)
        .await?;

        let new_total = aggregated_quantity(existing.map_or(0, |(q,)| q), request.quantity)?;
        if new_total > stock.quantity {
            return Err(CartError::InsufficientStock {
                requested: new_total,
                on_hand: stock.quantity,
            });
        }

        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, stock_entry_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, stock_entry_id)
            DO UPDATE SET quantity = $3, updated_at = now()
            ",
        )
        .bind(request.cart_id)
        .bind(request.stock_id)
        .bind(new_total)
        .execute(&mut *tx)
        .await?;

        Self::touch_cart(&mut tx, request.cart_id).await?;
        tx.commit().await?;

        self.get_with_items(request.cart_id).await
    }

    /// Set the absolute quantity of an existing cart line.
    ///
    /// A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the cart has no such line, and
    /// `CartError::InsufficientStock` when the quantity exceeds stock.
    pub async fn update_item(&self, request: &CartItemRequest) -> Result<CartWithItems, CartError> {
        if request.quantity < 0 {
            return Err(CartError::InvalidQuantity);
        }

        if request.quantity == 0 {
            return self.remove_item(request.cart_id, request.stock_id).await;
        }

        let mut tx = self.pool.begin().await?;

        Self::assert_cart_exists(&mut tx, request.cart_id).await?;
        let stock = Self::lock_stock(&mut tx, request.stock_id).await?;
        if request.quantity > stock.quantity {
            return Err(CartError::InsufficientStock {
                requested: request.quantity,
                on_hand: stock.quantity,
            });
        }

        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3, updated_at = now()
            WHERE cart_id = $1 AND stock_entry_id = $2
            ",
        )
        .bind(request.cart_id)
        .bind(request.stock_id)
        .bind(request.quantity)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::LineNotFound);
        }

        Self::touch_cart(&mut tx, request.cart_id).await?;
        tx.commit().await?;

        self.get_with_items(request.cart_id).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the cart has no such line.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        stock_entry_id: StockEntryId,
    ) -> Result<CartWithItems, CartError> {
        let mut tx = self.pool.begin().await?;

        Self::assert_cart_exists(&mut tx, cart_id).await?;

        let result =
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND stock_entry_id = $2")
                .bind(cart_id)
                .bind(stock_entry_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::LineNotFound);
        }

        Self::touch_cart(&mut tx, cart_id).await?;
        tx.commit().await?;

        self.get_with_items(cart_id).await
    }

    /// Check out the cart: validate every line against locked stock, decrement
    /// the on-hand quantities, empty the cart, and price a purchase summary.
    ///
    /// All-or-nothing: a single failing line rolls back the whole checkout and
    /// no stock changes. Lines are processed in ascending stock entry id order
    /// so concurrent checkouts acquire locks in the same order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyCart` for a cart with no lines,
    /// `CartError::NotAvailable` if a line's entry was flagged unavailable,
    /// and `CartError::InsufficientStock` if a line exceeds the on-hand count.
    pub async fn checkout(&self, cart_id: CartId) -> Result<PurchaseSummary, CartError> {
        let mut tx = self.pool.begin().await?;

        Self::assert_cart_exists(&mut tx, cart_id).await?;

        let rows = sqlx::query_as::<_, CheckoutRow>(
            r"
            SELECT ci.stock_entry_id, g.name AS garment_name, t.name AS size_name,
                   c.name AS color_name, ci.quantity, s.quantity AS on_hand,
                   s.available, g.price AS unit_price
            FROM cart_items ci
            JOIN stock_entries s ON s.id = ci.stock_entry_id
            JOIN garments g ON g.id = s.garment_id
            JOIN sizes t ON t.id = s.size_id
            JOIN colors c ON c.id = s.color_id
            WHERE ci.cart_id = $1
            ORDER BY ci.stock_entry_id ASC
            FOR UPDATE OF s
            ",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            if !row.available {
                return Err(CartError::NotAvailable);
            }
            if row.quantity > row.on_hand {
                return Err(CartError::InsufficientStock {
                    requested: row.quantity,
                    on_hand: row.on_hand,
                });
            }

            sqlx::query(
                r"
                UPDATE stock_entries
                SET quantity = quantity - $2, updated_at = now()
                WHERE id = $1
                ",
            )
            .bind(row.stock_entry_id)
            .bind(row.quantity)
            .execute(&mut *tx)
            .await?;

            lines.push(CheckoutLine {
                stock_entry_id: row.stock_entry_id,
                garment_name: row.garment_name,
                size_name: row.size_name,
                color_name: row.color_name,
                quantity: row.quantity,
                unit_price: row.unit_price,
            });
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        Self::touch_cart(&mut tx, cart_id).await?;
        tx.commit().await?;

        Ok(PurchaseSummary::new(cart_id, lines, Utc::now()))
    }

    /// Delete a cart and its lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the cart doesn't exist.
    pub async fn delete(&self, cart_id: CartId) -> Result<(), CartError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::CartNotFound);
        }

        Ok(())
    }

    async fn items(&self, cart_id: CartId) -> Result<Vec<CartLine>, CartError> {
        let items = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.stock_entry_id, g.name AS garment_name, t.name AS size_name,
                   c.name AS color_name, ci.quantity, g.price AS unit_price
            FROM cart_items ci
            JOIN stock_entries s ON s.id = ci.stock_entry_id
            JOIN garments g ON g.id = s.garment_id
            JOIN sizes t ON t.id = s.size_id
            JOIN colors c ON c.id = s.color_id
            WHERE ci.cart_id = $1
            ORDER BY ci.stock_entry_id ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    async fn assert_cart_exists(
        tx: &mut Transaction<'_, Postgres>,
        cart_id: CartId,
    ) -> Result<(), CartError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM carts WHERE id = $1)")
                .bind(cart_id)
                .fetch_one(&mut **tx)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(CartError::CartNotFound)
        }
    }

    async fn lock_stock(
        tx: &mut Transaction<'_, Postgres>,
        stock_entry_id: StockEntryId,
    ) -> Result<LockedStock, CartError> {
        sqlx::query_as::<_, LockedStock>(
            "SELECT quantity, available FROM stock_entries WHERE id = $1 FOR UPDATE",
        )
        .bind(stock_entry_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(CartError::StockEntryNotFound)
    }

    async fn touch_cart(
        tx: &mut Transaction<'_, Postgres>,
        cart_id: CartId,
    ) -> Result<(), CartError> {
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

/// Combine an existing line quantity with a newly requested one.
///
/// Rejects totals that don't fit an `i32` rather than wrapping.
fn aggregated_quantity(existing: i32, requested: i32) -> Result<i32, CartError> {
    existing
        .checked_add(requested)
        .ok_or(CartError::InvalidQuantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_aggregate() {
        assert_eq!(aggregated_quantity(0, 2).unwrap(), 2);
        assert_eq!(aggregated_quantity(2, 3).unwrap(), 5);
    }

    #[test]
    fn test_aggregate_overflow_rejected() {
        assert!(matches!(
            aggregated_quantity(1, i32::MAX),
            Err(CartError::InvalidQuantity)
        ));
    }
}
