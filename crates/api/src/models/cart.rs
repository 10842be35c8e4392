//! Cart models and the purchase summary produced by checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ropero_core::{CartId, StockEntryId, UserId};

/// A user's in-progress collection of desired stock entries.
///
/// Carts survive checkout: a checked-out cart is emptied, not deleted, and
/// may be repopulated.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the stock entry it references.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub stock_entry_id: StockEntryId,
    pub garment_name: String,
    pub size_name: String,
    pub color_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A cart together with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartLine>,
}

/// Request body for adding or updating a cart line.
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub cart_id: CartId,
    pub stock_id: StockEntryId,
    pub quantity: i32,
}

/// One committed line of a checkout, before pricing.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub stock_entry_id: StockEntryId,
    pub garment_name: String,
    pub size_name: String,
    pub color_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A priced line of a purchase summary.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseLine {
    pub stock_entry_id: StockEntryId,
    pub garment_name: String,
    pub size_name: String,
    pub color_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// The result of a successful checkout.
///
/// Nothing is persisted for a purchase; this summary is the only receipt.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseSummary {
    pub cart_id: CartId,
    pub lines: Vec<PurchaseLine>,
    pub total: Decimal,
    pub checked_out_at: DateTime<Utc>,
}

impl PurchaseSummary {
    /// Price the committed lines: subtotal = unit price × quantity per line,
    /// total = sum of subtotals.
    #[must_use]
    pub fn new(cart_id: CartId, lines: Vec<CheckoutLine>, checked_out_at: DateTime<Utc>) -> Self {
        let lines: Vec<PurchaseLine> = lines
            .into_iter()
            .map(|line| {
                let subtotal = line.unit_price * Decimal::from(line.quantity);
                PurchaseLine {
                    stock_entry_id: line.stock_entry_id,
                    garment_name: line.garment_name,
                    size_name: line.size_name,
                    color_name: line.color_name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal,
                }
            })
            .collect();

        let total = lines.iter().map(|line| line.subtotal).sum();

        Self {
            cart_id,
            lines,
            total,
            checked_out_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn line(id: i32, quantity: i32, unit_price: Decimal) -> CheckoutLine {
        CheckoutLine {
            stock_entry_id: StockEntryId::new(id),
            garment_name: format!("garment-{id}"),
            size_name: "M".to_owned(),
            color_name: "black".to_owned(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_summary_totals() {
        // (qty 2 × 100) + (qty 1 × 50) = 250
        let summary = PurchaseSummary::new(
            CartId::new(1),
            vec![line(1, 2, dec!(100)), line(2, 1, dec!(50))],
            Utc::now(),
        );

        assert_eq!(summary.total, dec!(250));
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].subtotal, dec!(200));
        assert_eq!(summary.lines[1].subtotal, dec!(50));
    }

    #[test]
    fn test_summary_fractional_prices() {
        let summary = PurchaseSummary::new(
            CartId::new(1),
            vec![line(1, 3, dec!(19.99))],
            Utc::now(),
        );

        assert_eq!(summary.total, dec!(59.97));
    }

    #[test]
    fn test_summary_empty() {
        let summary = PurchaseSummary::new(CartId::new(1), vec![], Utc::now());
        assert_eq!(summary.total, Decimal::ZERO);
        assert!(summary.lines.is_empty());
    }
}
