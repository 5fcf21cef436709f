//! # Domain Types
//!
//! Core domain types used throughout Kiosco POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  LedgerEntry    │   │  SaleReceipt    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  sale_id (UUID) │       │
//! │  │  sku (business) │   │  kind           │   │  receipt_number │       │
//! │  │  quantity       │   │  amount_cents   │   │  lines          │       │
//! │  │  min_stock      │   │  timestamp      │   │  total / change │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  StockState lives in `stock` and is always derived, never stored.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry both an `id` (UUID v4, immutable, used for references) and
//! a `sku` (human-readable business identifier shown on receipts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::stock::{classify, StockState};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// The quantity on hand is authoritative only inside the inventory store;
/// clones handed out by the store are snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, unique per store.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Optional category label (e.g. "Bebidas").
    pub category: Option<String>,

    /// Unit price in cents (smallest currency unit), never negative.
    pub price_cents: i64,

    /// Units on hand. Invariant: never negative; mutated only through the
    /// inventory store's commit operations.
    pub quantity: i64,

    /// Minimum-stock threshold for the semaphore bands.
    pub min_stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new active product with a generated id and fresh timestamps.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        quantity: i64,
        min_stock: i64,
    ) -> Self {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.into(),
            name: name.into(),
            description: None,
            category: None,
            price_cents,
            quantity,
            min_stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The current semaphore state, derived from live quantity and threshold.
    #[inline]
    pub fn stock_state(&self) -> StockState {
        classify(self.quantity, self.min_stock)
    }

    /// Checks whether `quantity` units could be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && quantity > 0 && self.quantity >= quantity
    }
}

// =============================================================================
// Ledger Entries
// =============================================================================

/// The kind of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// Cash received for a completed sale.
    SaleIncome,
    /// Cash taken out of the drawer.
    Withdrawal,
}

/// A single cash movement.
///
/// Immutable once written. The ledger appends entries in chronological
/// order and never mutates or reorders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the movement was recorded.
    pub timestamp: DateTime<Utc>,

    /// Income or withdrawal.
    pub kind: LedgerEntryKind,

    /// Movement amount in cents, always positive; the kind carries the sign.
    pub amount_cents: i64,

    /// The originating sale, for SaleIncome entries.
    pub sale_id: Option<String>,

    /// Free-text reason, for Withdrawal entries.
    pub concept: Option<String>,
}

impl LedgerEntry {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Sale Receipt
// =============================================================================

/// A line on a receipt.
/// Uses the snapshot pattern: product data is frozen at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
}

/// The payload handed to the receipt renderer after a committed sale.
///
/// Immutable once created; the renderer owns its format (paper, PDF, ...),
/// this type only carries the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// Sale identifier (UUID v4).
    pub sale_id: String,

    /// Human-readable receipt number (date-based).
    pub receipt_number: String,

    /// Snapshot of the committed cart.
    pub lines: Vec<ReceiptLine>,

    /// Cart total in cents.
    pub total_cents: i64,

    /// Amount the customer handed over.
    pub tendered_cents: i64,

    /// Change returned: tendered − total, never negative on a committed sale.
    pub change_cents: i64,

    /// When the sale was committed.
    pub completed_at: DateTime<Utc>,
}

impl SaleReceipt {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// A product that needs attention on the closing report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub min_stock: i64,
    pub state: StockState,
}

/// The end-of-day summary produced by the daily closing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingSummary {
    /// The day the summary covers.
    pub day: chrono::NaiveDate,

    /// Sum of SaleIncome amounts for the day.
    pub total_income_cents: i64,

    /// Sum of Withdrawal amounts for the day.
    pub total_withdrawals_cents: i64,

    /// Income minus withdrawals.
    pub net_cash_flow_cents: i64,

    /// Number of sales recorded.
    pub sale_count: usize,

    /// Active products currently Critico or Agotado.
    pub low_stock: Vec<StockAlert>,
}

impl ClosingSummary {
    #[inline]
    pub fn net_cash_flow(&self) -> Money {
        Money::from_cents(self.net_cash_flow_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_new_is_active_with_fresh_id() {
        let p = Product::new("BEB001", "Coca-Cola 600ml", 2500, 50, 10);
        assert!(p.is_active);
        assert!(!p.id.is_empty());
        assert_eq!(p.price().cents(), 2500);
        assert_eq!(p.stock_state(), StockState::Normal);
    }

    #[test]
    fn test_product_can_sell() {
        let p = Product::new("BEB001", "Coca-Cola 600ml", 2500, 3, 10);
        assert!(p.can_sell(3));
        assert!(!p.can_sell(4));
        assert!(!p.can_sell(0));

        let mut inactive = p.clone();
        inactive.is_active = false;
        assert!(!inactive.can_sell(1));
    }

    #[test]
    fn test_ledger_entry_kind_serialization() {
        let json = serde_json::to_string(&LedgerEntryKind::SaleIncome).unwrap();
        assert_eq!(json, "\"sale_income\"");
        let json = serde_json::to_string(&LedgerEntryKind::Withdrawal).unwrap();
        assert_eq!(json, "\"withdrawal\"");
    }

    #[test]
    fn test_receipt_money_accessors() {
        let receipt = SaleReceipt {
            sale_id: "s".to_string(),
            receipt_number: "20260101-0001".to_string(),
            lines: vec![],
            total_cents: 5000,
            tendered_cents: 6000,
            change_cents: 1000,
            completed_at: Utc::now(),
        };
        assert_eq!(receipt.total().cents(), 5000);
        assert_eq!(receipt.change().cents(), 1000);
    }
}
