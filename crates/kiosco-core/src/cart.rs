//! # Cart
//!
//! The transient shopping cart a sale is built from.
//!
//! ## Price Freezing
//! Each line captures the unit price at the moment the product is added.
//! A later price edit in the catalog does not change an open cart's total;
//! the same snapshot ends up on the receipt.
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product merges
//!   quantities into the existing line).
//! - Line quantity is always > 0 and at most [`MAX_LINE_QUANTITY`].
//! - At most [`MAX_CART_LINES`] lines.
//!
//! [`MAX_CART_LINES`]: crate::MAX_CART_LINES
//! [`MAX_LINE_QUANTITY`]: crate::MAX_LINE_QUANTITY

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ReceiptLine};
use crate::validation::validate_quantity;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the shopping cart.
///
/// `product_id` is a weak reference into the inventory store; the remaining
/// fields are a frozen snapshot taken when the line was added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Requested quantity, always > 0.
    pub quantity: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line from a product snapshot and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Converts the line into its receipt snapshot form.
    pub fn to_receipt_line(&self) -> ReceiptLine {
        ReceiptLine {
            product_id: self.product_id.clone(),
            sku: self.sku.clone(),
            name: self.name.clone(),
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
            line_total_cents: self.line_total().cents(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered sequence of lines with derived totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, merging with an existing line for the
    /// same product.
    ///
    /// ## Errors
    /// - `InvalidQuantity` if quantity ≤ 0
    /// - `Validation(OutOfRange)` if the merged quantity exceeds the per-line
    ///   maximum
    /// - `CartTooLarge` if a new line would exceed the line limit
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let merged = line.quantity + quantity;
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        validate_quantity(quantity)?;

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Removes a line by product id. Unknown products are a no-op.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines (distinct products).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Derived cart total: sum of line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Derived change for a tendered amount.
    ///
    /// Returns `None` when the tender does not cover the total; a sale
    /// cannot commit in that case.
    pub fn change_for(&self, tendered: Money) -> Option<Money> {
        let total = self.total();
        if tendered < total {
            None
        } else {
            Some(tendered - total)
        }
    }

    /// Checks if the cart is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Requested quantity per distinct product, in line order.
    ///
    /// Lines are already unique by product id, so this is a plain
    /// projection; it exists so callers validating availability don't
    /// depend on that invariant.
    pub fn quantities_by_product(&self) -> Vec<(String, i64)> {
        self.lines
            .iter()
            .map(|l| (l.product_id.clone(), l.quantity))
            .collect()
    }

    /// The receipt snapshot of the current lines.
    pub fn to_receipt_lines(&self) -> Vec<ReceiptLine> {
        self.lines.iter().map(CartLine::to_receipt_line).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> Product {
        let mut p = Product::new(format!("SKU-{id}"), format!("Product {id}"), price_cents, 100, 5);
        p.id = id.to_string();
        p
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add(&product, 2).unwrap();
        cart.add(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        assert!(matches!(
            cart.add(&product, 0),
            Err(CoreError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add(&product, -3),
            Err(CoreError::InvalidQuantity(-3))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_snapshot_decouples_from_later_edits() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1000);

        cart.add(&product, 1).unwrap();
        product.price_cents = 9999;

        assert_eq!(cart.total().cents(), 1000);
    }

    #[test]
    fn test_change_for() {
        let mut cart = Cart::new();
        let product = test_product("1", 2500);
        cart.add(&product, 2).unwrap();

        assert_eq!(cart.change_for(Money::from_cents(5000)), Some(Money::zero()));
        assert_eq!(
            cart.change_for(Money::from_cents(6000)),
            Some(Money::from_cents(1000))
        );
        assert_eq!(cart.change_for(Money::from_cents(4999)), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 100), 1).unwrap();
        cart.add(&test_product("2", 200), 1).unwrap();

        cart.remove("1");
        assert_eq!(cart.line_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_by_product_preserves_order() {
        let mut cart = Cart::new();
        cart.add(&test_product("b", 100), 2).unwrap();
        cart.add(&test_product("a", 200), 1).unwrap();

        let quantities = cart.quantities_by_product();
        assert_eq!(quantities[0], ("b".to_string(), 2));
        assert_eq!(quantities[1], ("a".to_string(), 1));
    }
}
