//! # Sale Transaction
//!
//! Orchestrates a cart checkout against the inventory store and the ledger.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add_line(..)*         validate()            commit(tendered)          │
//! │  ┌──────────┐          ┌───────────┐         ┌───────────┐             │
//! │  │ Building ├─────────►│ Validated ├────────►│ Committed │ (terminal)  │
//! │  └────┬─────┘          └────┬──────┘         └───────────┘             │
//! │       │                     │                                           │
//! │       │ validate() hits     │ commit() hits InsufficientStock          │
//! │       │ InsufficientStock   │ (decrements already applied are          │
//! │       │                     │  reversed via compensating restocks)     │
//! │       ▼                     ▼                                           │
//! │  ┌─────────────────────────────┐                                       │
//! │  │           Aborted           │ (terminal, also via abort())          │
//! │  └─────────────────────────────┘                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Inventory mutations are applied one product at a time, so multi-product
//! atomicity is approximated with a compensation protocol: when a decrement
//! (or the ledger append) fails mid-commit, every decrement already applied
//! in this attempt is reversed with a `restock` before the error surfaces.
//! Once `commit` starts applying decrements it runs to completion - success
//! or compensated failure - and is not externally cancellable.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use kiosco_core::{Cart, CoreError, CoreResult, Money, SaleReceipt};

use crate::inventory::{InventoryStore, Reservation};
use crate::ledger::Ledger;

// =============================================================================
// Sale State
// =============================================================================

/// Where a sale transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleState {
    /// Lines are being added.
    Building,
    /// Availability confirmed; awaiting payment.
    Validated,
    /// Terminal success: stock decremented, income recorded.
    Committed,
    /// Terminal failure: no net effect on inventory.
    Aborted,
}

impl SaleState {
    /// Display name used in errors and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            SaleState::Building => "building",
            SaleState::Validated => "validated",
            SaleState::Committed => "committed",
            SaleState::Aborted => "aborted",
        }
    }

    /// True for Committed and Aborted.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, SaleState::Committed | SaleState::Aborted)
    }
}

// =============================================================================
// Sale Transaction
// =============================================================================

/// A single checkout in progress.
///
/// Owns the transient cart; borrows the shared inventory store and ledger
/// for the duration of the sale. Dropping an uncommitted transaction has no
/// effect on either (reservations are advisory, nothing is held).
pub struct SaleTransaction<'a> {
    inventory: &'a InventoryStore,
    ledger: &'a Ledger,
    cart: Cart,
    reservations: Vec<Reservation>,
    state: SaleState,
}

impl<'a> SaleTransaction<'a> {
    /// Starts a new sale in the Building state.
    pub fn new(inventory: &'a InventoryStore, ledger: &'a Ledger) -> Self {
        SaleTransaction {
            inventory,
            ledger,
            cart: Cart::new(),
            reservations: Vec::new(),
            state: SaleState::Building,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SaleState {
        self.state
    }

    /// Read access to the cart (for display layers).
    #[inline]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The running total.
    #[inline]
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Adds a line with the product's current price snapshot, merging into
    /// an existing line for the same product.
    ///
    /// ## Errors
    /// - `InvalidSaleState` - not in Building
    /// - `InvalidQuantity` - quantity ≤ 0
    /// - `ProductNotFound` - unknown or deactivated product
    pub fn add_line(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        self.ensure_state(SaleState::Building, "add a line")?;

        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        let product = self.inventory.get_active(product_id)?;
        self.cart.add(&product, quantity)
    }

    /// Checks availability for every line and moves to Validated.
    ///
    /// Reservations are advisory checks, not held locks: stock can still be
    /// consumed concurrently, and `commit` re-checks inside the per-product
    /// critical section.
    ///
    /// ## Errors
    /// - `InvalidSaleState` - not in Building
    /// - `EmptyCart` - nothing to sell (state unchanged)
    /// - `InsufficientStock` - names the first failing product; the sale is
    ///   Aborted and no partial reservations remain in effect
    pub fn validate(&mut self) -> CoreResult<()> {
        self.ensure_state(SaleState::Building, "validate")?;

        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let mut reservations = Vec::with_capacity(self.cart.line_count());
        for (product_id, quantity) in self.cart.quantities_by_product() {
            match self.inventory.reserve(&product_id, quantity) {
                Ok(reservation) => reservations.push(reservation),
                Err(err) => {
                    warn!(product_id = %product_id, %err, "Sale validation failed");
                    self.state = SaleState::Aborted;
                    return Err(err);
                }
            }
        }

        self.reservations = reservations;
        self.state = SaleState::Validated;
        Ok(())
    }

    /// Commits the sale: decrements stock, records the income, produces the
    /// receipt payload.
    ///
    /// ## Errors
    /// - `InvalidSaleState` - not in Validated
    /// - `InsufficientPayment` - tender below total; the sale STAYS
    ///   Validated so the cashier can collect more and retry
    /// - `InsufficientStock` / `Storage` - commit failed mid-way; applied
    ///   decrements were reversed and the sale is Aborted
    pub fn commit(&mut self, tendered: Money) -> CoreResult<SaleReceipt> {
        self.ensure_state(SaleState::Validated, "commit")?;

        let total = self.cart.total();
        if tendered < total {
            return Err(CoreError::InsufficientPayment {
                total_cents: total.cents(),
                tendered_cents: tendered.cents(),
            });
        }

        // Past this point the commit runs to completion: either every
        // reservation is redeemed, or whatever was applied is reversed.
        let reservations = std::mem::take(&mut self.reservations);
        let mut applied: Vec<(String, i64)> = Vec::with_capacity(reservations.len());

        for reservation in &reservations {
            match self
                .inventory
                .commit_decrement(reservation.product_id(), reservation.quantity())
            {
                Ok(()) => applied.push((
                    reservation.product_id().to_string(),
                    reservation.quantity(),
                )),
                Err(err) => {
                    warn!(product_id = reservation.product_id(), %err, "Commit failed, compensating");
                    self.compensate(&applied);
                    self.state = SaleState::Aborted;
                    return Err(err);
                }
            }
        }

        let sale_id = Uuid::new_v4().to_string();
        if let Err(err) = self.ledger.record_sale_income(total, &sale_id) {
            warn!(sale_id = %sale_id, %err, "Ledger append failed, compensating");
            self.compensate(&applied);
            self.state = SaleState::Aborted;
            return Err(err);
        }

        let now = Utc::now();
        let change = tendered - total;
        let receipt = SaleReceipt {
            sale_id: sale_id.clone(),
            receipt_number: generate_receipt_number(now),
            lines: self.cart.to_receipt_lines(),
            total_cents: total.cents(),
            tendered_cents: tendered.cents(),
            change_cents: change.cents(),
            completed_at: now,
        };

        self.state = SaleState::Committed;
        info!(
            sale_id = %sale_id,
            receipt_number = %receipt.receipt_number,
            total = %total,
            change = %change,
            lines = receipt.lines.len(),
            "Sale committed"
        );
        Ok(receipt)
    }

    /// Abandons the sale. Valid from any non-terminal state; there is
    /// nothing to release because reservations are not held locks.
    pub fn abort(&mut self) -> CoreResult<()> {
        if self.state.is_terminal() {
            return Err(CoreError::InvalidSaleState {
                current: self.state.name(),
                operation: "abort",
            });
        }

        self.reservations.clear();
        self.state = SaleState::Aborted;
        Ok(())
    }

    /// Reverses the decrements applied so far, newest first.
    ///
    /// A restock that fails here (storage down mid-compensation) is logged
    /// and the remaining reversals still run; the discrepancy is surfaced to
    /// the operator through the log, not hidden by aborting early.
    fn compensate(&self, applied: &[(String, i64)]) {
        for (product_id, quantity) in applied.iter().rev() {
            if let Err(err) = self.inventory.restock(product_id, *quantity) {
                error!(product_id = %product_id, quantity, %err, "Compensating restock failed");
            }
        }
    }

    fn ensure_state(&self, expected: SaleState, operation: &'static str) -> CoreResult<()> {
        if self.state != expected {
            return Err(CoreError::InvalidSaleState {
                current: self.state.name(),
                operation,
            });
        }
        Ok(())
    }
}

/// Generates a receipt number: `YYYYMMDD-NNNN`.
///
/// The suffix is derived from the commit timestamp.
// TODO: replace the millisecond suffix with a per-day counter once receipt
// sequences must be gapless for fiscal export.
fn generate_receipt_number(now: DateTime<Utc>) -> String {
    let seq = (now.timestamp_millis().rem_euclid(10_000)) as u16;
    format!("{}-{:04}", now.format("%Y%m%d"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================
