//! # Inventory Store
//!
//! Owns the authoritative product records and enforces the quantity
//! invariant: **stock never goes negative**.
//!
//! ## Per-Product Critical Sections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Commit-Time Check-Then-Act (per product)                  │
//! │                                                                         │
//! │  commit_decrement(id, n)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  acquire the product's map guard ──────────┐                            │
//! │       │                                    │ exclusive per product      │
//! │       ├── re-check quantity ≥ n            │ (sharded DashMap guard)    │
//! │       ├── persist the new quantity         │                            │
//! │       └── apply it in memory               │                            │
//! │  release guard ────────────────────────────┘                            │
//! │                                                                         │
//! │  Two concurrent sales of the same product serialize here, so neither   │
//! │  can decrement against a stale quantity.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reservations ([`reserve`]) are advisory availability checks only - they
//! hold no lock and mutate nothing; the commit re-checks inside the guard.
//!
//! [`reserve`]: InventoryStore::reserve

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use kiosco_core::{
    classify, CoreError, CoreResult, Product, StockAlert, StockState, ValidationError,
};
use kiosco_core::validation::{
    validate_min_stock, validate_price_cents, validate_product_name, validate_sku,
};

use crate::storage::Storage;

// =============================================================================
// Reservation
// =============================================================================

/// An advisory availability check, produced by [`InventoryStore::reserve`].
///
/// Not a held lock: stock may still be consumed by a concurrent sale between
/// reservation and commit, in which case the commit-time re-check fails.
/// The token is deliberately neither clonable nor constructible outside this
/// module, so it can only be redeemed by the transaction that requested it.
#[must_use = "a reservation only means something to the transaction that requested it"]
#[derive(Debug)]
pub struct Reservation {
    product_id: String,
    quantity: i64,
}

impl Reservation {
    /// The reserved product.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// The reserved quantity.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Inventory Store
// =============================================================================

/// The authoritative product registry.
///
/// All quantity mutations go through [`commit_decrement`] and [`restock`];
/// every mutation persists through the storage collaborator *before* it is
/// applied in memory, so a storage failure leaves the store unchanged
/// (all-or-nothing per call).
///
/// [`commit_decrement`]: InventoryStore::commit_decrement
/// [`restock`]: InventoryStore::restock
pub struct InventoryStore {
    products: DashMap<String, Product>,
    storage: Arc<dyn Storage>,
}

impl InventoryStore {
    /// Opens the store, loading every persisted product.
    pub fn open(storage: Arc<dyn Storage>) -> CoreResult<Self> {
        let products = DashMap::new();
        for product in storage.list_products()? {
            products.insert(product.id.clone(), product);
        }

        info!(count = products.len(), "Inventory store opened");
        Ok(InventoryStore { products, storage })
    }

    /// Registers a new product.
    ///
    /// ## Errors
    /// - `Validation` - bad SKU/name/price/threshold, or duplicate id/SKU
    /// - `InvalidAmount` - negative initial quantity
    /// - `Storage` - the record could not be persisted (nothing inserted)
    pub fn register(&self, product: Product) -> CoreResult<Product> {
        validate_sku(&product.sku)?;
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_min_stock(product.min_stock)?;

        if product.quantity < 0 {
            return Err(CoreError::InvalidAmount {
                operation: "register",
                amount: product.quantity,
            });
        }

        if self.products.contains_key(&product.id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: product.id.clone(),
            }
            .into());
        }

        if self.products.iter().any(|p| p.sku == product.sku) {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: product.sku.clone(),
            }
            .into());
        }

        self.storage.save_product(&product)?;
        self.products.insert(product.id.clone(), product.clone());

        debug!(sku = %product.sku, quantity = product.quantity, "Product registered");
        Ok(product)
    }

    /// Returns a snapshot of a product, active or not.
    pub fn get(&self, product_id: &str) -> CoreResult<Product> {
        self.products
            .get(product_id)
            .map(|p| p.clone())
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Returns a snapshot of a product that is visible to the sale path.
    ///
    /// Deactivated products are reported as not found here: history can
    /// still read them via [`get`], but nothing can sell them.
    ///
    /// [`get`]: InventoryStore::get
    pub fn get_active(&self, product_id: &str) -> CoreResult<Product> {
        match self.products.get(product_id) {
            Some(p) if p.is_active => Ok(p.clone()),
            _ => Err(CoreError::ProductNotFound(product_id.to_string())),
        }
    }

    /// Current quantity on hand.
    pub fn quantity(&self, product_id: &str) -> CoreResult<i64> {
        Ok(self.get(product_id)?.quantity)
    }

    /// The product's current semaphore state.
    pub fn classify(&self, product_id: &str) -> CoreResult<StockState> {
        let product = self.get(product_id)?;
        Ok(classify(product.quantity, product.min_stock))
    }

    /// Advisory availability check; see [`Reservation`].
    ///
    /// ## Errors
    /// - `InvalidAmount` - amount ≤ 0
    /// - `ProductNotFound` - unknown or deactivated product
    /// - `InsufficientStock` - fewer units on hand than requested
    pub fn reserve(&self, product_id: &str, amount: i64) -> CoreResult<Reservation> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount {
                operation: "reserve",
                amount,
            });
        }

        let product = self.get_active(product_id)?;
        if product.quantity < amount {
            return Err(CoreError::InsufficientStock {
                sku: product.sku,
                available: product.quantity,
                requested: amount,
            });
        }

        Ok(Reservation {
            product_id: product_id.to_string(),
            quantity: amount,
        })
    }

    /// Applies a quantity reduction.
    ///
    /// Runs the whole check-then-act inside the product's guard: re-checks
    /// availability, persists the new quantity, then applies it in memory.
    /// NOT idempotent - callers call exactly once per unit of stock
    /// consumed.
    ///
    /// ## Errors
    /// - `InvalidAmount` - amount ≤ 0
    /// - `ProductNotFound` - unknown or deactivated product
    /// - `InsufficientStock` - a concurrent sale consumed the stock first
    /// - `Storage` - persistence failed (quantity unchanged)
    pub fn commit_decrement(&self, product_id: &str, amount: i64) -> CoreResult<()> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount {
                operation: "commit_decrement",
                amount,
            });
        }

        let mut entry = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if !entry.is_active {
            return Err(CoreError::ProductNotFound(product_id.to_string()));
        }

        if entry.quantity < amount {
            return Err(CoreError::InsufficientStock {
                sku: entry.sku.clone(),
                available: entry.quantity,
                requested: amount,
            });
        }

        let mut updated = entry.clone();
        updated.quantity -= amount;
        updated.updated_at = chrono::Utc::now();

        self.storage.save_product(&updated)?;
        *entry = updated;

        debug!(sku = %entry.sku, amount, quantity = entry.quantity, "Stock decremented");
        Ok(())
    }

    /// Increases quantity on hand (delivery, or sale compensation).
    ///
    /// Works on deactivated products too: a compensating restock must
    /// succeed even if the product was deactivated mid-transaction.
    ///
    /// ## Errors
    /// - `InvalidAmount` - amount ≤ 0
    /// - `ProductNotFound` - unknown product
    /// - `Storage` - persistence failed (quantity unchanged)
    pub fn restock(&self, product_id: &str, amount: i64) -> CoreResult<()> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount {
                operation: "restock",
                amount,
            });
        }

        let mut entry = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut updated = entry.clone();
        updated.quantity += amount;
        updated.updated_at = chrono::Utc::now();

        self.storage.save_product(&updated)?;
        *entry = updated;

        debug!(sku = %entry.sku, amount, quantity = entry.quantity, "Stock increased");
        Ok(())
    }

    /// Logical removal: the product stays readable for history but
    /// disappears from the sale path.
    pub fn deactivate(&self, product_id: &str) -> CoreResult<()> {
        let mut entry = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut updated = entry.clone();
        updated.is_active = false;
        updated.updated_at = chrono::Utc::now();

        self.storage.save_product(&updated)?;
        *entry = updated;

        info!(sku = %entry.sku, "Product deactivated");
        Ok(())
    }

    /// Snapshot of all active products, sorted by name.
    pub fn list_active(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.clone())
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Active products currently Critico or Agotado, sorted by SKU.
    ///
    /// Consumed by the daily closing and by presentation layers that render
    /// the alert list.
    pub fn stock_alerts(&self) -> Vec<StockAlert> {
        let mut alerts: Vec<StockAlert> = self
            .products
            .iter()
            .filter(|p| p.is_active)
            .filter_map(|p| {
                let state = classify(p.quantity, p.min_stock);
                state.needs_attention().then(|| StockAlert {
                    product_id: p.id.clone(),
                    sku: p.sku.clone(),
                    name: p.name.clone(),
                    quantity: p.quantity,
                    min_stock: p.min_stock,
                    state,
                })
            })
            .collect();
        alerts.sort_by(|a, b| a.sku.cmp(&b.sku));
        alerts
    }

    /// Number of known products, active and inactive.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when no products are registered.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
