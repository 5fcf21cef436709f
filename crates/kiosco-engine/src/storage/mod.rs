//! # Storage Seam
//!
//! The persistence collaborator interface. The engine performs all of its
//! I/O through [`Storage`] and nothing else; the mechanics behind it (file
//! layout, database schema, caching) belong to the implementor.
//!
//! ## Error Contract
//! Every failure surfaces as a [`StorageError`], which the engine wraps in
//! `CoreError::Storage` and treats as fatal to the current operation — no
//! retries happen on this side of the seam.
//!
//! ## Shipped Backends
//! - [`MemoryStorage`] - in-memory maps; tests and demos
//! - [`JsonFileStorage`] - whole-file JSON snapshot for single-register use

mod json;
mod memory;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;

use chrono::{DateTime, Utc};
use kiosco_core::{LedgerEntry, Product, StorageError};

/// The persistence collaborator.
///
/// Implementations must be safe to call from multiple threads; the engine
/// may invoke them while holding a per-product guard, so an implementation
/// must never call back into the engine.
pub trait Storage: Send + Sync {
    /// Loads a single product by id. `Ok(None)` when unknown.
    fn load_product(&self, id: &str) -> Result<Option<Product>, StorageError>;

    /// Loads every persisted product (active and inactive).
    fn list_products(&self) -> Result<Vec<Product>, StorageError>;

    /// Creates or replaces a product record.
    fn save_product(&self, product: &Product) -> Result<(), StorageError>;

    /// Appends one ledger entry. Entries are immutable; there is no update.
    fn append_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StorageError>;

    /// Loads ledger entries with timestamp in `[start, end)`, in
    /// chronological order.
    fn load_ledger_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StorageError>;
}
