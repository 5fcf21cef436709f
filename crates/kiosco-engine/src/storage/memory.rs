//! # In-Memory Storage
//!
//! A [`Storage`] backend that keeps everything in process memory. Used by
//! the test suite and the demo binary; every operation succeeds unless the
//! process dies, which makes engine failures easy to attribute.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use kiosco_core::{LedgerEntry, Product, StorageError};

use super::Storage;

/// In-memory backend: a product map and an append-only entry list.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    products: Mutex<HashMap<String, Product>>,
    ledger: Mutex<Vec<LedgerEntry>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Number of persisted ledger entries (test helper).
    pub fn ledger_len(&self) -> usize {
        self.ledger.lock().len()
    }
}

impl Storage for MemoryStorage {
    fn load_product(&self, id: &str) -> Result<Option<Product>, StorageError> {
        Ok(self.products.lock().get(id).cloned())
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let mut products: Vec<Product> = self.products.lock().values().cloned().collect();
        products.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(products)
    }

    fn save_product(&self, product: &Product) -> Result<(), StorageError> {
        self.products
            .lock()
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    fn append_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StorageError> {
        self.ledger.lock().push(entry.clone());
        Ok(())
    }

    fn load_ledger_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StorageError> {
        Ok(self
            .ledger
            .lock()
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
