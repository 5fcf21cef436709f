//! # JSON File Storage
//!
//! A [`Storage`] backend that serializes the whole store to a single JSON
//! file. The original deployment target is one register in a kiosk, where a
//! catalog of a few hundred products makes a full-snapshot write per
//! mutation acceptable; anything larger belongs behind a real database
//! implementation of the trait.
//!
//! Writes go to a sibling `.tmp` file first and are renamed over the
//! snapshot, so a crash mid-write leaves the previous snapshot intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiosco_core::{LedgerEntry, Product, StorageError};

use super::Storage;

/// The on-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    products: Vec<Product>,
    ledger: Vec<LedgerEntry>,
}

/// Whole-file JSON snapshot backend.
pub struct JsonFileStorage {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl JsonFileStorage {
    /// Opens (or creates) a snapshot file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        } else {
            Snapshot::default()
        };

        Ok(JsonFileStorage {
            path,
            state: Mutex::new(state),
        })
    }

    /// Writes the snapshot to disk. Caller holds the state lock.
    fn persist(&self, state: &Snapshot) -> Result<(), StorageError> {
        let tmp_path = self.path.with_extension("tmp");

        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            writer.flush()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), "Snapshot persisted");
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_product(&self, id: &str) -> Result<Option<Product>, StorageError> {
        let state = self.state.lock();
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.state.lock().products.clone())
    }

    fn save_product(&self, product: &Product) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => state.products.push(product.clone()),
        }
        self.persist(&state)
    }

    fn append_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        state.ledger.push(entry.clone());
        self.persist(&state)
    }

    fn load_ledger_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LedgerEntry>, StorageError> {
        Ok(self
            .state
            .lock()
            .ledger
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_snapshot_path(tag: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("kiosco-json-storage-{}-{}.json", tag, Utc::now().timestamp_nanos_opt().unwrap_or_default()));
        path
    }

    #[test]
    fn test_round_trips_products_across_reopen() {
        let path = temp_snapshot_path("products");

        {
            let storage = JsonFileStorage::open(&path).unwrap();
            storage
                .save_product(&Product::new("BEB001", "Coca-Cola 600ml", 2500, 50, 10))
                .unwrap();
        }

        let reopened = JsonFileStorage::open(&path).unwrap();
        let products = reopened.list_products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].sku, "BEB001");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_replaces_existing_product() {
        let path = temp_snapshot_path("replace");
        let storage = JsonFileStorage::open(&path).unwrap();

        let mut product = Product::new("BEB001", "Coca-Cola 600ml", 2500, 50, 10);
        storage.save_product(&product).unwrap();

        product.quantity = 44;
        storage.save_product(&product).unwrap();

        let products = storage.list_products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 44);

        let _ = fs::remove_file(&path);
    }
}
