//! Concurrent sale hammering: many threads fight over the same scarce
//! product. The per-product critical section must hand out each unit at
//! most once, whatever the interleaving.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};

use kiosco_core::{CoreError, Money, Product};
use kiosco_engine::{InventoryStore, Ledger, MemoryStorage, SaleTransaction, Storage};

/// 16 threads each try to buy 1 unit; only 10 units exist. Exactly 10 sales
/// commit, the rest fail with InsufficientStock, and the final quantity is
/// exactly zero - never negative.
#[test]
fn oversubscribed_single_product() {
    const STOCK: i64 = 10;
    const BUYERS: usize = 16;

    let storage = Arc::new(MemoryStorage::new());
    let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
    let ledger = Ledger::open(storage).unwrap();
    let product = inventory
        .register(Product::new("BEB001", "Coca-Cola 600ml", 2500, STOCK, 5))
        .unwrap();

    let committed = thread::scope(|scope| {
        let handles: Vec<_> = (0..BUYERS)
            .map(|_| {
                let inventory = &inventory;
                let ledger = &ledger;
                let product_id = product.id.as_str();
                scope.spawn(move || {
                    let mut sale = SaleTransaction::new(inventory, ledger);
                    sale.add_line(product_id, 1)?;
                    sale.validate()?;
                    sale.commit(Money::from_cents(2500)).map(|_| ())
                })
            })
            .collect();

        let mut committed = 0usize;
        for handle in handles {
            match handle.join().expect("buyer thread panicked") {
                Ok(()) => committed += 1,
                Err(CoreError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected failure: {other:?}"),
            }
        }
        committed
    });

    assert_eq!(committed as i64, STOCK);
    assert_eq!(inventory.quantity(&product.id).unwrap(), 0);

    // One income entry per committed sale, nothing for the losers.
    let entries = ledger.entries_between(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC);
    assert_eq!(entries.len(), committed);
}

/// Two products, buyers hitting both in opposite order: every sale either
/// commits fully or compensates fully, so the combined units sold never
/// exceed the combined stock.
#[test]
fn crossed_multi_product_sales() {
    const STOCK: i64 = 8;
    const BUYERS: usize = 12;

    let storage = Arc::new(MemoryStorage::new());
    let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
    let ledger = Ledger::open(storage).unwrap();
    let cola = inventory
        .register(Product::new("BEB001", "Coca-Cola 600ml", 2500, STOCK, 5))
        .unwrap();
    let chips = inventory
        .register(Product::new("SNA001", "Lays 60g", 2000, STOCK, 5))
        .unwrap();

    let committed = thread::scope(|scope| {
        let handles: Vec<_> = (0..BUYERS)
            .map(|i| {
                let inventory = &inventory;
                let ledger = &ledger;
                let (first, second) = if i % 2 == 0 {
                    (cola.id.as_str(), chips.id.as_str())
                } else {
                    (chips.id.as_str(), cola.id.as_str())
                };
                scope.spawn(move || {
                    let mut sale = SaleTransaction::new(inventory, ledger);
                    sale.add_line(first, 1)?;
                    sale.add_line(second, 1)?;
                    sale.validate()?;
                    sale.commit(Money::from_cents(4500)).map(|_| ())
                })
            })
            .collect();

        let mut committed = 0i64;
        for handle in handles {
            match handle.join().expect("buyer thread panicked") {
                Ok(()) => committed += 1,
                Err(CoreError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected failure: {other:?}"),
            }
        }
        committed
    });

    let cola_left = inventory.quantity(&cola.id).unwrap();
    let chips_left = inventory.quantity(&chips.id).unwrap();

    // Committed sales consumed one of each; compensation returned the rest.
    assert!(cola_left >= 0 && chips_left >= 0);
    assert_eq!(cola_left, STOCK - committed);
    assert_eq!(chips_left, STOCK - committed);
    assert!(committed <= STOCK);
}
