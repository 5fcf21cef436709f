//! # kiosco-engine: Inventory & Sale Transaction Engine
//!
//! This crate owns the shared mutable state of Kiosco POS: the inventory
//! store, the cash-drawer ledger, the sale transaction state machine, the
//! daily closing, and the seam to the persistence collaborator.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kiosco POS Engine Data Flow                        │
//! │                                                                         │
//! │  Presentation (external)                                                │
//! │       │  add_line / validate / commit(tendered)                         │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐    reserve / commit_decrement   ┌─────────────┐  │
//! │  │ SaleTransaction  ├─────────────────────────────────►│ Inventory   │  │
//! │  │ Building→...     │                                  │ Store       │  │
//! │  └────────┬─────────┘    record_sale_income            └──────┬──────┘  │
//! │           ├─────────────────────────────────►┌────────┐      │         │
//! │           │                                  │ Ledger │      │         │
//! │           ▼ SaleReceipt                      └───┬────┘      │         │
//! │  receipt renderer (external)                     │           │         │
//! │                                                  ▼           ▼         │
//! │                               DailyClosing::summarize(day)             │
//! │                                                  │                     │
//! │                                                  ▼                     │
//! │  every mutation write-through ──────────► Storage (trait)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`inventory`] - product registry, per-product critical sections
//! - [`sale`] - the checkout state machine with compensation
//! - [`ledger`] - append-only cash movements, drawer balance
//! - [`closing`] - end-of-day summary
//! - [`storage`] - persistence collaborator trait + reference backends
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use kiosco_core::{Money, Product};
//! use kiosco_engine::{InventoryStore, Ledger, MemoryStorage, SaleTransaction, Storage};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
//! let ledger = Ledger::open(storage).unwrap();
//!
//! let cola = inventory
//!     .register(Product::new("BEB001", "Coca-Cola 600ml", 2500, 50, 10))
//!     .unwrap();
//!
//! let mut sale = SaleTransaction::new(&inventory, &ledger);
//! sale.add_line(&cola.id, 2).unwrap();
//! sale.validate().unwrap();
//! let receipt = sale.commit(Money::from_cents(6000)).unwrap();
//!
//! assert_eq!(receipt.change_cents, 1000);
//! assert_eq!(inventory.quantity(&cola.id).unwrap(), 48);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod closing;
pub mod inventory;
pub mod ledger;
pub mod sale;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use closing::DailyClosing;
pub use inventory::{InventoryStore, Reservation};
pub use ledger::Ledger;
pub use sale::{SaleState, SaleTransaction};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
