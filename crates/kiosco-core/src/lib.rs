//! # kiosco-core: Pure Business Logic for Kiosco POS
//!
//! This crate is the **heart** of Kiosco POS. It contains all business logic
//! as pure functions and plain types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kiosco POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (GUI / CLI, external)                 │   │
//! │  │    product table ──► cart view ──► tender dialog ──► receipt   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kiosco-engine (sibling crate)                   │   │
//! │  │    InventoryStore ── SaleTransaction ── Ledger ── Closing      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosco-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │   cart    │  │   │
//! │  │   │  Product  │  │   Money   │  │ StockState│  │   Cart    │  │   │
//! │  │   │  Receipt  │  │  (cents)  │  │ classify  │  │ CartLine  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LedgerEntry, SaleReceipt, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stock`] - Stock semaphore state and the pure classifier
//! - [`cart`] - Cart with price-snapshot lines and derived totals
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input, same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kiosco_core::Money` instead of
// `use kiosco_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, StorageError, ValidationError};
pub use money::Money;
pub use stock::{classify, StockState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// Prevents runaway carts and keeps a single transaction a reasonable size.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Catches obvious typos at the register (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Default minimum-stock threshold for newly registered products that
/// don't specify one.
pub const DEFAULT_MIN_STOCK: i64 = 5;
