//! # Error Types
//!
//! Domain-specific error types for kiosco-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kiosco-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── StorageError     - Persistence collaborator failures              │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │        StorageError ────┴──► CoreError ──► caller (UI shows message)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, amounts, states)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are reported synchronously to the caller of the failing operation;
/// nothing in the engine swallows them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (unknown id, or deactivated on the sale path).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A stock or money amount was zero or negative.
    ///
    /// ## When This Occurs
    /// - `reserve`/`commit_decrement`/`restock` called with amount ≤ 0
    /// - Ledger `record_*` called with amount ≤ 0
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        operation: &'static str,
        amount: i64,
    },

    /// A cart line quantity was zero or negative.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Insufficient stock to complete the operation.
    ///
    /// ## When This Occurs
    /// - `reserve` finds fewer units on hand than requested
    /// - `commit_decrement` re-checks the quantity and finds that a
    ///   concurrent sale consumed it first
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Tendered amount does not cover the cart total.
    #[error("Insufficient payment: total {total_cents}, tendered {tendered_cents}")]
    InsufficientPayment {
        total_cents: i64,
        tendered_cents: i64,
    },

    /// A cash withdrawal exceeds the drawer's available cash for the day.
    #[error("Insufficient funds in drawer: available {available_cents}, requested {requested_cents}")]
    InsufficientFunds {
        available_cents: i64,
        requested_cents: i64,
    },

    /// The cart has no lines; there is nothing to validate or commit.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// The sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - `add_line` after `validate`
    /// - `commit` before `validate`
    /// - any operation on a Committed or Aborted sale
    #[error("Sale is {current}, cannot {operation}")]
    InvalidSaleState {
        current: &'static str,
        operation: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence collaborator failure. Always fatal to the current
    /// transaction; retry policy, if any, belongs to the storage backend.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, before business
/// logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., characters not allowed in a SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU on registration).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Storage Error
// =============================================================================

/// Failures reported by the persistence collaborator.
///
/// The engine only ever sees storage through the `Storage` trait; every
/// backend maps its native failures into one of these variants.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or failed the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored data could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(String),

    /// Underlying I/O failure (file missing, permissions, disk full).
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
