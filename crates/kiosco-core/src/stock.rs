//! # Stock Classification
//!
//! The stock semaphore: a pure mapping from (quantity on hand, minimum-stock
//! threshold) to one of four states. The presentation layer maps each state
//! to a row color; this module knows nothing about rendering.
//!
//! ## Bands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity == 0                         →  Agotado   (out of stock)     │
//! │  0 < quantity ≤ minimum                →  Critico   (reorder now)      │
//! │  minimum < quantity < 2 × minimum      →  Bajo      (running low)      │
//! │  quantity ≥ 2 × minimum                →  Normal                       │
//! │                                                                         │
//! │  minimum == 0 collapses the middle bands: anything on hand is Normal.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Stock State
// =============================================================================

/// The stock semaphore state of a product.
///
/// Derived, never persisted: always recomputed from the live quantity and
/// threshold via [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    /// No units on hand.
    Agotado,
    /// At or below the minimum-stock threshold.
    Critico,
    /// Above the threshold but below twice the threshold.
    Bajo,
    /// At or above twice the threshold.
    Normal,
}

impl StockState {
    /// True for the states that appear on the daily closing's alert list.
    #[inline]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, StockState::Agotado | StockState::Critico)
    }
}

impl fmt::Display for StockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockState::Agotado => "AGOTADO",
            StockState::Critico => "CRITICO",
            StockState::Bajo => "BAJO",
            StockState::Normal => "NORMAL",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies a stock level into its semaphore state.
///
/// Pure and total: every (quantity, minimum) pair maps to exactly one state,
/// no side effects, no failure modes. Quantities below zero cannot occur in
/// the store (the inventory invariant rejects them) and are mapped to
/// `Agotado`.
///
/// ## Example
/// ```rust
/// use kiosco_core::stock::{classify, StockState};
///
/// assert_eq!(classify(10, 5), StockState::Normal);
/// assert_eq!(classify(6, 5), StockState::Bajo);
/// assert_eq!(classify(4, 5), StockState::Critico);
/// assert_eq!(classify(0, 5), StockState::Agotado);
/// ```
#[inline]
pub const fn classify(quantity: i64, minimum: i64) -> StockState {
    if quantity <= 0 {
        StockState::Agotado
    } else if quantity <= minimum {
        StockState::Critico
    } else if quantity < minimum * 2 {
        StockState::Bajo
    } else {
        StockState::Normal
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_is_agotado_for_any_minimum() {
        assert_eq!(classify(0, 0), StockState::Agotado);
        assert_eq!(classify(0, 5), StockState::Agotado);
        assert_eq!(classify(0, 1000), StockState::Agotado);
    }

    #[test]
    fn test_critico_band() {
        assert_eq!(classify(1, 5), StockState::Critico);
        assert_eq!(classify(5, 5), StockState::Critico);
    }

    #[test]
    fn test_bajo_band() {
        assert_eq!(classify(6, 5), StockState::Bajo);
        assert_eq!(classify(9, 5), StockState::Bajo);
    }

    #[test]
    fn test_normal_band() {
        // Exactly twice the threshold is already Normal.
        assert_eq!(classify(10, 5), StockState::Normal);
        assert_eq!(classify(500, 5), StockState::Normal);
    }

    #[test]
    fn test_zero_minimum_collapses_bands() {
        assert_eq!(classify(0, 0), StockState::Agotado);
        assert_eq!(classify(1, 0), StockState::Normal);
        assert_eq!(classify(100, 0), StockState::Normal);
    }

    #[test]
    fn test_needs_attention() {
        assert!(StockState::Agotado.needs_attention());
        assert!(StockState::Critico.needs_attention());
        assert!(!StockState::Bajo.needs_attention());
        assert!(!StockState::Normal.needs_attention());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(StockState::Agotado.to_string(), "AGOTADO");
        assert_eq!(StockState::Normal.to_string(), "NORMAL");
    }
}
