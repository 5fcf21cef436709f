//! # Daily Closing
//!
//! The end-of-day report: cash totals from the ledger plus the stock alert
//! list from the inventory store. Pure aggregation - producing a summary
//! changes nothing.

use chrono::NaiveDate;
use tracing::info;

use kiosco_core::{ClosingSummary, CoreResult, LedgerEntryKind, Money};

use crate::inventory::InventoryStore;
use crate::ledger::{day_bounds, Ledger};

/// Builds closing summaries from the shared ledger and inventory.
pub struct DailyClosing<'a> {
    ledger: &'a Ledger,
    inventory: &'a InventoryStore,
}

impl<'a> DailyClosing<'a> {
    pub fn new(ledger: &'a Ledger, inventory: &'a InventoryStore) -> Self {
        DailyClosing { ledger, inventory }
    }

    /// Summarizes one day: total income, total withdrawals, net cash flow,
    /// sale count, and every active product currently Critico or Agotado.
    ///
    /// Errors from the underlying reads propagate unchanged; nothing is
    /// swallowed or defaulted.
    pub fn summarize(&self, day: NaiveDate) -> CoreResult<ClosingSummary> {
        let (start, end) = day_bounds(day);

        let mut total_income = Money::zero();
        let mut total_withdrawals = Money::zero();
        let mut sale_count = 0usize;

        for entry in self.ledger.entries_between(start, end) {
            match entry.kind {
                LedgerEntryKind::SaleIncome => {
                    total_income += entry.amount();
                    sale_count += 1;
                }
                LedgerEntryKind::Withdrawal => total_withdrawals += entry.amount(),
            }
        }

        let low_stock = self.inventory.stock_alerts();

        let summary = ClosingSummary {
            day,
            total_income_cents: total_income.cents(),
            total_withdrawals_cents: total_withdrawals.cents(),
            net_cash_flow_cents: (total_income - total_withdrawals).cents(),
            sale_count,
            low_stock,
        };

        info!(
            day = %day,
            income = %total_income,
            withdrawals = %total_withdrawals,
            sales = summary.sale_count,
            alerts = summary.low_stock.len(),
            "Daily closing summarized"
        );
        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use chrono::Utc;
    use kiosco_core::{Product, StockState};
    use std::sync::Arc;

    #[test]
    fn test_summarize_aggregates_day() {
        let storage = Arc::new(MemoryStorage::new());
        let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
        let ledger = Ledger::open(storage).unwrap();

        let low = inventory
            .register(Product::new("BEB001", "Coca-Cola 600ml", 2500, 2, 10))
            .unwrap();
        inventory
            .register(Product::new("SNA001", "Lays 60g", 2000, 75, 15))
            .unwrap();

        ledger
            .record_sale_income(Money::from_cents(7500), "sale-1")
            .unwrap();
        ledger
            .record_sale_income(Money::from_cents(2500), "sale-2")
            .unwrap();
        ledger
            .record_withdrawal(Money::from_cents(3000), "proveedor")
            .unwrap();

        let summary = DailyClosing::new(&ledger, &inventory)
            .summarize(Utc::now().date_naive())
            .unwrap();

        assert_eq!(summary.total_income_cents, 10_000);
        assert_eq!(summary.total_withdrawals_cents, 3_000);
        assert_eq!(summary.net_cash_flow_cents, 7_000);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock[0].product_id, low.id);
        assert_eq!(summary.low_stock[0].state, StockState::Critico);
    }

    #[test]
    fn test_summarize_empty_day() {
        let storage = Arc::new(MemoryStorage::new());
        let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
        let ledger = Ledger::open(storage).unwrap();

        let summary = DailyClosing::new(&ledger, &inventory)
            .summarize(Utc::now().date_naive())
            .unwrap();

        assert_eq!(summary.total_income_cents, 0);
        assert_eq!(summary.sale_count, 0);
        assert!(summary.low_stock.is_empty());
    }

    #[test]
    fn test_summary_serializes_for_export() {
        let storage = Arc::new(MemoryStorage::new());
        let inventory = InventoryStore::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
        let ledger = Ledger::open(storage).unwrap();

        let summary = DailyClosing::new(&ledger, &inventory)
            .summarize(Utc::now().date_naive())
            .unwrap();

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"sale_count\":0"));
    }
}
