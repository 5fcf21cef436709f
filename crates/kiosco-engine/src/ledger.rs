//! # Cash-Drawer Ledger
//!
//! Append-only record of cash movements: sale income and withdrawals.
//!
//! ## Ordering
//! A single append lock serializes all writes; entry timestamps are assigned
//! under that lock, so the in-memory sequence (and the persisted one, which
//! is written before the append) is strictly chronological. Ledger writes
//! are independent of the inventory store - the two never hold each other's
//! locks.
//!
//! ## Drawer Cash
//! The drawer's available cash for a day is that day's income minus that
//! day's withdrawals; a withdrawal above it is refused. The check and the
//! append run under the same lock, so two concurrent withdrawals cannot both
//! pass against the same balance.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use kiosco_core::{CoreError, CoreResult, LedgerEntry, LedgerEntryKind, Money};

use crate::storage::Storage;

/// UTC bounds `[00:00 of day, 00:00 of next day)`.
pub(crate) fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

// =============================================================================
// Ledger
// =============================================================================

/// The append-only cash ledger.
pub struct Ledger {
    entries: Mutex<Vec<LedgerEntry>>,
    storage: Arc<dyn Storage>,
}

impl Ledger {
    /// Opens the ledger, loading every persisted entry.
    pub fn open(storage: Arc<dyn Storage>) -> CoreResult<Self> {
        let entries =
            storage.load_ledger_entries(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)?;

        info!(count = entries.len(), "Ledger opened");
        Ok(Ledger {
            entries: Mutex::new(entries),
            storage,
        })
    }

    /// Records the income of a committed sale.
    ///
    /// ## Errors
    /// - `InvalidAmount` - amount ≤ 0
    /// - `Storage` - the entry could not be persisted (nothing appended)
    pub fn record_sale_income(&self, amount: Money, sale_id: &str) -> CoreResult<LedgerEntry> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidAmount {
                operation: "record_sale_income",
                amount: amount.cents(),
            });
        }

        let mut entries = self.entries.lock();
        let entry = new_entry(
            LedgerEntryKind::SaleIncome,
            amount,
            Some(sale_id.to_string()),
            None,
        );

        self.storage.append_ledger_entry(&entry)?;
        entries.push(entry.clone());

        debug!(sale_id, amount = %amount, "Sale income recorded");
        Ok(entry)
    }

    /// Records a cash withdrawal from the drawer.
    ///
    /// ## Errors
    /// - `InvalidAmount` - amount ≤ 0
    /// - `InsufficientFunds` - amount exceeds the day's available cash
    /// - `Storage` - the entry could not be persisted (nothing appended)
    pub fn record_withdrawal(&self, amount: Money, concept: &str) -> CoreResult<LedgerEntry> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidAmount {
                operation: "record_withdrawal",
                amount: amount.cents(),
            });
        }

        let mut entries = self.entries.lock();

        // Balance check and append under the same lock.
        let now = Utc::now();
        let (start, end) = day_bounds(now.date_naive());
        let available = cash_between(&entries, start, end);
        if amount > available {
            return Err(CoreError::InsufficientFunds {
                available_cents: available.cents(),
                requested_cents: amount.cents(),
            });
        }

        let entry = new_entry(
            LedgerEntryKind::Withdrawal,
            amount,
            None,
            Some(concept.to_string()),
        );

        self.storage.append_ledger_entry(&entry)?;
        entries.push(entry.clone());

        info!(concept, amount = %amount, "Withdrawal recorded");
        Ok(entry)
    }

    /// Entries with timestamp in `[start, end)`, in chronological order.
    pub fn entries_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<LedgerEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp < end)
            .cloned()
            .collect()
    }

    /// Sum of sale income in `[start, end)`.
    pub fn income_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
        self.sum_between(start, end, LedgerEntryKind::SaleIncome)
    }

    /// Sum of withdrawals in `[start, end)`.
    pub fn withdrawals_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
        self.sum_between(start, end, LedgerEntryKind::Withdrawal)
    }

    /// The drawer's available cash for a day: income − withdrawals.
    pub fn cash_available(&self, day: NaiveDate) -> Money {
        let (start, end) = day_bounds(day);
        cash_between(&self.entries.lock(), start, end)
    }

    /// Total number of entries ever recorded.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn sum_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: LedgerEntryKind,
    ) -> Money {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.kind == kind && e.timestamp >= start && e.timestamp < end)
            .map(LedgerEntry::amount)
            .sum()
    }
}

/// Builds a fresh entry with a generated id and the current timestamp.
fn new_entry(
    kind: LedgerEntryKind,
    amount: Money,
    sale_id: Option<String>,
    concept: Option<String>,
) -> LedgerEntry {
    LedgerEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        kind,
        amount_cents: amount.cents(),
        sale_id,
        concept,
    }
}

/// Income minus withdrawals over `[start, end)` for an entry slice.
fn cash_between(entries: &[LedgerEntry], start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
    entries
        .iter()
        .filter(|e| e.timestamp >= start && e.timestamp < end)
        .fold(Money::zero(), |acc, e| match e.kind {
            LedgerEntryKind::SaleIncome => acc + e.amount(),
            LedgerEntryKind::Withdrawal => acc - e.amount(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ledger() -> Ledger {
        Ledger::open(Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn test_record_sale_income() {
        let ledger = ledger();
        let entry = ledger
            .record_sale_income(Money::from_cents(5000), "sale-1")
            .unwrap();

        assert_eq!(entry.kind, LedgerEntryKind::SaleIncome);
        assert_eq!(entry.amount_cents, 5000);
        assert_eq!(entry.sale_id.as_deref(), Some("sale-1"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_record_rejects_non_positive_amounts() {
        let ledger = ledger();

        assert!(matches!(
            ledger.record_sale_income(Money::zero(), "sale-1"),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(matches!(
            ledger.record_withdrawal(Money::from_cents(-100), "cambio"),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_withdrawal_requires_available_cash() {
        let ledger = ledger();
        ledger
            .record_sale_income(Money::from_cents(10_000), "sale-1")
            .unwrap();

        ledger
            .record_withdrawal(Money::from_cents(4_000), "proveedor")
            .unwrap();

        // 6,000 left; 7,000 must be refused.
        let err = ledger
            .record_withdrawal(Money::from_cents(7_000), "proveedor")
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientFunds {
                available_cents: 6_000,
                requested_cents: 7_000,
            }
        ));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_entries_between_half_open_range() {
        let ledger = ledger();
        ledger
            .record_sale_income(Money::from_cents(1000), "sale-1")
            .unwrap();
        // Separate the two timestamps so the exclusive-end assertion below
        // cannot collide with clock granularity.
        std::thread::sleep(std::time::Duration::from_millis(2));
        ledger
            .record_sale_income(Money::from_cents(2000), "sale-2")
            .unwrap();

        let all = ledger.entries_between(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC);
        assert_eq!(all.len(), 2);
        assert!(all[0].timestamp < all[1].timestamp);

        // End bound is exclusive: a range ending exactly at the second
        // entry's timestamp must not contain it.
        let up_to_second = ledger.entries_between(DateTime::<Utc>::MIN_UTC, all[1].timestamp);
        assert_eq!(up_to_second.len(), 1);
        assert_eq!(up_to_second[0].id, all[0].id);
    }

    #[test]
    fn test_daily_aggregation() {
        let ledger = ledger();
        ledger
            .record_sale_income(Money::from_cents(8000), "sale-1")
            .unwrap();
        ledger
            .record_sale_income(Money::from_cents(2000), "sale-2")
            .unwrap();
        ledger
            .record_withdrawal(Money::from_cents(3000), "cambio")
            .unwrap();

        let today = Utc::now().date_naive();
        let (start, end) = day_bounds(today);
        assert_eq!(ledger.income_between(start, end).cents(), 10_000);
        assert_eq!(ledger.withdrawals_between(start, end).cents(), 3_000);
        assert_eq!(ledger.cash_available(today).cents(), 7_000);
    }

    #[test]
    fn test_open_reloads_persisted_entries() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let ledger = Ledger::open(Arc::clone(&storage) as Arc<dyn Storage>).unwrap();
            ledger
                .record_sale_income(Money::from_cents(1000), "sale-1")
                .unwrap();
        }

        let reopened = Ledger::open(storage).unwrap();
        assert_eq!(reopened.len(), 1);
    }
}
