use chrono::{DateTime, Utc};
use tracing::warn;

use super::{
    Amount, Transaction, TransactionId, is_valid_amount, sorted_by_date_desc, total_balance,
};

/// The active (unarchived) transactions.
///
/// Entries are kept in insertion order; presentation order is applied by `list()`.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted records. Active entries never carry
    /// `archived_at`; a stray stamp is dropped.
    pub fn from_entries(entries: Vec<Transaction>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut t| {
                if t.archived_at.take().is_some() {
                    warn!(id = %t.id, "active transaction carried an archive stamp, cleared");
                }
                t
            })
            .collect();
        Self { entries }
    }

    /// Record a new entry stamped with the current time.
    pub fn add(&mut self, amount: Amount, whom: impl Into<String>) -> Result<Transaction, LedgerError> {
        self.add_at(amount, whom, Utc::now())
    }

    /// Record a new entry with an explicit creation time.
    pub fn add_at(
        &mut self,
        amount: Amount,
        whom: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        if !is_valid_amount(amount) {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let transaction = Transaction::new(amount, whom, created_at);
        self.entries.push(transaction.clone());
        Ok(transaction)
    }

    /// Remove the entry with the given id. Returns false if nothing matched.
    pub fn remove(&mut self, id: &TransactionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| &t.id != id);
        self.entries.len() != before
    }

    /// Entries, most recent first.
    pub fn list(&self) -> Vec<Transaction> {
        sorted_by_date_desc(&self.entries)
    }

    pub fn total_balance(&self) -> Amount {
        total_balance(&self.entries)
    }

    /// Remove and return every entry, in insertion order.
    pub fn drain_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.entries)
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.entries.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in storage (insertion) order, as persisted.
    pub(crate) fn entries(&self) -> &[Transaction] {
        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    InvalidAmount(Amount),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InvalidAmount(amount) => {
                write!(f, "amount must be a finite nonzero number, got {}", amount)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_add_appends_entry() {
        let mut ledger = Ledger::new();
        let tx = ledger.add(50.0, "Alice").unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(tx.amount, 50.0);
        assert_eq!(tx.whom, "Alice");
        assert!(tx.archived_at.is_none());
        assert!(tx.id.is_v4_shaped());
        assert_eq!(ledger.get(&tx.id), Some(&tx));
    }

    #[test]
    fn test_add_rejects_invalid_amounts() {
        let mut ledger = Ledger::new();

        for amount in [0.0, -0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ledger.add(amount, "Nobody"),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_accepts_empty_counterparty() {
        let mut ledger = Ledger::new();
        let tx = ledger.add(-3.5, "").unwrap();
        assert_eq!(tx.whom, "");
    }

    #[test]
    fn test_remove() {
        let mut ledger = Ledger::new();
        let keep = ledger.add(10.0, "keep").unwrap();
        let drop = ledger.add(20.0, "drop").unwrap();

        assert!(ledger.remove(&drop.id));
        assert!(!ledger.contains(&drop.id));
        assert!(ledger.contains(&keep.id));
        assert_eq!(ledger.total_balance(), 10.0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut ledger = Ledger::new();
        ledger.add(10.0, "Alice").unwrap();

        assert!(!ledger.remove(&TransactionId::from("missing")));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_balance(), 10.0);
    }

    #[test]
    fn test_list_most_recent_first() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut ledger = Ledger::new();
        ledger.add_at(1.0, "oldest", base).unwrap();
        ledger.add_at(2.0, "newest", base + Duration::hours(2)).unwrap();
        ledger.add_at(3.0, "middle", base + Duration::hours(1)).unwrap();

        let whoms: Vec<_> = ledger.list().into_iter().map(|t| t.whom).collect();
        assert_eq!(whoms, vec!["newest", "middle", "oldest"]);

        // Storage order is untouched by listing
        assert_eq!(ledger.entries()[0].whom, "oldest");
    }

    #[test]
    fn test_total_balance() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.total_balance(), 0.0);

        ledger.add(50.0, "Alice").unwrap();
        ledger.add(-20.0, "Bob").unwrap();
        assert!((ledger.total_balance() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_drain_all_empties_ledger() {
        let mut ledger = Ledger::new();
        let a = ledger.add(1.0, "a").unwrap();
        let b = ledger.add(2.0, "b").unwrap();

        let drained = ledger.drain_all();
        assert_eq!(drained, vec![a, b]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_balance(), 0.0);
    }

    #[test]
    fn test_from_entries_clears_archive_stamp() {
        let mut tx = Transaction::new(5.0, "x", Utc::now());
        tx.archived_at = Some(Utc::now());

        let ledger = Ledger::from_entries(vec![tx]);
        assert!(ledger.list().iter().all(|t| !t.is_archived()));
    }
}
