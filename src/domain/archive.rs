use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{Amount, Transaction, TransactionId, sorted_by_date_desc, total_balance};

/// Transactions that have been batch-closed out of the ledger.
/// Every entry carries `archived_at`.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<Transaction>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an archive from persisted records. Records without an archive
    /// stamp cannot belong here and are dropped.
    pub fn from_entries(entries: Vec<Transaction>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|t| {
                if t.archived_at.is_none() {
                    warn!(id = %t.id, "archived transaction without archive stamp, dropped");
                    return false;
                }
                true
            })
            .collect();
        Self { entries }
    }

    /// Append a batch, stamping each entry with `archived_at`. Other fields are
    /// kept as-is. An empty batch is a no-op. Ids already archived are skipped.
    pub fn receive(&mut self, transactions: Vec<Transaction>, archived_at: DateTime<Utc>) {
        if transactions.is_empty() {
            return;
        }

        let mut seen: HashSet<TransactionId> =
            self.entries.iter().map(|t| t.id.clone()).collect();

        for mut transaction in transactions {
            if !seen.insert(transaction.id.clone()) {
                warn!(id = %transaction.id, "transaction already archived, skipped");
                continue;
            }
            transaction.archived_at = Some(archived_at);
            self.entries.push(transaction);
        }
    }

    /// Entries, most recent first (by creation time).
    pub fn list(&self) -> Vec<Transaction> {
        sorted_by_date_desc(&self.entries)
    }

    pub fn total_balance(&self) -> Amount {
        total_balance(&self.entries)
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

    pub(crate) fn entries(&self) -> &[Transaction] {
        &self.entries
    }
}
