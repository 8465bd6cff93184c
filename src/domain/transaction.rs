use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, TransactionId};

/// A single signed monetary entry.
///
/// Serialized as `{ id, amount, whom, date, archivedAt? }`, the layout both
/// persisted collections use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    /// Signed amount, never zero
    pub amount: Amount,
    /// Counterparty label, may be empty
    #[serde(default)]
    pub whom: String,
    /// When the entry was recorded
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    /// Set once, when the entry is moved into the archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a fresh, unarchived entry. Amount validation belongs to the ledger.
    pub(crate) fn new(amount: Amount, whom: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::generate(),
            amount,
            whom: whom.into(),
            created_at,
            archived_at: None,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

/// Sum of amounts over a collection; 0 when empty.
pub fn total_balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Amount {
    transactions.into_iter().fold(0.0, |acc, t| acc + t.amount)
}

/// Order entries most recent first. The sort is stable, so entries sharing a
/// timestamp keep their insertion order.
pub(crate) fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}
