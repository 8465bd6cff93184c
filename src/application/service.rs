use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{Amount, Archive, Ledger, Transaction, TransactionId, parse_amount};
use crate::storage::{
    ARCHIVED_TRANSACTIONS_KEY, SqliteStorage, Storage, TRANSACTIONS_KEY, decode_transactions,
    encode_transactions,
};

use super::AppError;

/// Application service owning the ledger, the archive and their storage.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every mutation is applied in memory first and then written through to
/// storage before returning. If the write fails the error is returned and the
/// in-memory state keeps the mutation.
pub struct LedgerService<S = SqliteStorage> {
    storage: S,
    ledger: Ledger,
    archive: Archive,
}

/// Result of moving the ledger into the archive
#[derive(Debug, Clone)]
pub struct ArchiveResult {
    /// Entries moved, as they now appear in the archive
    pub moved: Vec<Transaction>,
    /// Stamp applied to the batch; `None` when there was nothing to move
    pub archived_at: Option<DateTime<Utc>>,
}

/// Counts and balances for both partitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    pub active_count: usize,
    pub archived_count: usize,
    pub current_balance: Amount,
    pub archived_balance: Amount,
}

impl LedgerService<SqliteStorage> {
    /// Open (creating if needed) the database at the given path and load it.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let storage = SqliteStorage::init(&db_url).await?;
        Self::load(storage).await
    }
}

impl<S: Storage> LedgerService<S> {
    /// Build the service from whatever the storage currently holds.
    ///
    /// Missing or unparsable collections load as empty. An id present in both
    /// collections is kept in the archive only.
    pub async fn load(storage: S) -> Result<Self, AppError> {
        let active = storage.get(TRANSACTIONS_KEY).await?;
        let archived = storage.get(ARCHIVED_TRANSACTIONS_KEY).await?;

        let archive = Archive::from_entries(dedup(decode_transactions(
            ARCHIVED_TRANSACTIONS_KEY,
            archived.as_deref(),
        )));

        let mut seen: HashSet<TransactionId> =
            archive.entries().iter().map(|t| t.id.clone()).collect();
        let active = decode_transactions(TRANSACTIONS_KEY, active.as_deref())
            .into_iter()
            .filter(|t| {
                if seen.insert(t.id.clone()) {
                    return true;
                }
                warn!(id = %t.id, "duplicate transaction id in ledger, dropped");
                false
            })
            .collect();
        let ledger = Ledger::from_entries(active);

        info!(
            active = ledger.len(),
            archived = archive.len(),
            "ledger loaded"
        );

        Ok(Self {
            storage,
            ledger,
            archive,
        })
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new transaction and persist.
    pub async fn add_transaction(
        &mut self,
        amount: Amount,
        whom: impl Into<String>,
    ) -> Result<Transaction, AppError> {
        let transaction = self.ledger.add(amount, whom)?;
        info!(id = %transaction.id, amount, "transaction added");

        self.persist().await?;
        Ok(transaction)
    }

    /// Record a new transaction from free-text input (e.g. "50.00", "-20").
    pub async fn add_transaction_input(
        &mut self,
        amount: &str,
        whom: impl Into<String>,
    ) -> Result<Transaction, AppError> {
        let amount = parse_amount(amount)?;
        self.add_transaction(amount, whom).await
    }

    /// Remove an active transaction. Returns false if the id was not found.
    /// Storage is rewritten either way so it stays authoritative.
    pub async fn remove_transaction(&mut self, id: &TransactionId) -> Result<bool, AppError> {
        let removed = self.ledger.remove(id);
        if removed {
            info!(%id, "transaction removed");
        } else {
            debug!(%id, "transaction to remove not found");
        }

        self.persist().await?;
        Ok(removed)
    }

    /// Move every active transaction into the archive under a single stamp.
    /// With an empty ledger this does nothing.
    pub async fn archive_all(&mut self) -> Result<ArchiveResult, AppError> {
        if self.ledger.is_empty() {
            debug!("nothing to archive");
            return Ok(ArchiveResult {
                moved: Vec::new(),
                archived_at: None,
            });
        }

        let now = Utc::now();
        let moved = self.ledger.drain_all();
        let ids: Vec<TransactionId> = moved.iter().map(|t| t.id.clone()).collect();
        self.archive.receive(moved, now);
        info!(count = ids.len(), archived_at = %now, "ledger archived");

        self.persist().await?;

        let moved = ids
            .iter()
            .filter_map(|id| self.archive.get(id).cloned())
            .collect();
        Ok(ArchiveResult {
            moved,
            archived_at: Some(now),
        })
    }

    /// Clear the ledger and the archive and erase their persisted copies.
    /// Irreversible; confirming with the user is the caller's job.
    pub async fn reset_everything(&mut self) -> Result<(), AppError> {
        self.ledger.clear();
        self.archive.clear();
        warn!("ledger and archive reset");

        self.storage.remove(TRANSACTIONS_KEY).await?;
        self.storage.remove(ARCHIVED_TRANSACTIONS_KEY).await?;
        Ok(())
    }

    async fn persist(&self) -> Result<(), AppError> {
        let active = encode_transactions(self.ledger.entries())?;
        let archived = encode_transactions(self.archive.entries())?;

        self.storage.set(TRANSACTIONS_KEY, &active).await?;
        self.storage.set(ARCHIVED_TRANSACTIONS_KEY, &archived).await?;
        debug!(
            active = self.ledger.len(),
            archived = self.archive.len(),
            "state persisted"
        );
        Ok(())
    }

    // ========================
    // Views
    // ========================

    /// Active transactions, most recent first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.ledger.list()
    }

    /// Archived transactions, most recent first.
    pub fn archived_transactions(&self) -> Vec<Transaction> {
        self.archive.list()
    }

    pub fn current_balance(&self) -> Amount {
        self.ledger.total_balance()
    }

    pub fn archived_balance(&self) -> Amount {
        self.archive.total_balance()
    }

    /// Whether `archive_all` would move anything.
    pub fn can_archive(&self) -> bool {
        !self.ledger.is_empty()
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            active_count: self.ledger.len(),
            archived_count: self.archive.len(),
            current_balance: self.current_balance(),
            archived_balance: self.archived_balance(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, e.g. to reload it into a fresh service.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Keep the first occurrence of each id.
fn dedup(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|t| {
            if seen.insert(t.id.clone()) {
                return true;
            }
            warn!(id = %t.id, "duplicate transaction id in archive, dropped");
            false
        })
        .collect()
}
