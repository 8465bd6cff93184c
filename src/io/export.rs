use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::Transaction;
use crate::storage::Storage;

/// Snapshot format version
pub const SNAPSHOT_VERSION: &str = "1";

/// Full state snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub archived_transactions: Vec<Transaction>,
}

/// Exporter for writing the ledger and the archive to various formats
pub struct Exporter<'a, S: Storage> {
    service: &'a LedgerService<S>,
}

impl<'a, S: Storage> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export both partitions to CSV, active entries first.
    /// Returns the number of rows written (header excluded).
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "amount", "whom", "date", "archived_at", "status"])?;

        let rows = self
            .service
            .transactions()
            .into_iter()
            .chain(self.service.archived_transactions());

        let mut count = 0;
        for transaction in rows {
            let status = if transaction.is_archived() {
                "archived"
            } else {
                "active"
            };
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.amount.to_string(),
                transaction.whom.clone(),
                transaction.created_at.to_rfc3339(),
                transaction
                    .archived_at
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default(),
                status.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Build a snapshot of the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: Utc::now(),
            transactions: self.service.transactions(),
            archived_transactions: self.service.archived_transactions(),
        }
    }

    /// Export a full snapshot as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(())
    }
}
