mod codec;
mod memory;
mod sqlite;

pub use codec::*;
pub use memory::*;
pub use sqlite::*;

use anyhow::Result;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Key holding the active transactions.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Key holding the archived transactions.
pub const ARCHIVED_TRANSACTIONS_KEY: &str = "archivedTransactions";

/// Opaque get/set of named byte blobs.
///
/// The ledger only needs this much from its storage medium. Errors are
/// reported as-is; callers decide whether they are fatal.
#[allow(async_fn_in_trait)]
pub trait Storage {
    /// Read the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete the blob stored under `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
