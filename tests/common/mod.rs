// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use tally::application::LedgerService;
use tally::storage::{MemoryStorage, SqliteStorage, Storage};
use tempfile::TempDir;

/// Tolerance for comparing floating-point balances
pub const EPSILON: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::init(&db_path(&temp_dir)).await?;
    Ok((service, temp_dir))
}

/// Reopen the database in `temp_dir`, as a restarted process would
pub async fn reopen(temp_dir: &TempDir) -> Result<LedgerService> {
    Ok(LedgerService::init(&db_path(temp_dir)).await?)
}

pub fn db_path(temp_dir: &TempDir) -> String {
    temp_dir.path().join("test.db").to_string_lossy().into_owned()
}

/// Helper to create a test service over in-memory storage
pub async fn memory_service() -> Result<LedgerService<MemoryStorage>> {
    Ok(LedgerService::load(MemoryStorage::new()).await?)
}

/// Storage that can be switched into a failing state
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        let storage = Self::default();
        storage.fail_reads.store(true, Ordering::SeqCst);
        storage
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

impl Storage for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("disk unplugged while reading '{}'", key);
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("disk full while writing '{}'", key);
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("disk full while deleting '{}'", key);
        }
        self.inner.remove(key).await
    }
}

/// Open a bare SQLite store in `temp_dir`
pub async fn sqlite_storage(temp_dir: &TempDir) -> Result<SqliteStorage> {
    SqliteStorage::init(&format!("sqlite:{}?mode=rwc", db_path(temp_dir))).await
}
