use thiserror::Error;

use crate::domain::{LedgerError, ParseAmountError};

#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected before any mutation; state is unchanged.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The storage medium failed. A mutation that was being persisted has
    /// already been applied in memory but is not confirmed on disk.
    #[error("Storage unavailable: {0:#}")]
    StorageUnavailable(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(_) => AppError::InvalidAmount(err.to_string()),
        }
    }
}

impl From<ParseAmountError> for AppError {
    fn from(err: ParseAmountError) -> Self {
        AppError::InvalidAmount(err.to_string())
    }
}
