// Application layer - orchestration of the ledger, the archive and storage.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
