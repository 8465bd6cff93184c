mod archive;
mod identifier;
mod ledger;
mod money;
mod transaction;

pub use archive::*;
pub use identifier::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
