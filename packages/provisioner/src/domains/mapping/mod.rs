pub mod ledger;
pub mod models;

pub use ledger::{LedgerError, MappingLedger};
pub use models::{Collision, LedgerColumn, MappingRecord, LEDGER_HEADER};
