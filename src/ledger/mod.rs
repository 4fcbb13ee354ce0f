//! Ledger state, collection helpers and derived statistics.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod records;
pub mod stats;

pub use ledger::Ledger;
pub use records::{remove_record, replace_record};
pub use stats::LedgerStats;
