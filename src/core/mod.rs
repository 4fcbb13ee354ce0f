pub mod ids;
pub mod ledger_store;
pub mod services;
pub mod time;
pub mod validation;

pub use ids::IdGenerator;
pub use ledger_store::{LedgerStore, StoreOptions, StoreWarning};
pub use time::{Clock, ManualClock, SystemClock};
