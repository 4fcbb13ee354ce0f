//! Per-collection CRUD over a [`Ledger`](crate::ledger::Ledger).
//!
//! Services are pure: they never touch storage and never read the clock.
//! The caller decides the id and instant for each mutation via [`RecordStamp`].

pub mod account_service;
pub mod category_service;
pub mod note_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use category_service::CategoryService;
pub use note_service::NoteService;
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;

use chrono::{DateTime, Utc};

use crate::domain::RecordId;

/// Identity and instant for a record being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordStamp {
    pub id: RecordId,
    pub at: DateTime<Utc>,
}
