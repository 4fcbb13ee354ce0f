//! Pure record types: categories, accounts, transactions, notes and session state.
//! No I/O and no storage concerns live here.

pub mod account;
pub mod category;
pub mod common;
pub mod note;
pub mod session;
pub mod transaction;

pub use account::{Account, NewAccount};
pub use category::{Category, NewCategory};
pub use common::*;
pub use note::{NewNote, Note};
pub use session::{SessionState, UserProfile};
pub use transaction::{NewTransaction, Transaction, TransactionFilter, TransactionKind};
