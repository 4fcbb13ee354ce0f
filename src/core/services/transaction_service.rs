//! CRUD helpers for ledger transactions.

use chrono::{DateTime, Utc};

use crate::domain::{NewTransaction, RecordId, Transaction};
use crate::ledger::{remove_record, replace_record, Ledger};

use super::RecordStamp;

pub struct TransactionService;

impl TransactionService {
    /// Appends a transaction. Category and account ids are stored as given.
    pub fn add(ledger: &mut Ledger, draft: NewTransaction, stamp: RecordStamp) -> Transaction {
        let transaction = Transaction::from_draft(draft, stamp.id, stamp.at);
        ledger.transactions.push(transaction.clone());
        transaction
    }

    pub fn update(
        ledger: &mut Ledger,
        transaction: Transaction,
        now: DateTime<Utc>,
    ) -> Option<Transaction> {
        replace_record(&mut ledger.transactions, transaction, now).cloned()
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> Option<Transaction> {
        remove_record(&mut ledger.transactions, id)
    }

    pub fn list(ledger: &Ledger) -> &[Transaction] {
        &ledger.transactions
    }
}
