//! Figures derived from the transaction collection. Always recomputed, never stored.

use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionFilter, TransactionKind};

/// Income, expense and balance totals for a set of transactions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerStats {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
    pub transaction_count: usize,
}

impl LedgerStats {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut stats = Self::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => stats.income_total += txn.amount,
                TransactionKind::Expense => stats.expense_total += txn.amount,
            }
            stats.transaction_count += 1;
        }
        stats.balance = stats.income_total - stats.expense_total;
        stats
    }
}

/// Transactions matching `filter`, newest `created_at` first; ties keep insertion order.
pub fn sorted_newest_first(
    transactions: &[Transaction],
    filter: TransactionFilter,
) -> Vec<&Transaction> {
    let mut selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|txn| filter.matches(txn))
        .collect();
    // sort_by is stable, which is what keeps equal timestamps in insertion order.
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

/// The `limit` most recently created transactions.
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut newest = sorted_newest_first(transactions, TransactionFilter::All);
    newest.truncate(limit);
    newest
}
