use crate::domain::{Transaction, TransactionFilter};
use crate::ledger::{stats, Ledger, LedgerStats};

pub struct SummaryService;

impl SummaryService {
    pub fn totals(ledger: &Ledger) -> LedgerStats {
        LedgerStats::from_transactions(&ledger.transactions)
    }

    pub fn recent(ledger: &Ledger, limit: usize) -> Vec<&Transaction> {
        stats::recent(&ledger.transactions, limit)
    }

    pub fn by_kind(ledger: &Ledger, filter: TransactionFilter) -> Vec<&Transaction> {
        stats::sorted_newest_first(&ledger.transactions, filter)
    }
}
