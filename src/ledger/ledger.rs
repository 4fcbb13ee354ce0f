use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, Category, Identifiable, NamedEntity, Note, RecordId, Transaction, UNKNOWN_LABEL,
};

/// In-memory state of one ledger: the four record collections, in insertion order.
///
/// Field order is the order collections appear in the persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Total number of records across all collections, trashed notes included.
    pub fn record_count(&self) -> usize {
        self.transactions.len() + self.categories.len() + self.accounts.len() + self.notes.len()
    }

    pub fn category(&self, id: RecordId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn account(&self, id: RecordId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn transaction(&self, id: RecordId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn note(&self, id: RecordId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Category name for display, or [`UNKNOWN_LABEL`] when the reference dangles or
    /// the name is empty.
    pub fn category_name(&self, id: RecordId) -> &str {
        self.category(id)
            .map(NamedEntity::name)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Account name for display, or [`UNKNOWN_LABEL`] when the reference dangles or
    /// the name is empty.
    pub fn account_name(&self, id: RecordId) -> &str {
        self.account(id)
            .map(NamedEntity::name)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Highest id present in any collection.
    pub fn max_record_id(&self) -> Option<RecordId> {
        self.record_ids().max()
    }

    pub fn min_record_id(&self) -> Option<RecordId> {
        self.record_ids().min()
    }

    fn record_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.transactions
            .iter()
            .map(Identifiable::id)
            .chain(self.categories.iter().map(Identifiable::id))
            .chain(self.accounts.iter().map(Identifiable::id))
            .chain(self.notes.iter().map(Identifiable::id))
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.categories.clear();
        self.accounts.clear();
        self.notes.clear();
    }

    /// Detects transactions whose category or account no longer exists.
    pub fn reference_warnings(&self) -> Vec<String> {
        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();
        let mut warnings = Vec::new();

        for txn in &self.transactions {
            if !category_ids.contains(&txn.category_id) {
                warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, txn.category_id
                ));
            }
            if !account_ids.contains(&txn.account_id) {
                warnings.push(format!(
                    "transaction {} references missing account {}",
                    txn.id, txn.account_id
                ));
            }
        }
        warnings
    }
}
