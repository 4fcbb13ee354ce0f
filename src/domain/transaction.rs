//! Domain models for money moving in or out of an account.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "user_id", default)]
    pub owner: Option<UserId>,
    pub category_id: RecordId,
    pub account_id: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "amount_serde")]
    pub amount: f64,
    /// Marks a recurring transaction. Stored for the UI, never expanded into occurrences.
    #[serde(default)]
    pub is_recursive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub owner: Option<UserId>,
    pub category_id: RecordId,
    pub account_id: RecordId,
    pub kind: TransactionKind,
    pub amount: f64,
    pub is_recursive: bool,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category_id: RecordId,
        account_id: RecordId,
    ) -> Self {
        Self {
            owner: None,
            category_id,
            account_id,
            kind,
            amount,
            is_recursive: false,
        }
    }

    pub fn income(amount: f64, category_id: RecordId, account_id: RecordId) -> Self {
        Self::new(TransactionKind::Income, amount, category_id, account_id)
    }

    pub fn expense(amount: f64, category_id: RecordId, account_id: RecordId) -> Self {
        Self::new(TransactionKind::Expense, amount, category_id, account_id)
    }

    pub fn recurring(mut self) -> Self {
        self.is_recursive = true;
        self
    }
}

impl Transaction {
    pub fn from_draft(draft: NewTransaction, id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: draft.owner,
            category_id: draft.category_id,
            account_id: draft.account_id,
            kind: draft.kind,
            amount: draft.amount,
            is_recursive: draft.is_recursive,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{}] {:.2}", self.id, self.kind, self.amount)
    }
}

impl Timestamped for Transaction {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn restamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

/// Direction of a transaction relative to the user's balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(format!(
                "unknown transaction type `{other}` (expected income or expense)"
            )),
        }
    }
}

/// Narrows a transaction listing, mirroring the All / Income / Expense tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TransactionFilter {
    pub fn matches(self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => transaction.is_income(),
            TransactionFilter::Expense => transaction.is_expense(),
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TransactionFilter::All),
            other => other.parse::<TransactionKind>().map(TransactionFilter::from),
        }
    }
}

impl From<TransactionKind> for TransactionFilter {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => TransactionFilter::Income,
            TransactionKind::Expense => TransactionFilter::Expense,
        }
    }
}
