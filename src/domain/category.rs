//! Category records used to classify transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::*;

/// Groups transactions for reporting ("Food & Dining", "Salary", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: RecordId,
    #[serde(rename = "user_id", default)]
    pub owner: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a category that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCategory {
    pub owner: Option<UserId>,
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            owner: None,
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Category {
    /// Materializes a draft with the identity and timestamps chosen by the store.
    pub fn from_draft(draft: NewCategory, id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: draft.owner,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{} ({})", self.name, description)
            }
            _ => self.name.clone(),
        }
    }
}

impl Timestamped for Category {
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
