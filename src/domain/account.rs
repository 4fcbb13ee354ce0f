use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::*;

/// Where money is held ("Cash", "Bank Account", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: RecordId,
    #[serde(rename = "user_id", default)]
    pub owner: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAccount {
    pub owner: Option<UserId>,
    pub name: String,
    pub description: Option<String>,
}

impl NewAccount {
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

impl Account {
    pub fn from_draft(draft: NewAccount, id: RecordId, now: DateTime<Utc>) -> Self {
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

impl Identifiable for Account {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} #{}", self.name, self.id)
    }
}

impl Timestamped for Account {
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
