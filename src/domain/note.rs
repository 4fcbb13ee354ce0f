use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::*;

/// Free-form note kept alongside the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: RecordId,
    #[serde(rename = "user_id", default)]
    pub owner: Option<UserId>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Trashed notes stay in the document but are hidden from listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNote {
    pub owner: Option<UserId>,
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            owner: None,
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Note {
    pub fn from_draft(draft: NewNote, id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: draft.owner,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Identifiable for Note {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Note {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for Note {
    fn display_label(&self) -> String {
        const PREVIEW_CHARS: usize = 40;
        let mut preview: String = self.content.chars().take(PREVIEW_CHARS).collect();
        if self.content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        format!("{}: {}", self.title, preview)
    }
}

impl Timestamped for Note {
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
