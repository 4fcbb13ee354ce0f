//! Local sign-in state. Nothing in the ledger depends on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::UserId;

/// Profile captured by the sign-up form. Credentials are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    #[serde(default)]
    pub guest: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.profile.is_some()
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        match &self.profile {
            Some(profile) => &profile.name,
            None if self.guest => "Guest",
            None => "Signed out",
        }
    }
}
