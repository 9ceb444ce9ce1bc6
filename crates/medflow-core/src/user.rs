//! Snapshot of the signed-in account.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Immutable snapshot of the authenticated account, taken at login time.
///
/// Field names follow the backend's user profile serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Backend account identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address, when the backend exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Account role.
    #[serde(rename = "user_type", default)]
    pub role: Role,
}

impl UserSummary {
    /// Creates a summary with the required fields only.
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            role,
        }
    }

    /// Sets the given and family names.
    #[must_use]
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Name to show in the UI: "first last", or the username when both are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}
