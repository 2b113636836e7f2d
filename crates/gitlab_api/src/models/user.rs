//! User entities.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Whether an account is active, as the API encodes it.
///
/// Older servers report a `blocked` boolean, newer ones a `state` string;
/// only `"active"` counts as active. Entity construction fails when a
/// payload carries neither encoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    State { state: String },
    Blocked { blocked: bool },
}

impl Activity {
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Activity::State { state } => state == "active",
            Activity::Blocked { blocked } => !blocked,
        }
    }
}

/// A GitLab user.
///
/// All fields except `is_admin` are required; a payload missing any of them
/// fails to decode rather than defaulting.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// When the account was created (UTC).
    pub created_at: DateTime<Utc>,
    /// Whether the account is an administrator, when the server reports it.
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(flatten)]
    activity: Activity,
}

impl User {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.is_active()
    }
}
