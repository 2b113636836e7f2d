//! Group and group membership entities.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::access_level::AccessLevel;

/// A GitLab group.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    /// Group ID.
    pub id: u64,
    /// Full group name.
    pub name: String,
    /// Group path.
    pub path: String,
}

/// A member of a group.
///
/// The wire payload carries the user fields, the access level and the
/// account state; the group ID is supplied by the caller because the
/// membership listing does not repeat it per element.
#[derive(Debug, Clone)]
pub struct GroupMember {
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
    /// The member's role within the group.
    pub access_level: AccessLevel,
    /// The group the membership belongs to.
    pub group_id: u64,
    active: bool,
}

/// Wire shape of one element of a group membership listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GroupMemberPayload {
    id: u64,
    username: String,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    access_level: AccessLevel,
    state: String,
}

impl GroupMember {
    pub(crate) fn from_payload(payload: GroupMemberPayload, group_id: u64) -> Self {
        Self {
            id: payload.id,
            username: payload.username,
            email: payload.email,
            name: payload.name,
            created_at: payload.created_at,
            access_level: payload.access_level,
            group_id,
            active: payload.state == "active",
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.active
    }
}
