//! Session entities.

use serde::Deserialize;

use super::user::Activity;

/// The result of a username/password session exchange.
///
/// Carries the private token that authenticates subsequent requests,
/// together with the core fields of the user the session belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// User ID of the session owner.
    pub id: u64,
    /// Username of the session owner.
    pub username: String,
    /// Email address of the session owner.
    pub email: String,
    /// Display name of the session owner.
    pub name: String,
    /// The private token established by the exchange.
    pub private_token: String,
    #[serde(flatten)]
    activity: Activity,
}

impl Session {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_session_payload() {
        let json = r#"{
            "id": 1,
            "username": "bob",
            "email": "bob@x.com",
            "name": "Bob",
            "private_token": "abc123",
            "blocked": false
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, 1);
        assert_eq!(session.username, "bob");
        assert_eq!(session.email, "bob@x.com");
        assert_eq!(session.name, "Bob");
        assert_eq!(session.private_token, "abc123");
        assert!(!session.is_blocked());
    }

    #[test]
    fn missing_private_token_fails_to_decode() {
        let json = r#"{
            "id": 1,
            "username": "bob",
            "email": "bob@x.com",
            "name": "Bob",
            "blocked": false
        }"#;
        assert!(serde_json::from_str::<Session>(json).is_err());
    }

    #[test]
    fn state_encoding_also_works_for_sessions() {
        let json = r#"{
            "id": 1,
            "username": "bob",
            "email": "bob@x.com",
            "name": "Bob",
            "private_token": "abc123",
            "state": "blocked"
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.is_blocked());
    }
}
