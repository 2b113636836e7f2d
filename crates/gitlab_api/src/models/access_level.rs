//! Group access levels.

use std::fmt;

use serde::Deserialize;

use crate::error::ApiError;

/// A member's role within a group, ordered from least to most privileged.
///
/// The API encodes levels as fixed integer codes; any other code is
/// malformed input, never mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u64")]
pub enum AccessLevel {
    /// Not a member of the group.
    None,
    Guest,
    Reporter,
    Developer,
    Master,
    Owner,
}

impl AccessLevel {
    /// The integer code used on the wire.
    #[must_use]
    pub fn id(self) -> u64 {
        match self {
            AccessLevel::None => 0,
            AccessLevel::Guest => 10,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Master => 40,
            AccessLevel::Owner => 50,
        }
    }

    /// Looks up the access level for a wire code.
    pub fn from_id(id: u64) -> Result<Self, ApiError> {
        match id {
            0 => Ok(AccessLevel::None),
            10 => Ok(AccessLevel::Guest),
            20 => Ok(AccessLevel::Reporter),
            30 => Ok(AccessLevel::Developer),
            40 => Ok(AccessLevel::Master),
            50 => Ok(AccessLevel::Owner),
            other => Err(ApiError::invalid_data(format!(
                "invalid access level ID {other}"
            ))),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AccessLevel::None => "None",
            AccessLevel::Guest => "Guest",
            AccessLevel::Reporter => "Reporter",
            AccessLevel::Developer => "Developer",
            AccessLevel::Master => "Master",
            AccessLevel::Owner => "Owner",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u64> for AccessLevel {
    type Error = String;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::from_id(id).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_wire_code_round_trips() {
        for (id, level) in [
            (0, AccessLevel::None),
            (10, AccessLevel::Guest),
            (20, AccessLevel::Reporter),
            (30, AccessLevel::Developer),
            (40, AccessLevel::Master),
            (50, AccessLevel::Owner),
        ] {
            let looked_up = AccessLevel::from_id(id).expect("valid code");
            assert_eq!(looked_up, level);
            assert_eq!(looked_up.id(), id);
        }
    }

    #[test]
    fn unknown_codes_are_hard_errors() {
        for id in [1, 5, 15, 25, 35, 45, 55, 60, 100] {
            assert!(matches!(
                AccessLevel::from_id(id),
                Err(ApiError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn levels_are_ordered_by_privilege() {
        assert!(AccessLevel::None < AccessLevel::Guest);
        assert!(AccessLevel::Developer < AccessLevel::Master);
        assert!(AccessLevel::Master < AccessLevel::Owner);
    }

    #[test]
    fn display_uses_the_level_name() {
        assert_eq!(AccessLevel::Owner.to_string(), "Owner");
        assert_eq!(AccessLevel::None.to_string(), "None");
    }

    #[test]
    fn deserializes_from_the_wire_code() {
        let level: AccessLevel = serde_json::from_str("40").expect("valid code");
        assert_eq!(level, AccessLevel::Master);

        assert!(serde_json::from_str::<AccessLevel>("41").is_err());
    }
}
