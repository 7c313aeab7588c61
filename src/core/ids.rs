//! Identifiers for characters, character templates and abilities.
//!
//! All identifiers are string-backed because rosters and abilities cross the
//! player-vs-player wire, where the arbiter names them
//! (`"player1-robo_fighter-0"`, `"laser_blast"`).
//!
//! ```
//! use toy_arena::core::{CharacterId, InstanceId};
//!
//! let template = CharacterId::new("robo_fighter");
//! let instance = InstanceId::for_slot("a", &template, 0);
//!
//! assert_eq!(instance.as_str(), "a-robo_fighter-0");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Battle-scoped unique identifier of one combatant.
    InstanceId
);

string_id!(
    /// Template identifier shared by every instance of the same character.
    CharacterId
);

string_id!(
    /// Ability identifier, unique within a character's ability list.
    AbilityId
);

impl InstanceId {
    /// Conventional instance id for a roster slot: `<prefix>-<template>-<slot>`.
    #[must_use]
    pub fn for_slot(prefix: &str, template: &CharacterId, slot: usize) -> Self {
        Self(format!("{prefix}-{template}-{slot}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_string() {
        let id = AbilityId::new("laser_blast");
        assert_eq!(id.to_string(), "laser_blast");
    }

    #[test]
    fn test_for_slot() {
        let id = InstanceId::for_slot("player2", &CharacterId::from("brick_dude"), 2);
        assert_eq!(id, InstanceId::from("player2-brick_dude-2"));
    }

    #[test]
    fn test_transparent_serde() {
        let id = InstanceId::from("b-wizard_toy-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"b-wizard_toy-1\"");
        let back: InstanceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
