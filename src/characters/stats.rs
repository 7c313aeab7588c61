//! Combat stats carried by every character.

use serde::{Deserialize, Serialize};

/// Attack, defense, speed and base critical chance.
///
/// `critical_chance` overrides the battle-wide base when set. Temporary
/// critical bonuses live in the status record, not here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub attack: i64,
    pub defense: i64,
    #[serde(default)]
    pub speed: i64,
    #[serde(default)]
    pub critical_chance: Option<f64>,
}

impl CombatStats {
    #[must_use]
    pub fn new(attack: i64, defense: i64) -> Self {
        Self {
            attack,
            defense,
            speed: 0,
            critical_chance: None,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_critical_chance(mut self, chance: f64) -> Self {
        self.critical_chance = Some(chance);
        self
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(5, 5)
    }
}
