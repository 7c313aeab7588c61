//! Character rarity tiers.

use serde::{Deserialize, Serialize};

use super::stats::CombatStats;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    /// Multiplier applied to base ability damage.
    #[must_use]
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.2,
            Rarity::Legendary => 1.3,
            Rarity::Mythic => 1.5,
        }
    }

    /// Attack and defense a character of this tier gets when its template
    /// doesn't specify them.
    #[must_use]
    pub fn default_stats(self) -> CombatStats {
        let (attack, defense) = match self {
            Rarity::Common => (5, 5),
            Rarity::Rare => (7, 6),
            Rarity::Epic => (8, 7),
            Rarity::Legendary => (9, 8),
            Rarity::Mythic => (10, 10),
        };
        CombatStats::new(attack, defense)
    }
}
