//! Character templates.
//!
//! A template is the static description of a toy (name, rarity, health,
//! abilities). Rosters are built by instantiating templates into
//! battle-scoped `CharacterInstance`s.

use serde::{Deserialize, Serialize};

use super::instance::CharacterInstance;
use super::rarity::Rarity;
use super::stats::CombatStats;
use crate::abilities::Ability;
use crate::core::{CharacterId, InstanceId, Side};

/// Static character definition.
///
/// ```
/// use toy_arena::abilities::{Ability, EffectKind};
/// use toy_arena::characters::{CharacterTemplate, Rarity};
/// use toy_arena::core::{InstanceId, Side};
///
/// let duck = CharacterTemplate::new("rubber_duckie", "Rubber Duckie", Rarity::Common, 85)
///     .with_ability(Ability::new("splash_peck", "Splash Peck", EffectKind::Damage).with_damage(18));
///
/// let instance = duck.instantiate(InstanceId::new("a-duck-0"), Side::A);
/// assert_eq!(instance.current_health, 85);
/// assert_eq!(instance.stats.attack, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub id: CharacterId,
    pub name: String,
    pub rarity: Rarity,
    pub max_health: i64,
    pub stats: CombatStats,
    pub abilities: Vec<Ability>,
}

impl CharacterTemplate {
    /// New template with the rarity's default stats and no abilities.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>, rarity: Rarity, max_health: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            max_health,
            stats: rarity.default_stats(),
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Create a full-health instance for one roster slot.
    #[must_use]
    pub fn instantiate(&self, instance_id: InstanceId, side: Side) -> CharacterInstance {
        CharacterInstance {
            instance_id,
            character_id: self.id.clone(),
            name: self.name.clone(),
            side,
            rarity: self.rarity,
            stats: self.stats,
            current_health: self.max_health,
            max_health: self.max_health,
            abilities: self.abilities.clone(),
            status: Default::default(),
        }
    }
}
