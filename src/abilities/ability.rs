//! Ability definitions.
//!
//! Abilities are static catalog data: the engine reads them and never
//! mutates them. Magnitude fields are interpreted per `EffectKind`; fields a
//! kind does not use are ignored.

use serde::{Deserialize, Serialize};

use super::kind::{EffectKind, TargetingMode};
use crate::core::AbilityId;

fn one() -> u32 {
    1
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// One action a character can take.
///
/// ```
/// use toy_arena::abilities::{Ability, EffectKind};
///
/// let whirlwind = Ability::new("whirlwind_slash", "Whirlwind Slash", EffectKind::DamageCascade)
///     .with_damage(35)
///     .with_cascade(vec![1.0, 0.6, 0.3])
///     .ultimate()
///     .with_weight(0.1);
///
/// assert_eq!(whirlwind.cascade_multiplier(4), 0.3);
/// assert!(whirlwind.is_ultimate);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub id: AbilityId,

    pub name: String,

    #[serde(rename = "effect")]
    pub kind: EffectKind,

    #[serde(default)]
    pub damage: i64,

    #[serde(default)]
    pub heal: i64,

    #[serde(default)]
    pub shield: i64,

    /// Strikes per target for `multi_damage`.
    #[serde(default = "one")]
    pub hits: u32,

    /// Per-target multipliers for `damage_cascade`; the last repeats.
    #[serde(default)]
    pub cascade_multipliers: Vec<f64>,

    #[serde(default)]
    pub is_ultimate: bool,

    /// Relative selection weight.
    #[serde(default = "default_weight", alias = "chance")]
    pub weight: f64,

    /// Flat bonus granted by `buff_damage_all`.
    #[serde(default)]
    pub damage_buff: Option<i64>,

    /// Critical chance granted by `buff_critical_all`.
    #[serde(default)]
    pub critical_boost: Option<f64>,

    #[serde(default = "default_true")]
    pub critical_boost_permanent: bool,

    /// Miss probability applied by `debuff_accuracy`.
    #[serde(default)]
    pub miss_chance: Option<f64>,
}

impl Ability {
    pub fn new(id: impl Into<AbilityId>, name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            damage: 0,
            heal: 0,
            shield: 0,
            hits: 1,
            cascade_multipliers: Vec::new(),
            is_ultimate: false,
            weight: 1.0,
            damage_buff: None,
            critical_boost: None,
            critical_boost_permanent: true,
            miss_chance: None,
        }
    }

    /// Fallback used when a character has no abilities.
    #[must_use]
    pub fn basic_attack() -> Self {
        Self::new("basic_attack", "Basic Attack", EffectKind::Damage).with_damage(20)
    }

    #[must_use]
    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_heal(mut self, heal: i64) -> Self {
        self.heal = heal;
        self
    }

    #[must_use]
    pub fn with_shield(mut self, shield: i64) -> Self {
        self.shield = shield;
        self
    }

    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.max(1);
        self
    }

    #[must_use]
    pub fn with_cascade(mut self, multipliers: Vec<f64>) -> Self {
        self.cascade_multipliers = multipliers;
        self
    }

    #[must_use]
    pub fn ultimate(mut self) -> Self {
        self.is_ultimate = true;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_damage_buff(mut self, bonus: i64) -> Self {
        self.damage_buff = Some(bonus);
        self
    }

    #[must_use]
    pub fn with_critical_boost(mut self, boost: f64, permanent: bool) -> Self {
        self.critical_boost = Some(boost);
        self.critical_boost_permanent = permanent;
        self
    }

    #[must_use]
    pub fn with_miss_chance(mut self, chance: f64) -> Self {
        self.miss_chance = Some(chance);
        self
    }

    #[must_use]
    pub fn targeting(&self) -> TargetingMode {
        self.kind.targeting()
    }

    /// Multiplier for the `index`-th cascade target.
    ///
    /// Falls back to 1.0 when no multipliers were supplied.
    #[must_use]
    pub fn cascade_multiplier(&self, index: usize) -> f64 {
        self.cascade_multipliers
            .get(index)
            .or_else(|| self.cascade_multipliers.last())
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_attack() {
        let basic = Ability::basic_attack();
        assert_eq!(basic.kind, EffectKind::Damage);
        assert_eq!(basic.damage, 20);
        assert_eq!(basic.hits, 1);
    }

    #[test]
    fn test_cascade_multiplier_reuses_last() {
        let ability = Ability::new("c", "Cascade", EffectKind::DamageCascade).with_cascade(vec![1.0, 0.6]);
        assert_eq!(ability.cascade_multiplier(0), 1.0);
        assert_eq!(ability.cascade_multiplier(1), 0.6);
        assert_eq!(ability.cascade_multiplier(5), 0.6);

        let bare = Ability::new("c", "Cascade", EffectKind::DamageCascade);
        assert_eq!(bare.cascade_multiplier(2), 1.0);
    }

    #[test]
    fn test_hits_never_zero() {
        let ability = Ability::new("m", "Multi", EffectKind::MultiDamage).with_hits(0);
        assert_eq!(ability.hits, 1);
    }

    #[test]
    fn test_deserialize_arbiter_shape() {
        let json = r#"{
            "id": "shadow_clone_jutsu",
            "name": "Shadow Clone Jutsu",
            "effect": "multi_damage",
            "damage": 35,
            "hits": 3,
            "chance": 0.08,
            "isUltimate": true
        }"#;
        let ability: Ability = serde_json::from_str(json).unwrap();
        assert_eq!(ability.kind, EffectKind::MultiDamage);
        assert_eq!(ability.hits, 3);
        assert_eq!(ability.weight, 0.08);
        assert!(ability.is_ultimate);
        assert!(ability.critical_boost_permanent);
    }

    #[test]
    fn test_deserialize_unknown_kind_fails() {
        let json = r#"{"id": "x", "name": "X", "effect": "teleport"}"#;
        assert!(serde_json::from_str::<Ability>(json).is_err());
    }
}
