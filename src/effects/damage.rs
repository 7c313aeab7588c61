//! Damage formulas.
//!
//! A hit is computed in a fixed order:
//!
//! 1. `raw = model.scale(base, caster)` plus any pending damage buff
//! 2. `reduced = model.reduce(raw, target)`, floored at 1 for non-zero raw
//! 3. combo bonus when the side's stacks exceed the threshold
//! 4. shield absorbs `min(shield, reduced)`
//! 5. a critical roll multiplies the post-shield remainder
//!
//! Steps 4 and 5 touch character state and live in the resolver; this
//! module covers the pure arithmetic.
//!
//! ```
//! use toy_arena::characters::{CombatStats, CharacterTemplate, Rarity};
//! use toy_arena::core::{InstanceId, Side};
//! use toy_arena::effects::{DamageModel, StandardDamageModel};
//!
//! let caster = CharacterTemplate::new("a", "A", Rarity::Common, 100)
//!     .with_stats(CombatStats::new(22, 5))
//!     .instantiate(InstanceId::new("a-0"), Side::A);
//! let target = CharacterTemplate::new("b", "B", Rarity::Common, 100)
//!     .with_stats(CombatStats::new(5, 18))
//!     .instantiate(InstanceId::new("b-0"), Side::B);
//!
//! let model = StandardDamageModel;
//! let raw = model.scale(30.0, &caster);
//! assert_eq!(model.reduce(raw, &target), 21);
//! ```

use crate::characters::CharacterInstance;
use crate::core::{BattleConfig, DamageModelKind};

/// Attack scaling and defense reduction.
pub trait DamageModel: std::fmt::Debug {
    /// Scale base ability damage by the caster's rarity and attack.
    fn scale(&self, base: f64, caster: &CharacterInstance) -> i64;

    /// Apply the target's defense. Implementations must return at least 1
    /// for any positive `raw`.
    fn reduce(&self, raw: i64, target: &CharacterInstance) -> i64;
}

/// Rarity multiplier on base damage, then half the target's defense
/// subtracted flat.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDamageModel;

impl DamageModel for StandardDamageModel {
    fn scale(&self, base: f64, caster: &CharacterInstance) -> i64 {
        (base * caster.rarity.damage_multiplier()).round() as i64
    }

    fn reduce(&self, raw: i64, target: &CharacterInstance) -> i64 {
        if raw <= 0 {
            return 0;
        }
        let reduced = (raw as f64 - target.stats.defense as f64 * 0.5).round() as i64;
        reduced.max(1)
    }
}

/// Percent-based formulas: each attack point above 5 adds 10%, each defense
/// point removes 5% up to a 50% cap.
#[derive(Clone, Copy, Debug, Default)]
pub struct RarityScaledDamageModel;

impl RarityScaledDamageModel {
    const NEUTRAL_ATTACK: i64 = 5;
    const ATTACK_STEP: f64 = 0.1;
    const DEFENSE_STEP: f64 = 0.05;
    const MAX_REDUCTION: f64 = 0.5;

    fn attack_of(character: &CharacterInstance) -> i64 {
        if character.stats.attack > 0 {
            character.stats.attack
        } else {
            character.rarity.default_stats().attack
        }
    }

    fn defense_of(character: &CharacterInstance) -> i64 {
        if character.stats.defense > 0 {
            character.stats.defense
        } else {
            character.rarity.default_stats().defense
        }
    }
}

impl DamageModel for RarityScaledDamageModel {
    fn scale(&self, base: f64, caster: &CharacterInstance) -> i64 {
        let attack = Self::attack_of(caster);
        let attack_multiplier = 1.0 + (attack - Self::NEUTRAL_ATTACK) as f64 * Self::ATTACK_STEP;
        (base * caster.rarity.damage_multiplier() * attack_multiplier).round() as i64
    }

    fn reduce(&self, raw: i64, target: &CharacterInstance) -> i64 {
        if raw <= 0 {
            return 0;
        }
        let reduction = (Self::defense_of(target) as f64 * Self::DEFENSE_STEP).min(Self::MAX_REDUCTION);
        ((raw as f64 * (1.0 - reduction)).round() as i64).max(1)
    }
}

/// Build the model a configuration asks for.
#[must_use]
pub fn model_for(kind: DamageModelKind) -> Box<dyn DamageModel> {
    match kind {
        DamageModelKind::Standard => Box::new(StandardDamageModel),
        DamageModelKind::RarityScaled => Box::new(RarityScaledDamageModel),
    }
}

/// Multiplier for `stacks` consecutive damage instances by one side.
///
/// Each stack beyond the threshold adds `combo_bonus_per_stack`.
#[must_use]
pub fn combo_multiplier(config: &BattleConfig, stacks: u32) -> f64 {
    if stacks <= config.combo_threshold {
        return 1.0;
    }
    1.0 + f64::from(stacks - config.combo_threshold) * config.combo_bonus_per_stack
}

/// Apply the combo bonus to a reduced hit.
#[must_use]
pub fn apply_combo(config: &BattleConfig, reduced: i64, stacks: u32) -> i64 {
    let multiplier = combo_multiplier(config, stacks);
    if multiplier == 1.0 {
        return reduced;
    }
    (reduced as f64 * multiplier).round() as i64
}

/// Apply the critical multiplier to post-shield damage.
#[must_use]
pub fn apply_critical(config: &BattleConfig, damage: i64) -> i64 {
    (damage as f64 * config.critical_multiplier).round() as i64
}
