//! Battle configuration.
//!
//! Every tunable rule constant lives in `BattleConfig` so tests and game
//! modes can adjust them without touching the engine:
//! - `BattleMode`: single-player or synchronized player-vs-player
//! - `Controller`: who picks single targets for each side
//! - `DamageModelKind`: which attack/defense formulas resolve damage
//!
//! ```
//! use std::time::Duration;
//! use toy_arena::core::{BattleConfig, Controller, Side};
//!
//! let config = BattleConfig::default()
//!     .with_controller(Side::A, Controller::Human)
//!     .with_selection_countdown(Duration::from_secs(5));
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Side, SideMap};
use crate::error::{BattleError, Result};

/// Whether outcomes are decided locally or mirrored from an arbiter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleMode {
    #[default]
    SinglePlayer,
    /// Outcomes come from the remote arbiter; the battle id seeds cosmetic
    /// randomness shared by both participants.
    PlayerVsPlayer { battle_id: String },
}

/// Who chooses single targets for a side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    /// Pauses for an explicit selection with a countdown.
    Human,
    /// Always auto-resolves.
    #[default]
    Ai,
}

/// Selects the damage formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageModelKind {
    /// Rarity multiplier on base damage, flat half-defense reduction.
    #[default]
    Standard,
    /// Percent attack scaling around 5 and percent defense reduction capped at 50%.
    RarityScaled,
}

/// Characters per roster. Fixed; battles with other roster sizes are rejected.
pub const TEAM_SIZE: usize = 3;

/// Miss probability for accuracy debuffs that don't state one.
pub const DEFAULT_MISS_CHANCE: f64 = 0.4;

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub mode: BattleMode,

    pub controllers: SideMap<Controller>,

    pub damage_model: DamageModelKind,

    /// Critical chance before buffs, used for characters without their own value.
    pub base_critical_chance: f64,

    pub critical_multiplier: f64,

    /// Upper bound on any shield total. `None` leaves stacking unbounded.
    pub shield_cap: Option<i64>,

    /// Fraction of max health restored by revive effects.
    pub revive_fraction: f64,

    /// Per-target multipliers for chain damage; the last repeats.
    pub chain_multipliers: Vec<f64>,

    pub chain_max_targets: usize,

    /// Combo stacks at or below this grant no bonus.
    pub combo_threshold: u32,

    pub combo_bonus_per_stack: f64,

    /// Miss probability for accuracy debuffs that don't state one.
    pub default_miss_chance: f64,

    pub default_damage_buff: i64,

    pub default_critical_boost: f64,

    /// Countdown for human target selection in single-player mode.
    pub selection_countdown: Duration,

    /// Consecutive malformed snapshots tolerated before desynchronizing.
    pub desync_threshold: u32,

    /// Seed for single-player resolution.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            mode: BattleMode::SinglePlayer,
            controllers: SideMap::with_value(Controller::Ai),
            damage_model: DamageModelKind::Standard,
            base_critical_chance: 0.15,
            critical_multiplier: 1.5,
            shield_cap: Some(100),
            revive_fraction: 0.5,
            chain_multipliers: vec![1.0, 0.75, 0.5],
            chain_max_targets: 3,
            combo_threshold: 2,
            combo_bonus_per_stack: 0.10,
            default_miss_chance: DEFAULT_MISS_CHANCE,
            default_damage_buff: 15,
            default_critical_boost: 0.5,
            selection_countdown: Duration::from_secs(10),
            desync_threshold: 3,
            seed: 0,
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: BattleMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_controller(mut self, side: Side, controller: Controller) -> Self {
        self.controllers[side] = controller;
        self
    }

    #[must_use]
    pub fn with_damage_model(mut self, model: DamageModelKind) -> Self {
        self.damage_model = model;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_shield_cap(mut self, cap: Option<i64>) -> Self {
        self.shield_cap = cap;
        self
    }

    #[must_use]
    pub fn with_selection_countdown(mut self, countdown: Duration) -> Self {
        self.selection_countdown = countdown;
        self
    }

    #[must_use]
    pub fn with_desync_threshold(mut self, threshold: u32) -> Self {
        self.desync_threshold = threshold;
        self
    }

    /// Critical hits never happen. Useful for exact-number tests.
    #[must_use]
    pub fn without_criticals(mut self) -> Self {
        self.base_critical_chance = 0.0;
        self
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chain_multipliers.is_empty() {
            return Err(BattleError::InvalidConfig(
                "chain multipliers must not be empty".into(),
            ));
        }
        let probabilities = [
            ("base critical chance", self.base_critical_chance),
            ("default miss chance", self.default_miss_chance),
            ("revive fraction", self.revive_fraction),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(BattleError::InvalidConfig(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        if self.critical_multiplier < 1.0 {
            return Err(BattleError::InvalidConfig(
                "critical multiplier must be at least 1".into(),
            ));
        }
        if matches!(self.shield_cap, Some(cap) if cap < 0) {
            return Err(BattleError::InvalidConfig("shield cap must not be negative".into()));
        }
        Ok(())
    }

    /// Battle identifier in player-vs-player mode.
    #[must_use]
    pub fn battle_id(&self) -> Option<&str> {
        match &self.mode {
            BattleMode::PlayerVsPlayer { battle_id } => Some(battle_id),
            BattleMode::SinglePlayer => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.shield_cap, Some(100));
        assert_eq!(config.chain_multipliers, vec![1.0, 0.75, 0.5]);
        assert_eq!(config.selection_countdown, Duration::from_secs(10));
        assert_eq!(config.controllers[Side::A], Controller::Ai);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BattleConfig::default()
            .with_controller(Side::B, Controller::Human)
            .with_mode(BattleMode::PlayerVsPlayer {
                battle_id: "b-1".into(),
            })
            .with_seed(9);

        assert_eq!(config.controllers[Side::B], Controller::Human);
        assert_eq!(config.battle_id(), Some("b-1"));
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = BattleConfig::default();
        config.default_miss_chance = 1.5;
        assert!(matches!(config.validate(), Err(BattleError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_chain() {
        let mut config = BattleConfig::default();
        config.chain_multipliers.clear();
        assert!(config.validate().is_err());
    }
}
