//! Runtime character state.

use serde::{Deserialize, Serialize};

use super::rarity::Rarity;
use super::stats::CombatStats;
use super::status::StatusRecord;
use crate::abilities::Ability;
use crate::core::{CharacterId, InstanceId, Side};

/// Result of applying damage to health.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthChange {
    /// Health actually removed.
    pub applied: i64,
    /// The hit took health from positive to exactly zero.
    pub killed: bool,
}

/// One combatant in a battle.
///
/// `current_health == 0` means defeated. A defeated character keeps its
/// status record but only revive effects can target it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInstance {
    pub instance_id: InstanceId,
    pub character_id: CharacterId,
    pub name: String,
    pub side: Side,
    pub rarity: Rarity,
    pub stats: CombatStats,
    pub current_health: i64,
    pub max_health: i64,
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub status: StatusRecord,
}

impl CharacterInstance {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0
    }

    #[must_use]
    pub fn missing_health(&self) -> i64 {
        (self.max_health - self.current_health).max(0)
    }

    /// `current / max`, used to find the most injured ally.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.current_health as f64 / self.max_health as f64
    }

    /// Base critical chance plus active buffs. `base` applies when the
    /// character has no critical chance of its own.
    #[must_use]
    pub fn critical_chance(&self, base: f64) -> f64 {
        let own = self.stats.critical_chance.unwrap_or(base);
        (own + self.status.critical_bonus()).clamp(0.0, 1.0)
    }

    /// Remove health, floored at zero.
    pub fn apply_damage(&mut self, amount: i64) -> HealthChange {
        let before = self.current_health;
        self.current_health = (self.current_health - amount.max(0)).max(0);
        HealthChange {
            applied: before - self.current_health,
            killed: before > 0 && self.current_health == 0,
        }
    }

    /// Heal up to max health. Returns the amount actually restored.
    ///
    /// Defeated characters are not healed; use [`revive`](Self::revive).
    pub fn heal(&mut self, amount: i64) -> i64 {
        if self.is_defeated() {
            return 0;
        }
        let actual = amount.max(0).min(self.missing_health());
        self.current_health += actual;
        actual
    }

    /// Bring a defeated character back at `floor(max * fraction)` health
    /// (at least 1). Returns the restored health, or 0 if already alive.
    pub fn revive(&mut self, fraction: f64) -> i64 {
        if self.is_alive() {
            return 0;
        }
        let restored = ((self.max_health as f64 * fraction).floor() as i64).clamp(1, self.max_health);
        self.current_health = restored;
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CharacterTemplate;

    fn toy(max_health: i64) -> CharacterInstance {
        CharacterTemplate::new("toy", "Toy", Rarity::Common, max_health)
            .instantiate(InstanceId::new("a-toy-0"), Side::A)
    }

    #[test]
    fn test_damage_floors_at_zero_and_reports_kill() {
        let mut c = toy(40);
        let change = c.apply_damage(25);
        assert_eq!(change, HealthChange { applied: 25, killed: false });

        let change = c.apply_damage(100);
        assert_eq!(change, HealthChange { applied: 15, killed: true });
        assert_eq!(c.current_health, 0);

        // Hitting a corpse is not another kill
        let change = c.apply_damage(10);
        assert_eq!(change, HealthChange { applied: 0, killed: false });
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut c = toy(40);
        c.current_health = 30;
        assert_eq!(c.heal(50), 10);
        assert_eq!(c.current_health, 40);
        assert_eq!(c.heal(50), 0);
    }

    #[test]
    fn test_heal_ignores_defeated() {
        let mut c = toy(40);
        c.current_health = 0;
        assert_eq!(c.heal(10), 0);
        assert!(c.is_defeated());
    }

    #[test]
    fn test_revive_half_health() {
        let mut c = toy(40);
        c.current_health = 0;
        assert_eq!(c.revive(0.5), 20);
        assert!(c.is_alive());
        assert_eq!(c.revive(0.5), 0);
    }

    #[test]
    fn test_revive_rounds_down() {
        let mut c = toy(85);
        c.current_health = 0;
        assert_eq!(c.revive(0.5), 42);
    }

    #[test]
    fn test_critical_chance_includes_buffs() {
        let mut c = toy(40);
        c.status.add_critical_buff(0.5, true);
        assert!((c.critical_chance(0.15) - 0.65).abs() < 1e-9);

        c.stats.critical_chance = Some(0.3);
        assert!((c.critical_chance(0.15) - 0.8).abs() < 1e-9);
    }
}
