//! Per-character status record.
//!
//! All status kinds for one character live in a single struct so a
//! character can never be present in one status table and missing from
//! another.

use serde::{Deserialize, Serialize};

/// Shield, freeze, debuff and buff state of one character.
///
/// ```
/// use toy_arena::characters::StatusRecord;
///
/// let mut status = StatusRecord::default();
/// status.add_shield(10, Some(100));
///
/// let absorbed = status.absorb(21);
/// assert_eq!(absorbed, 10);
/// assert_eq!(status.shield, 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// Damage absorbed before health.
    #[serde(default)]
    pub shield: i64,

    /// Turns left to skip.
    #[serde(default)]
    pub frozen_turns: u32,

    /// Probability that the next offensive action misses.
    #[serde(default)]
    pub accuracy_debuff: Option<f64>,

    /// Flat bonus for the next outgoing damaging action.
    #[serde(default)]
    pub damage_buff: Option<i64>,

    /// Critical chance bonus lasting the rest of the battle.
    #[serde(default)]
    pub critical_buff: f64,

    /// Critical chance bonus consumed by the next damaging action.
    #[serde(default)]
    pub critical_buff_once: f64,
}

impl StatusRecord {
    /// Add to the shield, clamping the total to `cap`. Returns the amount
    /// actually added.
    pub fn add_shield(&mut self, amount: i64, cap: Option<i64>) -> i64 {
        let before = self.shield;
        let total = self.shield + amount.max(0);
        self.shield = match cap {
            Some(cap) => total.min(cap.max(before)),
            None => total,
        };
        self.shield - before
    }

    /// Absorb incoming damage. Returns the absorbed amount,
    /// `min(damage, shield)`.
    pub fn absorb(&mut self, damage: i64) -> i64 {
        let absorbed = damage.max(0).min(self.shield);
        self.shield -= absorbed;
        absorbed
    }

    pub fn freeze(&mut self, turns: u32) {
        self.frozen_turns = self.frozen_turns.max(turns);
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen_turns > 0
    }

    /// Consume one frozen turn. Returns whether the character was frozen.
    pub fn consume_freeze(&mut self) -> bool {
        if self.frozen_turns == 0 {
            return false;
        }
        self.frozen_turns -= 1;
        true
    }

    /// Apply an accuracy debuff; a stronger pending debuff is kept.
    pub fn debuff_accuracy(&mut self, miss_chance: f64) {
        let chance = miss_chance.clamp(0.0, 1.0);
        self.accuracy_debuff = Some(self.accuracy_debuff.map_or(chance, |c| c.max(chance)));
    }

    /// Remove and return the pending accuracy debuff.
    pub fn take_accuracy_debuff(&mut self) -> Option<f64> {
        self.accuracy_debuff.take()
    }

    /// Damage buffs stack additively until consumed.
    pub fn add_damage_buff(&mut self, bonus: i64) {
        self.damage_buff = Some(self.damage_buff.unwrap_or(0) + bonus);
    }

    pub fn take_damage_buff(&mut self) -> i64 {
        self.damage_buff.take().unwrap_or(0)
    }

    pub fn add_critical_buff(&mut self, bonus: f64, permanent: bool) {
        if permanent {
            self.critical_buff += bonus;
        } else {
            self.critical_buff_once += bonus;
        }
    }

    /// Total critical bonus currently active.
    #[must_use]
    pub fn critical_bonus(&self) -> f64 {
        self.critical_buff + self.critical_buff_once
    }

    /// Drop single-use critical bonuses after a damaging action.
    pub fn expire_single_use_critical(&mut self) {
        self.critical_buff_once = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_stacks_additively() {
        let mut status = StatusRecord::default();
        assert_eq!(status.add_shield(30, None), 30);
        assert_eq!(status.add_shield(20, None), 20);
        assert_eq!(status.shield, 50);
    }

    #[test]
    fn test_shield_cap() {
        let mut status = StatusRecord::default();
        status.add_shield(90, Some(100));
        assert_eq!(status.add_shield(15, Some(100)), 10);
        assert_eq!(status.shield, 100);
        assert_eq!(status.add_shield(15, Some(100)), 0);
    }

    #[test]
    fn test_absorb_partial_and_full() {
        let mut status = StatusRecord {
            shield: 30,
            ..Default::default()
        };
        assert_eq!(status.absorb(12), 12);
        assert_eq!(status.shield, 18);
        assert_eq!(status.absorb(50), 18);
        assert_eq!(status.shield, 0);
        assert_eq!(status.absorb(5), 0);
    }

    #[test]
    fn test_freeze_consumed_once() {
        let mut status = StatusRecord::default();
        status.freeze(1);
        assert!(status.is_frozen());
        assert!(status.consume_freeze());
        assert!(!status.is_frozen());
        assert!(!status.consume_freeze());
    }

    #[test]
    fn test_damage_buff_single_use() {
        let mut status = StatusRecord::default();
        status.add_damage_buff(15);
        assert_eq!(status.take_damage_buff(), 15);
        assert_eq!(status.take_damage_buff(), 0);
    }

    #[test]
    fn test_critical_buffs() {
        let mut status = StatusRecord::default();
        status.add_critical_buff(0.5, true);
        status.add_critical_buff(0.2, false);
        assert!((status.critical_bonus() - 0.7).abs() < 1e-9);
        status.expire_single_use_critical();
        assert!((status.critical_bonus() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_debuff_taken() {
        let mut status = StatusRecord::default();
        status.debuff_accuracy(0.4);
        assert_eq!(status.take_accuracy_debuff(), Some(0.4));
        assert_eq!(status.take_accuracy_debuff(), None);
    }
}
