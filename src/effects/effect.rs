//! Resolved effect outcomes.
//!
//! An `EffectOutcome` is one numeric or status change already applied to a
//! character. The resolver produces them in application order; the engine
//! records them in the battle log and turns them into presentation feedback.
//!
//! ## Outcome kinds
//!
//! - `Damage`: health removed after shields, with critical and kill flags
//! - `Heal` / `Revive`: health restored
//! - `Shield`: absorption added
//! - `Freeze`: turns the target will skip
//! - `DamageBuff` / `CriticalBuff` / `AccuracyDebuff`: status changes

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::InstanceId;

/// Targets of a single action. Three covers every roster-sized pool.
pub type TargetList = SmallVec<[InstanceId; 3]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectOutcome {
    Damage {
        target: InstanceId,
        /// Health removed.
        amount: i64,
        /// Damage soaked by the shield.
        absorbed: i64,
        critical: bool,
        killed: bool,
    },
    Heal {
        target: InstanceId,
        amount: i64,
    },
    Revive {
        target: InstanceId,
        restored: i64,
    },
    Shield {
        target: InstanceId,
        /// Shield actually added after the cap.
        amount: i64,
        total: i64,
    },
    Freeze {
        target: InstanceId,
        turns: u32,
    },
    DamageBuff {
        target: InstanceId,
        bonus: i64,
    },
    CriticalBuff {
        target: InstanceId,
        bonus: f64,
        permanent: bool,
    },
    AccuracyDebuff {
        target: InstanceId,
        miss_chance: f64,
    },
}

impl EffectOutcome {
    #[must_use]
    pub fn target(&self) -> &InstanceId {
        match self {
            EffectOutcome::Damage { target, .. }
            | EffectOutcome::Heal { target, .. }
            | EffectOutcome::Revive { target, .. }
            | EffectOutcome::Shield { target, .. }
            | EffectOutcome::Freeze { target, .. }
            | EffectOutcome::DamageBuff { target, .. }
            | EffectOutcome::CriticalBuff { target, .. }
            | EffectOutcome::AccuracyDebuff { target, .. } => target,
        }
    }

    /// Total damage dealt including shield absorption.
    #[must_use]
    pub fn damage_dealt(&self) -> i64 {
        match self {
            EffectOutcome::Damage { amount, absorbed, .. } => amount + absorbed,
            _ => 0,
        }
    }

    /// Health restored by heals and revives.
    #[must_use]
    pub fn healing_done(&self) -> i64 {
        match self {
            EffectOutcome::Heal { amount, .. } => *amount,
            EffectOutcome::Revive { restored, .. } => *restored,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_kill(&self) -> bool {
        matches!(self, EffectOutcome::Damage { killed: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let hit = EffectOutcome::Damage {
            target: InstanceId::new("b-0"),
            amount: 11,
            absorbed: 10,
            critical: false,
            killed: true,
        };
        assert_eq!(hit.damage_dealt(), 21);
        assert_eq!(hit.healing_done(), 0);
        assert!(hit.is_kill());

        let revive = EffectOutcome::Revive {
            target: InstanceId::new("a-1"),
            restored: 20,
        };
        assert_eq!(revive.healing_done(), 20);
        assert_eq!(revive.target().as_str(), "a-1");
    }

    #[test]
    fn test_tagged_serialization() {
        let freeze = EffectOutcome::Freeze {
            target: InstanceId::new("b-2"),
            turns: 1,
        };
        let json = serde_json::to_value(&freeze).unwrap();
        assert_eq!(json["type"], "freeze");
        assert_eq!(json["target"], "b-2");
    }
}
