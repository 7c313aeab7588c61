//! Effect kinds and the targeting modes derived from them.
//!
//! `EffectKind` is closed: each variant has exactly one resolver in
//! `effects::resolver`, and adding a variant is a compile error until that
//! resolver exists.
//!
//! Kinds parse from their wire names, including the aliases used by older
//! ability data:
//!
//! ```
//! use toy_arena::abilities::{EffectKind, TargetingMode};
//!
//! let kind: EffectKind = "damage_chain".parse().unwrap();
//! assert_eq!(kind.targeting(), TargetingMode::ChainEnemies);
//!
//! let mass: EffectKind = "apocalypse".parse().unwrap();
//! assert_eq!(mass, EffectKind::MixedAll);
//!
//! assert!("teleport".parse::<EffectKind>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BattleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    DamageAll,
    DamageChain,
    DamageCascade,
    MultiDamage,
    Heal,
    HealAll,
    HealReviveAll,
    Shield,
    ShieldAll,
    FreezeAll,
    BuffDamageAll,
    BuffCriticalAll,
    DebuffAccuracy,
    /// Damage one enemy and heal one ally.
    #[serde(alias = "both")]
    Mixed,
    /// Damage every living enemy and heal every living ally.
    #[serde(alias = "chaos", alias = "supernova", alias = "apocalypse")]
    MixedAll,
}

/// Which characters an ability may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    SingleEnemy,
    AllEnemies,
    /// Up to `chain_max_targets` enemies, in roster order.
    ChainEnemies,
    SingleAlly,
    AllAllies,
    AllAlliesIncludingDefeated,
    /// One enemy plus one ally.
    EnemyAndAlly,
    /// Every living enemy plus every living ally.
    Everyone,
}

impl TargetingMode {
    /// Modes that a human picks by hand.
    #[must_use]
    pub const fn is_single(self) -> bool {
        matches!(self, TargetingMode::SingleEnemy | TargetingMode::SingleAlly)
    }
}

impl EffectKind {
    pub const ALL: [EffectKind; 16] = [
        EffectKind::Damage,
        EffectKind::DamageAll,
        EffectKind::DamageChain,
        EffectKind::DamageCascade,
        EffectKind::MultiDamage,
        EffectKind::Heal,
        EffectKind::HealAll,
        EffectKind::HealReviveAll,
        EffectKind::Shield,
        EffectKind::ShieldAll,
        EffectKind::FreezeAll,
        EffectKind::BuffDamageAll,
        EffectKind::BuffCriticalAll,
        EffectKind::DebuffAccuracy,
        EffectKind::Mixed,
        EffectKind::MixedAll,
    ];

    #[must_use]
    pub const fn targeting(self) -> TargetingMode {
        match self {
            EffectKind::Damage | EffectKind::MultiDamage | EffectKind::DebuffAccuracy => {
                TargetingMode::SingleEnemy
            }
            EffectKind::DamageAll | EffectKind::DamageCascade | EffectKind::FreezeAll => {
                TargetingMode::AllEnemies
            }
            EffectKind::DamageChain => TargetingMode::ChainEnemies,
            EffectKind::Heal | EffectKind::Shield => TargetingMode::SingleAlly,
            EffectKind::HealAll
            | EffectKind::ShieldAll
            | EffectKind::BuffDamageAll
            | EffectKind::BuffCriticalAll => TargetingMode::AllAllies,
            EffectKind::HealReviveAll => TargetingMode::AllAlliesIncludingDefeated,
            EffectKind::Mixed => TargetingMode::EnemyAndAlly,
            EffectKind::MixedAll => TargetingMode::Everyone,
        }
    }

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EffectKind::Damage => "damage",
            EffectKind::DamageAll => "damage_all",
            EffectKind::DamageChain => "damage_chain",
            EffectKind::DamageCascade => "damage_cascade",
            EffectKind::MultiDamage => "multi_damage",
            EffectKind::Heal => "heal",
            EffectKind::HealAll => "heal_all",
            EffectKind::HealReviveAll => "heal_revive_all",
            EffectKind::Shield => "shield",
            EffectKind::ShieldAll => "shield_all",
            EffectKind::FreezeAll => "freeze_all",
            EffectKind::BuffDamageAll => "buff_damage_all",
            EffectKind::BuffCriticalAll => "buff_critical_all",
            EffectKind::DebuffAccuracy => "debuff_accuracy",
            EffectKind::Mixed => "mixed",
            EffectKind::MixedAll => "mixed_all",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "both" => EffectKind::Mixed,
            "chaos" | "supernova" | "apocalypse" => EffectKind::MixedAll,
            other => EffectKind::ALL
                .into_iter()
                .find(|kind| kind.as_str() == other)
                .ok_or_else(|| BattleError::UnknownEffectKind(other.to_owned()))?,
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_parses_from_its_name() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.as_str().parse::<EffectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("both".parse::<EffectKind>().unwrap(), EffectKind::Mixed);
        assert_eq!("supernova".parse::<EffectKind>().unwrap(), EffectKind::MixedAll);
        assert_eq!("chaos".parse::<EffectKind>().unwrap(), EffectKind::MixedAll);
    }

    #[test]
    fn test_unknown_kind_is_configuration_error() {
        let err = "damage_burn".parse::<EffectKind>().unwrap_err();
        assert_eq!(err, BattleError::UnknownEffectKind("damage_burn".into()));
    }

    #[test]
    fn test_targeting_modes() {
        assert_eq!(EffectKind::Damage.targeting(), TargetingMode::SingleEnemy);
        assert_eq!(EffectKind::FreezeAll.targeting(), TargetingMode::AllEnemies);
        assert_eq!(EffectKind::Shield.targeting(), TargetingMode::SingleAlly);
        assert_eq!(
            EffectKind::HealReviveAll.targeting(),
            TargetingMode::AllAlliesIncludingDefeated
        );
        assert!(EffectKind::Heal.targeting().is_single());
        assert!(!EffectKind::DamageAll.targeting().is_single());
    }

    #[test]
    fn test_serde_alias() {
        let kind: EffectKind = serde_json::from_str("\"apocalypse\"").unwrap();
        assert_eq!(kind, EffectKind::MixedAll);
        assert_eq!(serde_json::to_string(&EffectKind::HealAll).unwrap(), "\"heal_all\"");
    }
}
