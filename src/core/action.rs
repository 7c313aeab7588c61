//! Action records for the battle log.
//!
//! Every completed action appends one `ActionRecord`: who acted, what they
//! did, whom it touched and the applied outcomes. Skipped (frozen) and
//! missed turns are recorded too so the log mirrors the turn counter.

use serde::{Deserialize, Serialize};

use super::ids::{AbilityId, InstanceId};
use super::side::Side;
use crate::effects::{EffectOutcome, TargetList};

/// What the acting character did with its turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Ability {
        ability: AbilityId,
        name: String,
        ultimate: bool,
    },
    /// Frozen: the turn was consumed without selecting an ability.
    Skipped,
    /// Accuracy debuff triggered: time spent, nothing happened.
    Missed,
}

/// One completed action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Turn counter value when the action started.
    pub turn: u32,
    pub side: Side,
    pub actor: InstanceId,
    pub kind: ActionKind,
    pub targets: TargetList,
    pub outcomes: Vec<EffectOutcome>,
}

impl ActionRecord {
    #[must_use]
    pub fn skipped(turn: u32, side: Side, actor: InstanceId) -> Self {
        Self {
            turn,
            side,
            actor,
            kind: ActionKind::Skipped,
            targets: TargetList::new(),
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn missed(turn: u32, side: Side, actor: InstanceId) -> Self {
        Self {
            kind: ActionKind::Missed,
            ..Self::skipped(turn, side, actor)
        }
    }

    #[must_use]
    pub fn is_ultimate(&self) -> bool {
        matches!(self.kind, ActionKind::Ability { ultimate: true, .. })
    }

    /// Total damage dealt by this action, shields included.
    #[must_use]
    pub fn total_damage(&self) -> i64 {
        self.outcomes.iter().map(EffectOutcome::damage_dealt).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missed_record() {
        let record = ActionRecord::missed(4, Side::B, InstanceId::new("b-1"));
        assert_eq!(record.kind, ActionKind::Missed);
        assert_eq!(record.turn, 4);
        assert!(record.targets.is_empty());
        assert!(!record.is_ultimate());
        assert_eq!(record.total_damage(), 0);
    }

    #[test]
    fn test_kind_serialization() {
        let kind = ActionKind::Ability {
            ability: AbilityId::new("ice_nova"),
            name: "ICE NOVA".into(),
            ultimate: true,
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "ability");
        assert_eq!(json["ability"], "ice_nova");
    }
}
