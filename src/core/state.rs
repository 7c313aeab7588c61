//! Battle state: teams, turn ownership, cursors and statistics.
//!
//! ## BattleState
//!
//! Everything the engine mutates during a battle:
//! - Both teams
//! - Turn counter and current turn owner
//! - Per-side acting cursors (round-robin over living members)
//! - Per-side combo counters
//! - Aggregate statistics and the action log
//!
//! The log uses `im::Vector` so read-only views can be handed to the
//! presentation and sync layers by cheap clone.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::ids::InstanceId;
use super::side::{Side, SideMap};
use crate::characters::{CharacterInstance, Team};
use crate::effects::EffectOutcome;

/// Per-character tallies for the end-of-battle summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTally {
    pub damage_dealt: i64,
    pub healing_done: i64,
    pub kills: u32,
    pub ultimates_used: u32,
}

/// Aggregate statistics. Never read by resolution logic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub per_character: FxHashMap<InstanceId, CharacterTally>,
    pub ultimates_used: SideMap<u32>,
    pub skipped_turns: u32,
    pub missed_turns: u32,
}

impl BattleStats {
    /// Fold one action's outcomes into the tallies of its caster.
    pub fn record(&mut self, caster: &InstanceId, outcomes: &[EffectOutcome]) {
        let tally = self.per_character.entry(caster.clone()).or_default();
        for outcome in outcomes {
            tally.damage_dealt += outcome.damage_dealt();
            tally.healing_done += outcome.healing_done();
            if outcome.is_kill() {
                tally.kills += 1;
            }
        }
    }

    pub fn record_ultimate(&mut self, side: Side, caster: &InstanceId) {
        self.ultimates_used[side] += 1;
        self.per_character.entry(caster.clone()).or_default().ultimates_used += 1;
    }

    #[must_use]
    pub fn tally(&self, id: &InstanceId) -> CharacterTally {
        self.per_character.get(id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn total_ultimates(&self) -> u32 {
        self.ultimates_used[Side::A] + self.ultimates_used[Side::B]
    }
}

/// Mutable state of one battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub teams: SideMap<Team>,

    /// Completed actions so far.
    pub turn_counter: u32,

    pub current_turn_owner: Side,

    /// Roster position each side starts scanning from for its next actor.
    pub acting_index: SideMap<usize>,

    /// Damage instances landed since the side took control.
    pub combo: SideMap<u32>,

    pub stats: BattleStats,

    pub log: Vector<ActionRecord>,
}

impl BattleState {
    /// Fresh state; side A acts first.
    #[must_use]
    pub fn new(teams: SideMap<Team>) -> Self {
        Self {
            teams,
            turn_counter: 0,
            current_turn_owner: Side::A,
            acting_index: SideMap::with_value(0),
            combo: SideMap::with_value(0),
            stats: BattleStats::default(),
            log: Vector::new(),
        }
    }

    /// Roster position of the side's next actor, if anyone is alive.
    #[must_use]
    pub fn acting_position(&self, side: Side) -> Option<usize> {
        self.teams[side].next_living_from(self.acting_index[side])
    }

    #[must_use]
    pub fn character(&self, id: &InstanceId) -> Option<&CharacterInstance> {
        self.teams.iter().find_map(|(_, team)| team.get(id))
    }

    /// Record a completed action, move the acting side's cursor past its
    /// actor, and hand control to the other side.
    pub fn complete_action(&mut self, actor_position: usize, record: ActionRecord) {
        let side = self.current_turn_owner;
        let len = self.teams[side].len().max(1);
        self.acting_index[side] = (actor_position + 1) % len;
        self.combo[side] = 0;
        self.current_turn_owner = side.opponent();
        self.turn_counter += 1;
        self.log.push_back(record);
    }

    /// Sides with no living members.
    pub fn wiped_out(&self) -> impl Iterator<Item = Side> + '_ {
        Side::BOTH
            .into_iter()
            .filter(|&side| self.teams[side].is_wiped_out())
    }

    /// Winner once either side is empty.
    ///
    /// If both are empty at once, the side that was not acting loses, so
    /// `acting` wins.
    #[must_use]
    pub fn winner(&self, acting: Side) -> Option<Side> {
        let a_out = self.teams[Side::A].is_wiped_out();
        let b_out = self.teams[Side::B].is_wiped_out();
        match (a_out, b_out) {
            (false, false) => None,
            (true, false) => Some(Side::B),
            (false, true) => Some(Side::A),
            (true, true) => Some(acting),
        }
    }
}
