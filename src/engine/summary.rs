//! End-of-battle summary handed to the results screen.

use serde::{Deserialize, Serialize};

use crate::core::{BattleState, InstanceId, Side};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub instance_id: InstanceId,
    pub name: String,
    pub side: Side,
    pub damage_dealt: i64,
    pub healing_done: i64,
    pub kills: u32,
    pub ultimates_used: u32,
    pub survived: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSummary {
    pub winner: Side,
    /// Completed actions.
    pub turns: u32,
    pub ultimates_used: u32,
    /// Both rosters in order, side A first.
    pub characters: Vec<CharacterSummary>,
    /// The loser disconnected.
    #[serde(default)]
    pub forfeit: bool,
}

impl BattleSummary {
    #[must_use]
    pub fn from_state(state: &BattleState, winner: Side) -> Self {
        let characters = state
            .teams
            .iter()
            .flat_map(|(side, team)| {
                team.members().iter().map(move |c| {
                    let tally = state.stats.tally(&c.instance_id);
                    CharacterSummary {
                        instance_id: c.instance_id.clone(),
                        name: c.name.clone(),
                        side,
                        damage_dealt: tally.damage_dealt,
                        healing_done: tally.healing_done,
                        kills: tally.kills,
                        ultimates_used: tally.ultimates_used,
                        survived: c.is_alive(),
                    }
                })
            })
            .collect();

        Self {
            winner,
            turns: state.turn_counter,
            ultimates_used: state.stats.total_ultimates(),
            characters,
            forfeit: false,
        }
    }

    #[must_use]
    pub fn with_forfeit(mut self) -> Self {
        self.forfeit = true;
        self
    }

    #[must_use]
    pub fn character(&self, id: &InstanceId) -> Option<&CharacterSummary> {
        self.characters.iter().find(|c| &c.instance_id == id)
    }

    /// Top damage dealer on the winning side.
    #[must_use]
    pub fn most_valuable(&self) -> Option<&CharacterSummary> {
        self.characters
            .iter()
            .filter(|c| c.side == self.winner)
            .max_by_key(|c| (c.damage_dealt, c.kills))
    }

    #[must_use]
    pub fn total_damage(&self, side: Side) -> i64 {
        self.characters
            .iter()
            .filter(|c| c.side == side)
            .map(|c| c.damage_dealt)
            .sum()
    }
}
