//! Authoritative roster snapshots.
//!
//! Every field the arbiter may omit is optional on the wire so a bad
//! snapshot still decodes; [`BattleSnapshot::teams`] then decides whether it
//! is usable. The snapshot is also the engine's export shape.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::characters::{CharacterInstance, CombatStats, Rarity, StatusRecord, Team};
use crate::core::{BattleState, CharacterId, InstanceId, Side, SideMap, DEFAULT_MISS_CHANCE};
use crate::error::SyncError;

/// Arbiter-side name for a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Player1,
    Player2,
}

impl Participant {
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Participant::Player1 => Side::A,
            Participant::Player2 => Side::B,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Participant::Player1 => "player1",
            Participant::Player2 => "player2",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "player1" => Some(Participant::Player1),
            "player2" => Some(Participant::Player2),
            _ => None,
        }
    }
}

impl From<Side> for Participant {
    fn from(side: Side) -> Self {
        match side {
            Side::A => Participant::Player1,
            Side::B => Participant::Player2,
        }
    }
}

/// Status block of a wire character.
///
/// The arbiter sends `accuracyDebuff` as a turn count; values in `0..=1`
/// are read as a miss chance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStatus {
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub accuracy_debuff: Option<f64>,
    #[serde(default)]
    pub damage_buff: Option<i64>,
    #[serde(default)]
    pub critical_buff: Option<f64>,
    #[serde(default)]
    pub critical_buff_permanent: bool,
}

impl WireStatus {
    #[must_use]
    pub fn from_record(status: &StatusRecord) -> Self {
        let critical = status.critical_bonus();
        Self {
            frozen: status.is_frozen(),
            accuracy_debuff: status.accuracy_debuff,
            damage_buff: status.damage_buff.filter(|b| *b > 0),
            critical_buff: (critical > 0.0).then_some(critical),
            critical_buff_permanent: status.critical_buff_once == 0.0,
        }
    }

    /// Rebuild a status record around the given shield.
    #[must_use]
    pub fn to_record(&self, shield: i64) -> StatusRecord {
        let mut status = StatusRecord {
            shield: shield.max(0),
            ..StatusRecord::default()
        };
        if self.frozen {
            status.freeze(1);
        }
        match self.accuracy_debuff {
            Some(chance) if chance > 0.0 && chance <= 1.0 => status.debuff_accuracy(chance),
            Some(turns) if turns > 1.0 => status.debuff_accuracy(DEFAULT_MISS_CHANCE),
            _ => {}
        }
        if let Some(bonus) = self.damage_buff.filter(|b| *b > 0) {
            status.add_damage_buff(bonus);
        }
        if let Some(boost) = self.critical_buff.filter(|b| *b > 0.0) {
            status.add_critical_buff(boost, self.critical_buff_permanent);
        }
        status
    }
}

/// One character as the arbiter describes it.
///
/// Also used for bare character references (caster, targets), where the
/// health fields are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCharacter {
    #[serde(default)]
    pub instance_id: Option<InstanceId>,
    #[serde(default)]
    pub id: Option<CharacterId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team: Option<Participant>,
    #[serde(default)]
    pub rarity: Option<Rarity>,
    #[serde(default)]
    pub current_health: Option<i64>,
    #[serde(default)]
    pub max_health: Option<i64>,
    #[serde(default)]
    pub is_alive: Option<bool>,
    #[serde(default)]
    pub shields: i64,
    #[serde(default)]
    pub status: WireStatus,
}

impl WireCharacter {
    #[must_use]
    pub fn from_instance(c: &CharacterInstance) -> Self {
        Self {
            instance_id: Some(c.instance_id.clone()),
            id: Some(c.character_id.clone()),
            name: Some(c.name.clone()),
            team: Some(c.side.into()),
            rarity: Some(c.rarity),
            current_health: Some(c.current_health),
            max_health: Some(c.max_health),
            is_alive: Some(c.is_alive()),
            shields: c.status.shield,
            status: WireStatus::from_record(&c.status),
        }
    }

    /// Bare reference: identity only.
    #[must_use]
    pub fn reference(c: &CharacterInstance) -> Self {
        Self {
            current_health: None,
            max_health: None,
            is_alive: None,
            shields: 0,
            status: WireStatus::default(),
            ..Self::from_instance(c)
        }
    }

    /// Mirror this character locally. Missing identity or health fields
    /// make the snapshot unusable.
    pub fn to_instance(&self, side: Side) -> Result<CharacterInstance, SyncError> {
        let instance_id = self
            .instance_id
            .clone()
            .ok_or_else(|| SyncError::MalformedSnapshot(format!("{side} character without instanceId")))?;
        let missing = |field: &str| SyncError::MalformedSnapshot(format!("`{instance_id}` is missing {field}"));
        let max_health = self.max_health.ok_or_else(|| missing("maxHealth"))?;
        let mut current_health = self.current_health.ok_or_else(|| missing("currentHealth"))?;
        if max_health <= 0 {
            return Err(SyncError::MalformedSnapshot(format!(
                "`{instance_id}` has non-positive maxHealth {max_health}"
            )));
        }
        if self.is_alive == Some(false) {
            current_health = 0;
        }

        let rarity = self.rarity.unwrap_or_default();
        let status = self.status.to_record(self.shields);

        Ok(CharacterInstance {
            character_id: self
                .id
                .clone()
                .unwrap_or_else(|| CharacterId::new(instance_id.as_str())),
            name: self.name.clone().unwrap_or_else(|| instance_id.to_string()),
            instance_id,
            side,
            rarity,
            stats: CombatStats::default(),
            current_health: current_health.clamp(0, max_health),
            max_health,
            abilities: Vec::new(),
            status,
        })
    }
}

/// Full post-action state of both rosters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshot {
    #[serde(default)]
    pub battle_id: Option<String>,
    #[serde(default)]
    pub current_turn: Option<Participant>,
    #[serde(default)]
    pub turn_number: Option<u32>,
    #[serde(default)]
    pub player1_team: Vec<WireCharacter>,
    #[serde(default)]
    pub player2_team: Vec<WireCharacter>,
    #[serde(default)]
    pub is_complete: bool,
    /// Participant name or participant id, depending on the arbiter.
    #[serde(default)]
    pub winner: Option<String>,
}

impl BattleSnapshot {
    #[must_use]
    pub fn from_state(state: &BattleState, battle_id: Option<&str>, winner: Option<Side>) -> Self {
        let roster = |side: Side| -> Vec<WireCharacter> {
            state.teams[side]
                .members()
                .iter()
                .map(WireCharacter::from_instance)
                .collect()
        };
        Self {
            battle_id: battle_id.map(str::to_owned),
            current_turn: Some(state.current_turn_owner.into()),
            turn_number: Some(state.turn_counter),
            player1_team: roster(Side::A),
            player2_team: roster(Side::B),
            is_complete: winner.is_some(),
            winner: winner.map(|s| Participant::from(s).as_str().to_owned()),
        }
    }

    #[must_use]
    pub fn roster(&self, side: Side) -> &[WireCharacter] {
        match side {
            Side::A => &self.player1_team,
            Side::B => &self.player2_team,
        }
    }

    /// Winner as a side, when it is given by participant name.
    #[must_use]
    pub fn winner_side(&self) -> Option<Side> {
        self.winner.as_deref().and_then(Participant::parse).map(Participant::side)
    }

    /// Validate and mirror both rosters.
    pub fn teams(&self) -> Result<SideMap<Team>, SyncError> {
        let team = |side: Side| -> Result<Team, SyncError> {
            let roster = self.roster(side);
            if roster.is_empty() {
                return Err(SyncError::MalformedSnapshot(format!("{side} roster is empty")));
            }
            let members = roster
                .iter()
                .map(|c| c.to_instance(side))
                .collect::<Result<Vec<_>, _>>()?;
            Team::new(side, members).map_err(|e| SyncError::MalformedSnapshot(e.to_string()))
        };
        Ok(SideMap::from_pair(team(Side::A)?, team(Side::B)?))
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SyncError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SyncError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Hash of the binary encoding; equal snapshots share a fingerprint.
    pub fn fingerprint(&self) -> Result<u64, SyncError> {
        let mut hasher = FxHasher::default();
        hasher.write(&self.to_bytes()?);
        Ok(hasher.finish())
    }
}
