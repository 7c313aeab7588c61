//! Player-vs-player wire protocol.
//!
//! Messages are JSON objects internally tagged by `type` with snake_case
//! event names and camelCase fields. The transport is external; this module
//! only encodes and decodes.

use serde::{Deserialize, Serialize};

use super::snapshot::{BattleSnapshot, WireCharacter};
use crate::core::InstanceId;
use crate::error::SyncError;

/// Default target-selection timeout when the arbiter omits one.
pub const DEFAULT_TARGET_TIMEOUT_MS: u64 = 10_000;

fn default_timeout() -> u64 {
    DEFAULT_TARGET_TIMEOUT_MS
}

/// Events pushed by the arbiter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    BattleInitialized(BattleInitialized),
    RequestTarget(TargetRequest),
    BattleAction(BattleAction),
    BattleComplete(BattleComplete),
    OpponentDisconnected,
}

impl ServerMessage {
    pub fn from_json(text: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Event name as it appears on the wire.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::BattleInitialized(_) => "battle_initialized",
            ServerMessage::RequestTarget(_) => "request_target",
            ServerMessage::BattleAction(_) => "battle_action",
            ServerMessage::BattleComplete(_) => "battle_complete",
            ServerMessage::OpponentDisconnected => "opponent_disconnected",
        }
    }
}

/// Events sent to the arbiter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    BattleReady(BattleReady),
    SelectTarget(SelectTarget),
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleInitialized {
    pub state: BattleSnapshot,
    /// Shared seed; derived from the battle id when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRequest {
    pub ability: WireAbility,
    pub caster: WireCharacter,
    pub valid_targets: Vec<WireCharacter>,
    /// Milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleAction {
    pub action: WireAction,
    /// Post-action rosters, kept undecoded so a missing or mistyped
    /// snapshot reaches the session as a malformed turn.
    #[serde(default)]
    pub state: Option<serde_json::Value>,
}

impl BattleAction {
    /// Decode the post-action snapshot.
    pub fn snapshot(&self) -> Result<BattleSnapshot, SyncError> {
        let value = self
            .state
            .as_ref()
            .ok_or_else(|| SyncError::MalformedSnapshot("battle action without state".into()))?;
        BattleSnapshot::deserialize(value).map_err(|e| SyncError::MalformedSnapshot(format!("unreadable state: {e}")))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleComplete {
    /// Participant name (`player1`/`player2`) or participant id.
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub final_state: Option<BattleSnapshot>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReady {
    pub battle_id: String,
    pub participant_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTarget {
    pub battle_id: String,
    pub target_instance_id: InstanceId,
    pub participant_id: String,
}

/// Ability as echoed by the arbiter. Only presentation uses it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAbility {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Effect kind string, e.g. `damage_all`.
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub damage: i64,
    #[serde(default)]
    pub heal: i64,
    #[serde(default)]
    pub shield: i64,
    #[serde(default, alias = "ultimate")]
    pub is_ultimate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireActionKind {
    AbilityUsed,
    SkipTurn,
    #[serde(other)]
    Unknown,
}

/// One resolved action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAction {
    #[serde(rename = "type")]
    pub kind: WireActionKind,
    #[serde(default)]
    pub turn_number: Option<u32>,
    #[serde(default)]
    pub caster: Option<WireCharacter>,
    #[serde(default)]
    pub ability: Option<WireAbility>,
    #[serde(default)]
    pub targets: Vec<WireCharacter>,
    #[serde(default)]
    pub effects: Vec<WireEffect>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireEffectKind {
    Damage,
    Heal,
    Shield,
    #[serde(other)]
    Other,
}

/// Effect already computed by the arbiter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEffect {
    pub target_id: InstanceId,
    #[serde(rename = "type")]
    pub kind: WireEffectKind,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub freeze: bool,
}
