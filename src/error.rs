//! Error types surfaced by the battle engine, presentation queue and sync layer.
//!
//! Configuration problems reject battle start. Engine misuse (acting while an
//! action is still in flight, choosing a target outside the pool) is reported
//! as a typed error rather than a panic. Target-selection timeouts and
//! opponent disconnects are not errors.

use thiserror::Error;

use crate::core::{AbilityId, InstanceId, Side};

pub type Result<T> = std::result::Result<T, BattleError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BattleError {
    #[error("{side} roster must have exactly {expected} characters, found {found}")]
    RosterSize {
        side: Side,
        expected: usize,
        found: usize,
    },

    #[error("unknown ability effect kind `{0}`")]
    UnknownEffectKind(String),

    #[error("duplicate character instance `{0}`")]
    DuplicateInstance(InstanceId),

    #[error("character `{0}` must have positive max health")]
    InvalidMaxHealth(InstanceId),

    #[error("unknown character template `{0}`")]
    UnknownTemplate(String),

    #[error("invalid battle configuration: {0}")]
    InvalidConfig(String),

    #[error("battle has not been started")]
    NotStarted,

    #[error("battle has already been started")]
    AlreadyStarted,

    #[error("an action is already in flight for {0}")]
    ActionInFlight(Side),

    #[error("no target selection is pending")]
    NoPendingSelection,

    #[error("`{target}` is not a valid target for `{ability}`")]
    InvalidTarget {
        ability: AbilityId,
        target: InstanceId,
    },

    #[error("presentation ticket {0} does not match the action in flight")]
    UnexpectedTicket(u64),

    #[error("character `{0}` is not part of this battle")]
    UnknownInstance(InstanceId),
}

/// Failure reported by a renderer callback.
///
/// The queue logs and swallows these; they never stall the turn loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("presentation callback failed: {0}")]
pub struct PresentationError(pub String);

impl PresentationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("message is not valid protocol JSON")]
    Decode(#[from] serde_json::Error),

    #[error("snapshot encoding failed")]
    Encode(#[from] bincode::Error),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("battle desynchronized after {0} consecutive malformed snapshots")]
    Desynchronized(u32),

    #[error("`{event}` is not valid while the session is {phase}")]
    UnexpectedEvent {
        event: &'static str,
        phase: &'static str,
    },

    #[error("no target request is pending")]
    NoPendingRequest,

    #[error("`{0}` is not in the requested target pool")]
    TargetNotOffered(InstanceId),

    #[error(transparent)]
    Battle(#[from] BattleError),
}
