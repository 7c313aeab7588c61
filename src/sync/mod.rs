//! Player-vs-player synchronization.
//!
//! In player-vs-player mode a remote arbiter resolves every action. The
//! local instance mirrors its snapshots, replays its pre-computed effects
//! through the animation queue and forwards the user's target choices.
//!
//! ## Key Types
//!
//! - `SyncSession`: `AwaitingInitialization → InProgress → Complete | Errored`
//! - `ServerMessage` / `ClientMessage`: JSON wire events
//! - `BattleSnapshot`: Full post-action state of both rosters

mod protocol;
mod session;
mod snapshot;

pub use protocol::{
    BattleAction, BattleComplete, BattleInitialized, BattleReady, ClientMessage, SelectTarget, ServerMessage,
    TargetRequest, WireAbility, WireAction, WireActionKind, WireEffect, WireEffectKind, DEFAULT_TARGET_TIMEOUT_MS,
};
pub use session::{SessionOutcome, SessionPhase, SessionUpdate, SyncSession, TargetPrompt};
pub use snapshot::{BattleSnapshot, Participant, WireCharacter, WireStatus};
