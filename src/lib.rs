//! # toy-arena
//!
//! A turn-based battle engine for teams of three toy characters, with an
//! animation sequencing queue and a player-vs-player synchronization layer.
//!
//! ## Design Principles
//!
//! 1. **One Action In Flight**: The engine resolves exactly one acting
//!    character at a time and only advances when the presentation of that
//!    action has completed.
//!
//! 2. **Closed Effect Kinds**: Ability effects are a closed enum with one
//!    resolver per variant, dispatched by exhaustive match.
//!
//! 3. **Cooperative Time**: Nothing blocks. Callers feed elapsed virtual time
//!    into the queue, the selection countdown and the sync session.
//!
//! ## Architecture
//!
//! - **Single Status Record**: Shields, freezes, buffs and debuffs live in one
//!   per-character record.
//!
//! - **Explicit Turn Cursor**: Each side keeps a round-robin cursor over its
//!   living members as engine state.
//!
//! - **Authoritative Mirroring**: In player-vs-player mode outcomes come from
//!   the arbiter and are replayed, never recomputed.
//!
//! ## Modules
//!
//! - `core`: Sides, identifiers, random sources, configuration, battle state
//! - `characters`: Rarity, stats, status record, instances, teams, templates
//! - `abilities`: Abilities, effect kinds, targeting modes
//! - `effects`: Damage models, target pools, effect resolution
//! - `engine`: Turn state machine, target selection, summaries, driver
//! - `presentation`: Animation queue and composite sequences
//! - `sync`: Wire protocol, snapshots, synchronization session

pub mod abilities;
pub mod characters;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod presentation;
pub mod sync;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRecord, BattleConfig, BattleMode, BattleState, Controller, DamageModelKind, GameRng,
    InstanceId, Side, SideMap,
};

pub use crate::characters::{CharacterInstance, CharacterRegistry, CharacterTemplate, Rarity, StatusRecord, Team};

pub use crate::abilities::{Ability, EffectKind, TargetingMode};

pub use crate::effects::{DamageModel, EffectOutcome, EffectResolver, TargetSelector};

pub use crate::engine::{
    BattleDriver, BattleEngine, BattleSummary, DriverStatus, EnginePhase, SelectionRequest, SelectionResolved,
    TurnStep,
};

pub use crate::presentation::{AnimationQueue, PresentationKind, PresentationRequest, QueueEvent, SpellSequence};

pub use crate::sync::{BattleSnapshot, ClientMessage, ServerMessage, SessionPhase, SyncSession};

pub use crate::error::{BattleError, PresentationError, SyncError};
