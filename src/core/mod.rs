//! Core battle types: sides, identifiers, state, actions, RNG, configuration.
//!
//! Everything here is independent of how abilities resolve or how a turn
//! is presented. Battles are tuned via `BattleConfig` rather than by
//! modifying the engine.

pub mod action;
pub mod config;
pub mod ids;
pub mod rng;
pub mod side;
pub mod state;

pub use action::{ActionKind, ActionRecord};
pub use config::{BattleConfig, BattleMode, Controller, DamageModelKind, DEFAULT_MISS_CHANCE, TEAM_SIZE};
pub use ids::{AbilityId, CharacterId, InstanceId};
pub use rng::{battle_seed, ArbiterRandom, GameRng, RandomSource};
pub use side::{Side, SideMap};
pub use state::{BattleState, BattleStats, CharacterTally};
