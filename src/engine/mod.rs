//! Battle resolution engine.
//!
//! Decides who acts, with what ability, against whom; applies outcomes;
//! hands presentation to the animation queue; detects the end of battle.
//!
//! ## Key Types
//!
//! - `BattleEngine`: Turn state machine owning all combat state
//! - `TurnStep`: What one engine call produced
//! - `SelectionRequest` / `SelectionResolved`: Human target selection events
//! - `BattleSummary`: Winner and per-character tallies
//! - `BattleDriver`: Cooperative loop forwarding queue completions to the engine

mod battle;
mod driver;
mod selection;
mod summary;

pub use battle::{BattleEngine, EnginePhase, TurnStage, TurnStep};
pub use driver::{BattleDriver, DriverStatus};
pub use selection::{Countdown, SelectionRequest, SelectionResolved};
pub use summary::{BattleSummary, CharacterSummary};
