//! Ability catalog types.
//!
//! ## Key Types
//!
//! - `EffectKind`: Closed set of effect kinds, parsed from wire names
//! - `TargetingMode`: Target pool shape, derived from the kind
//! - `Ability`: Static description of one action (magnitudes, weight, ultimate flag)

pub mod ability;
pub mod kind;

pub use ability::Ability;
pub use kind::{EffectKind, TargetingMode};
