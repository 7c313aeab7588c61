//! Effect system for ability resolution.
//!
//! - `EffectOutcome`: One applied change (damage, heal, shield, status)
//! - `DamageModel`: Attack scaling and defense reduction formulas
//! - `TargetSelector`: Target pools and automatic target choice
//! - `EffectResolver`: Applies an ability to resolved targets
//!
//! ## Design Philosophy
//!
//! Resolution is synchronous and atomic: an ability either applies in full
//! to the current teams or fails before touching anything (unknown caster or
//! target). Presentation and turn bookkeeping happen elsewhere.

mod damage;
mod effect;
mod resolver;
mod targeting;

pub use damage::{
    apply_combo, apply_critical, combo_multiplier, model_for, DamageModel, RarityScaledDamageModel,
    StandardDamageModel,
};
pub use effect::{EffectOutcome, TargetList};
pub use resolver::EffectResolver;
pub use targeting::TargetSelector;
