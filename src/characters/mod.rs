//! Character system: templates, instances, status, teams and registry.
//!
//! ## Key Types
//!
//! - `CharacterTemplate`: Static toy definition (rarity, health, abilities)
//! - `CharacterInstance`: Runtime combatant (health, stats, status)
//! - `StatusRecord`: Shield, freeze, accuracy debuff and buffs of one character
//! - `Team`: Ordered roster for one side
//! - `CharacterRegistry`: Template lookup, preloaded with the built-in toys

mod builtin;
pub mod definition;
pub mod instance;
pub mod rarity;
pub mod registry;
pub mod stats;
pub mod status;
pub mod team;

pub use definition::CharacterTemplate;
pub use instance::{CharacterInstance, HealthChange};
pub use rarity::Rarity;
pub use registry::CharacterRegistry;
pub use stats::CombatStats;
pub use status::StatusRecord;
pub use team::Team;
