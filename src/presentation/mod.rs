//! Animation sequencing for battle presentation.
//!
//! The engine decides outcomes; this module only decides *when* the
//! renderer shows them. Items play strictly in submission order on the main
//! lane, with priority items (floating numbers) overlapping.
//!
//! ## Key Types
//!
//! - `AnimationQueue`: Virtual-time scheduler with main and overlay lanes
//! - `PresentationRequest`: One item with duration, callbacks and priority
//! - `PresentationKind`: Item kinds and their default durations
//! - `SpellSequence`: Expands one action into cast → travel → impact → numbers
//! - `Ticket`: Marks the item whose completion ends an action

mod item;
mod queue;
mod sequence;

pub use item::{
    Anchor, Callback, Cue, PresentationId, PresentationItem, PresentationKind, PresentationRequest, Ticket,
};
pub use queue::{AnimationQueue, QueueEvent, Renderer};
pub use sequence::{missed, notification, turn_skipped, Delivery, Feedback, SpellSequence};
