//! Presentation items: what the renderer is asked to show and for how long.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::InstanceId;
use crate::error::PresentationError;

/// Identifier assigned by the queue on enqueue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresentationId(pub u64);

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Presentation({})", self.0)
    }
}

/// Handle the engine attaches to the terminal item of an action; its
/// completion is the engine's cue to advance the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}

/// 2D position of a character's on-screen anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Anchor) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Kind of presentation item. Each kind has a default duration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationKind {
    Cast,
    /// Projectile flight; `distance` is in anchor units when known.
    Travel { distance: Option<f64> },
    Impact,
    DamageNumber,
    HealNumber,
    ShieldGain,
    PhysicalAttack,
    Death,
    Revive,
    Buff,
    Debuff,
    Ultimate,
    MultiHit,
    AreaOfEffect,
    Notification,
    TurnSkipped,
    Miss,
}

impl PresentationKind {
    const TRAVEL_MIN_MS: f64 = 400.0;
    const TRAVEL_MAX_MS: f64 = 1200.0;
    const TRAVEL_DEFAULT_MS: u64 = 800;

    /// Travel between two optional anchors.
    #[must_use]
    pub fn travel_between(from: Option<Anchor>, to: Option<Anchor>) -> Self {
        let distance = from.zip(to).map(|(a, b)| a.distance_to(&b));
        PresentationKind::Travel { distance }
    }

    /// Default duration in milliseconds of virtual time.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        let ms = match self {
            PresentationKind::Cast => 300,
            PresentationKind::Travel { distance: Some(d) } => {
                (d * 2.0).clamp(Self::TRAVEL_MIN_MS, Self::TRAVEL_MAX_MS).round() as u64
            }
            PresentationKind::Travel { distance: None } => Self::TRAVEL_DEFAULT_MS,
            PresentationKind::Impact => 400,
            PresentationKind::DamageNumber | PresentationKind::HealNumber => 1000,
            PresentationKind::ShieldGain => 800,
            PresentationKind::PhysicalAttack => 900,
            PresentationKind::Death => 1000,
            PresentationKind::Revive => 1500,
            PresentationKind::Buff | PresentationKind::Debuff => 800,
            PresentationKind::Ultimate => 2000,
            PresentationKind::MultiHit => 1500,
            PresentationKind::AreaOfEffect => 1200,
            PresentationKind::Notification => 3000,
            PresentationKind::TurnSkipped => 1500,
            PresentationKind::Miss => 1000,
        };
        Duration::from_millis(ms)
    }

    /// Short name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationKind::Cast => "cast",
            PresentationKind::Travel { .. } => "travel",
            PresentationKind::Impact => "impact",
            PresentationKind::DamageNumber => "damage_number",
            PresentationKind::HealNumber => "heal_number",
            PresentationKind::ShieldGain => "shield_gain",
            PresentationKind::PhysicalAttack => "physical_attack",
            PresentationKind::Death => "death",
            PresentationKind::Revive => "revive",
            PresentationKind::Buff => "buff",
            PresentationKind::Debuff => "debuff",
            PresentationKind::Ultimate => "ultimate",
            PresentationKind::MultiHit => "multi_hit",
            PresentationKind::AreaOfEffect => "area_of_effect",
            PresentationKind::Notification => "notification",
            PresentationKind::TurnSkipped => "turn_skipped",
            PresentationKind::Miss => "miss",
        }
    }
}

impl fmt::Display for PresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the renderer should draw: who, on whom, and which number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub actor: Option<InstanceId>,
    pub target: Option<InstanceId>,
    pub amount: Option<i64>,
    pub critical: bool,
    pub text: Option<String>,
}

impl Cue {
    #[must_use]
    pub fn actor(id: InstanceId) -> Self {
        Self {
            actor: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn target(id: InstanceId) -> Self {
        Self {
            target: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A started item as seen by callbacks and renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentationItem {
    pub id: PresentationId,
    pub kind: PresentationKind,
    pub cue: Cue,
    pub duration: Duration,
    pub ticket: Option<Ticket>,
}

/// Per-item renderer hook.
pub type Callback = Box<dyn FnOnce(&PresentationItem) -> Result<(), PresentationError>>;

/// Request to play one presentation item.
///
/// `priority` items start immediately alongside whatever is playing.
/// `companions` start together with this item (also alongside it) and never
/// hold up the main lane.
pub struct PresentationRequest {
    pub kind: PresentationKind,
    pub cue: Cue,
    pub duration: Option<Duration>,
    pub priority: bool,
    pub ticket: Option<Ticket>,
    pub companions: Vec<PresentationRequest>,
    pub(crate) on_start: Option<Callback>,
    pub(crate) on_complete: Option<Callback>,
}

impl PresentationRequest {
    pub fn new(kind: PresentationKind) -> Self {
        Self {
            kind,
            cue: Cue::default(),
            duration: None,
            priority: false,
            ticket: None,
            companions: Vec::new(),
            on_start: None,
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_cue(mut self, cue: Cue) -> Self {
        self.cue = cue;
        self
    }

    /// Override the kind's default duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn priority(mut self) -> Self {
        self.priority = true;
        self
    }

    #[must_use]
    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    #[must_use]
    pub fn with_companion(mut self, companion: PresentationRequest) -> Self {
        self.companions.push(companion);
        self
    }

    #[must_use]
    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&PresentationItem) -> Result<(), PresentationError> + 'static,
    {
        self.on_start = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&PresentationItem) -> Result<(), PresentationError> + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Duration this request will play for at normal speed.
    #[must_use]
    pub fn effective_duration(&self) -> Duration {
        self.duration.unwrap_or_else(|| self.kind.default_duration())
    }
}

impl fmt::Debug for PresentationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationRequest")
            .field("kind", &self.kind)
            .field("cue", &self.cue)
            .field("duration", &self.duration)
            .field("priority", &self.priority)
            .field("ticket", &self.ticket)
            .field("companions", &self.companions)
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(PresentationKind::Cast.default_duration(), Duration::from_millis(300));
        assert_eq!(PresentationKind::Ultimate.default_duration(), Duration::from_millis(2000));
        assert_eq!(PresentationKind::Notification.default_duration(), Duration::from_millis(3000));
        assert_eq!(PresentationKind::Impact.default_duration(), Duration::from_millis(400));
    }

    #[test]
    fn test_travel_scales_with_distance() {
        let near = PresentationKind::travel_between(Some(Anchor::new(0.0, 0.0)), Some(Anchor::new(100.0, 0.0)));
        let mid = PresentationKind::travel_between(Some(Anchor::new(0.0, 0.0)), Some(Anchor::new(300.0, 400.0)));
        let far = PresentationKind::travel_between(Some(Anchor::new(0.0, 0.0)), Some(Anchor::new(2000.0, 0.0)));
        let unknown = PresentationKind::travel_between(None, Some(Anchor::new(1.0, 1.0)));

        assert_eq!(near.default_duration(), Duration::from_millis(400));
        assert_eq!(mid.default_duration(), Duration::from_millis(1000));
        assert_eq!(far.default_duration(), Duration::from_millis(1200));
        assert_eq!(unknown.default_duration(), Duration::from_millis(800));
    }

    #[test]
    fn test_override_duration() {
        let request = PresentationRequest::new(PresentationKind::Cast).with_duration(Duration::from_millis(50));
        assert_eq!(request.effective_duration(), Duration::from_millis(50));
        assert_eq!(
            PresentationRequest::new(PresentationKind::Miss).effective_duration(),
            Duration::from_millis(1000)
        );
    }
}
