//! Human target selection.
//!
//! When a human-controlled side casts a single-target ability the engine
//! suspends and exposes a [`SelectionRequest`]. The turn resumes on an
//! explicit choice or when the [`Countdown`] runs out, in which case a
//! uniformly random member of the still-valid pool is used.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::core::{AbilityId, InstanceId, Side};
use crate::effects::TargetList;

/// Cooperative countdown driven by elapsed virtual time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self { remaining: total }
    }

    /// Consume `elapsed`. Returns `true` once the countdown has run out.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.is_expired()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Whole seconds left, rounded up, for display.
    #[must_use]
    pub fn seconds_left(&self) -> u64 {
        let secs = self.remaining.as_secs();
        if self.remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

/// "Selection requested" event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub side: Side,
    pub caster: InstanceId,
    pub ability: AbilityId,
    pub ability_name: String,
    pub valid_targets: TargetList,
    pub countdown: Duration,
}

/// "Selection resolved" event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResolved {
    /// `None` when the pool emptied before the countdown expired.
    pub target: Option<InstanceId>,
    pub timed_out: bool,
}

/// A suspended turn waiting for a target.
#[derive(Clone, Debug)]
pub(crate) struct PendingSelection {
    pub request: SelectionRequest,
    pub ability: Ability,
    pub actor_position: usize,
    pub countdown: Countdown,
}

impl PendingSelection {
    pub fn new(request: SelectionRequest, ability: Ability, actor_position: usize) -> Self {
        let countdown = Countdown::new(request.countdown);
        Self {
            request,
            ability,
            actor_position,
            countdown,
        }
    }

    /// Offered targets that are also in `current`, in offer order.
    pub fn still_valid(&self, current: &TargetList) -> TargetList {
        self.request
            .valid_targets
            .iter()
            .filter(|id| current.contains(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_countdown_expires() {
        let mut countdown = Countdown::new(Duration::from_secs(10));
        assert_eq!(countdown.seconds_left(), 10);
        assert!(!countdown.tick(Duration::from_millis(9500)));
        assert_eq!(countdown.seconds_left(), 1);
        assert!(countdown.tick(Duration::from_secs(1)));
        assert!(countdown.is_expired());
        assert_eq!(countdown.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_still_valid_keeps_offer_order() {
        let request = SelectionRequest {
            side: Side::A,
            caster: InstanceId::new("a-0"),
            ability: AbilityId::new("zap"),
            ability_name: "Zap".into(),
            valid_targets: smallvec![InstanceId::new("b-0"), InstanceId::new("b-1"), InstanceId::new("b-2")],
            countdown: Duration::from_secs(10),
        };
        let pending = PendingSelection::new(request, Ability::basic_attack(), 0);
        let current: TargetList = smallvec![InstanceId::new("b-2"), InstanceId::new("b-0")];
        assert_eq!(
            pending.still_valid(&current).as_slice(),
            &[InstanceId::new("b-0"), InstanceId::new("b-2")]
        );
    }
}
