//! Composite sequences: one logical action expanded into ordered items.
//!
//! A spell plays as cast (or ultimate) → travel → impact, with numeric
//! feedback attached to the impact as overlay companions so numbers float
//! while the main lane moves on. Deaths and revives are main-lane items
//! after the impact.

use smallvec::{smallvec, SmallVec};

use super::item::{Anchor, Cue, PresentationKind, PresentationRequest, Ticket};
use crate::abilities::{Ability, EffectKind};
use crate::core::InstanceId;
use crate::effects::EffectOutcome;

/// Numeric or status feedback for one target.
#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
    Damage {
        target: InstanceId,
        amount: i64,
        critical: bool,
    },
    Heal {
        target: InstanceId,
        amount: i64,
    },
    Shield {
        target: InstanceId,
        amount: i64,
    },
    Buff {
        target: InstanceId,
        label: String,
    },
    Debuff {
        target: InstanceId,
        label: String,
    },
    Death {
        target: InstanceId,
    },
    Revive {
        target: InstanceId,
        amount: i64,
    },
}

impl Feedback {
    /// Feedback for one applied outcome. A killing blow yields the damage
    /// number followed by a death.
    #[must_use]
    pub fn from_outcome(outcome: &EffectOutcome) -> SmallVec<[Feedback; 2]> {
        match outcome {
            EffectOutcome::Damage {
                target,
                critical,
                killed,
                ..
            } => {
                let mut out: SmallVec<[Feedback; 2]> = smallvec![Feedback::Damage {
                    target: target.clone(),
                    amount: outcome.damage_dealt(),
                    critical: *critical,
                }];
                if *killed {
                    out.push(Feedback::Death { target: target.clone() });
                }
                out
            }
            EffectOutcome::Heal { target, amount } => smallvec![Feedback::Heal {
                target: target.clone(),
                amount: *amount,
            }],
            EffectOutcome::Revive { target, restored } => smallvec![Feedback::Revive {
                target: target.clone(),
                amount: *restored,
            }],
            EffectOutcome::Shield { target, amount, .. } => smallvec![Feedback::Shield {
                target: target.clone(),
                amount: *amount,
            }],
            EffectOutcome::Freeze { target, .. } => smallvec![Feedback::Debuff {
                target: target.clone(),
                label: "Frozen".into(),
            }],
            EffectOutcome::DamageBuff { target, bonus } => smallvec![Feedback::Buff {
                target: target.clone(),
                label: format!("+{bonus} damage"),
            }],
            EffectOutcome::CriticalBuff { target, bonus, .. } => smallvec![Feedback::Buff {
                target: target.clone(),
                label: format!("+{:.0}% critical", bonus * 100.0),
            }],
            EffectOutcome::AccuracyDebuff { target, .. } => smallvec![Feedback::Debuff {
                target: target.clone(),
                label: "Accuracy down".into(),
            }],
        }
    }

    /// Deaths and revives occupy the main lane; everything else floats.
    #[must_use]
    pub fn is_overlay(&self) -> bool {
        !matches!(self, Feedback::Death { .. } | Feedback::Revive { .. })
    }

    #[must_use]
    pub fn to_request(&self) -> PresentationRequest {
        let (kind, cue) = match self {
            Feedback::Damage {
                target,
                amount,
                critical,
            } => (
                PresentationKind::DamageNumber,
                Cue::target(target.clone()).with_amount(*amount).with_critical(*critical),
            ),
            Feedback::Heal { target, amount } => (
                PresentationKind::HealNumber,
                Cue::target(target.clone()).with_amount(*amount),
            ),
            Feedback::Shield { target, amount } => (
                PresentationKind::ShieldGain,
                Cue::target(target.clone()).with_amount(*amount),
            ),
            Feedback::Buff { target, label } => {
                (PresentationKind::Buff, Cue::target(target.clone()).with_text(label.clone()))
            }
            Feedback::Debuff { target, label } => {
                (PresentationKind::Debuff, Cue::target(target.clone()).with_text(label.clone()))
            }
            Feedback::Death { target } => (PresentationKind::Death, Cue::target(target.clone())),
            Feedback::Revive { target, amount } => (
                PresentationKind::Revive,
                Cue::target(target.clone()).with_amount(*amount),
            ),
        };
        let request = PresentationRequest::new(kind).with_cue(cue);
        if self.is_overlay() {
            request.priority()
        } else {
            request
        }
    }
}

/// How a spell reaches its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Cast, projectile travel, impact.
    Projectile,
    /// Cast, then one area burst.
    Area,
    /// Cast, then a flurry of strikes.
    MultiHit,
    /// A single melee animation with no cast.
    Physical,
}

impl Delivery {
    #[must_use]
    pub fn for_ability(ability: &Ability) -> Self {
        if ability.id.as_str() == "basic_attack" {
            return Delivery::Physical;
        }
        match ability.kind {
            EffectKind::MultiDamage => Delivery::MultiHit,
            _ if ability.targeting().is_single() => Delivery::Projectile,
            _ => Delivery::Area,
        }
    }
}

/// Builder for one action's presentation.
///
/// ```
/// use toy_arena::core::InstanceId;
/// use toy_arena::presentation::{Anchor, Delivery, Feedback, PresentationKind, SpellSequence};
///
/// let target = InstanceId::new("player2-robo_fighter-0");
/// let requests = SpellSequence::new(InstanceId::new("player1-wizard_toy-0"), "Fireball")
///     .with_delivery(Delivery::Projectile)
///     .with_caster_anchor(Anchor::new(0.0, 0.0))
///     .with_target(target.clone(), Some(Anchor::new(300.0, 0.0)))
///     .with_feedback([Feedback::Damage { target, amount: 21, critical: false }])
///     .build();
///
/// let kinds: Vec<_> = requests.iter().map(|r| r.kind).collect();
/// assert_eq!(kinds[0], PresentationKind::Cast);
/// assert_eq!(kinds[2], PresentationKind::Impact);
/// assert_eq!(requests[2].companions.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SpellSequence {
    caster: InstanceId,
    caster_anchor: Option<Anchor>,
    ability_name: String,
    ultimate: bool,
    delivery: Delivery,
    targets: Vec<(InstanceId, Option<Anchor>)>,
    feedback: Vec<Feedback>,
}

impl SpellSequence {
    pub fn new(caster: InstanceId, ability_name: impl Into<String>) -> Self {
        Self {
            caster,
            caster_anchor: None,
            ability_name: ability_name.into(),
            ultimate: false,
            delivery: Delivery::Projectile,
            targets: Vec::new(),
            feedback: Vec::new(),
        }
    }

    /// Sequence for an engine-resolved ability and its outcomes.
    pub fn for_ability(caster: InstanceId, ability: &Ability, targets: &[InstanceId], outcomes: &[EffectOutcome]) -> Self {
        let mut sequence = Self::new(caster, ability.name.clone())
            .with_delivery(Delivery::for_ability(ability))
            .with_feedback(outcomes.iter().flat_map(Feedback::from_outcome));
        sequence.ultimate = ability.is_ultimate;
        sequence.targets = targets.iter().map(|t| (t.clone(), None)).collect();
        sequence
    }

    #[must_use]
    pub fn ultimate(mut self) -> Self {
        self.ultimate = true;
        self
    }

    #[must_use]
    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    #[must_use]
    pub fn with_caster_anchor(mut self, anchor: Anchor) -> Self {
        self.caster_anchor = Some(anchor);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: InstanceId, anchor: Option<Anchor>) -> Self {
        self.targets.push((target, anchor));
        self
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl IntoIterator<Item = Feedback>) -> Self {
        self.feedback.extend(feedback);
        self
    }

    /// Expand into main-lane requests in play order.
    #[must_use]
    pub fn build(self) -> Vec<PresentationRequest> {
        let mut requests = Vec::new();
        let first_target = self.targets.first().cloned();
        let actor_cue = Cue::actor(self.caster.clone()).with_text(self.ability_name.clone());

        let head = if self.ultimate {
            PresentationKind::Ultimate
        } else {
            PresentationKind::Cast
        };

        let strike = match self.delivery {
            Delivery::Physical => {
                let mut cue = actor_cue;
                cue.target = first_target.map(|(id, _)| id);
                PresentationRequest::new(PresentationKind::PhysicalAttack).with_cue(cue)
            }
            Delivery::Projectile => {
                requests.push(PresentationRequest::new(head).with_cue(actor_cue));
                let (target, anchor) = match first_target {
                    Some((id, anchor)) => (Some(id), anchor),
                    None => (None, None),
                };
                let travel = PresentationKind::travel_between(self.caster_anchor, anchor);
                requests.push(PresentationRequest::new(travel).with_cue(Cue {
                    actor: Some(self.caster.clone()),
                    target: target.clone(),
                    ..Cue::default()
                }));
                PresentationRequest::new(PresentationKind::Impact).with_cue(Cue {
                    target,
                    ..Cue::default()
                })
            }
            Delivery::Area | Delivery::MultiHit => {
                requests.push(PresentationRequest::new(head).with_cue(actor_cue));
                let kind = if self.delivery == Delivery::Area {
                    PresentationKind::AreaOfEffect
                } else {
                    PresentationKind::MultiHit
                };
                PresentationRequest::new(kind).with_cue(Cue::actor(self.caster.clone()))
            }
        };

        let (floating, sequential): (Vec<_>, Vec<_>) =
            self.feedback.iter().partition(|f| f.is_overlay());
        let strike = floating
            .into_iter()
            .fold(strike, |strike, f| strike.with_companion(f.to_request()));
        requests.push(strike);
        requests.extend(sequential.into_iter().map(Feedback::to_request));
        requests
    }

    /// Expand and tag the terminal item with `ticket`.
    #[must_use]
    pub fn build_with_ticket(self, ticket: Ticket) -> Vec<PresentationRequest> {
        let mut requests = self.build();
        if let Some(last) = requests.last_mut() {
            last.ticket = Some(ticket);
        }
        requests
    }
}

/// "Turn skipped" banner for a frozen actor.
#[must_use]
pub fn turn_skipped(actor: InstanceId) -> PresentationRequest {
    PresentationRequest::new(PresentationKind::TurnSkipped).with_cue(Cue::actor(actor).with_text("Frozen"))
}

/// "Miss" banner for an actor whose action was nullified.
#[must_use]
pub fn missed(actor: InstanceId) -> PresentationRequest {
    PresentationRequest::new(PresentationKind::Miss).with_cue(Cue::actor(actor).with_text("Miss"))
}

#[must_use]
pub fn notification(text: impl Into<String>) -> PresentationRequest {
    PresentationRequest::new(PresentationKind::Notification).with_cue(Cue::default().with_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> InstanceId {
        InstanceId::new(s)
    }

    fn kinds(requests: &[PresentationRequest]) -> Vec<PresentationKind> {
        requests.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_projectile_order() {
        let requests = SpellSequence::new(id("a-0"), "Zap")
            .with_target(id("b-0"), None)
            .with_feedback([Feedback::Damage {
                target: id("b-0"),
                amount: 21,
                critical: true,
            }])
            .build_with_ticket(Ticket(3));

        assert_eq!(
            kinds(&requests),
            vec![
                PresentationKind::Cast,
                PresentationKind::Travel { distance: None },
                PresentationKind::Impact,
            ]
        );
        let impact = &requests[2];
        assert_eq!(impact.ticket, Some(Ticket(3)));
        assert_eq!(impact.companions.len(), 1);
        assert!(impact.companions[0].priority);
        assert_eq!(impact.companions[0].cue.amount, Some(21));
        assert!(impact.companions[0].cue.critical);
    }

    #[test]
    fn test_deaths_follow_impact_on_main_lane() {
        let outcome = EffectOutcome::Damage {
            target: id("b-0"),
            amount: 15,
            absorbed: 5,
            critical: false,
            killed: true,
        };
        let requests = SpellSequence::new(id("a-0"), "Storm")
            .ultimate()
            .with_delivery(Delivery::Area)
            .with_feedback(Feedback::from_outcome(&outcome))
            .build_with_ticket(Ticket(1));

        assert_eq!(
            kinds(&requests),
            vec![
                PresentationKind::Ultimate,
                PresentationKind::AreaOfEffect,
                PresentationKind::Death,
            ]
        );
        assert_eq!(requests[1].companions[0].cue.amount, Some(20));
        assert_eq!(requests[2].ticket, Some(Ticket(1)));
        assert_eq!(requests[1].ticket, None);
    }

    #[test]
    fn test_physical_attack_skips_cast() {
        let requests = SpellSequence::for_ability(id("a-0"), &Ability::basic_attack(), &[id("b-1")], &[]).build();
        assert_eq!(kinds(&requests), vec![PresentationKind::PhysicalAttack]);
        assert_eq!(requests[0].cue.target, Some(id("b-1")));
    }

    #[test]
    fn test_delivery_for_ability() {
        let multi = Ability::new("flurry", "Flurry", EffectKind::MultiDamage).with_hits(3);
        let heal_all = Ability::new("hug", "Group Hug", EffectKind::HealAll);
        let zap = Ability::new("zap", "Zap", EffectKind::Damage);
        assert_eq!(Delivery::for_ability(&multi), Delivery::MultiHit);
        assert_eq!(Delivery::for_ability(&heal_all), Delivery::Area);
        assert_eq!(Delivery::for_ability(&zap), Delivery::Projectile);
    }

    #[test]
    fn test_status_feedback_labels() {
        let freeze = Feedback::from_outcome(&EffectOutcome::Freeze {
            target: id("b-2"),
            turns: 1,
        });
        assert_eq!(
            freeze[0],
            Feedback::Debuff {
                target: id("b-2"),
                label: "Frozen".into()
            }
        );
        let revive = Feedback::from_outcome(&EffectOutcome::Revive {
            target: id("a-1"),
            restored: 20,
        });
        assert!(!revive[0].is_overlay());
    }
}
