//! Animation queue tests.
//!
//! These tests verify the queue's completion contract through the public
//! API:
//! - Strict submission order on the main lane
//! - Idle only after every completion callback has fired
//! - Overlapping priority feedback and failing renderers

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use toy_arena::core::InstanceId;
use toy_arena::error::PresentationError;
use toy_arena::presentation::{
    Anchor, AnimationQueue, Delivery, Feedback, PresentationItem, PresentationKind, PresentationRequest, QueueEvent,
    Renderer, SpellSequence, Ticket,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Renderer that appends to a shared log.
struct Recorder(Rc<RefCell<Vec<String>>>);

impl Renderer for Recorder {
    fn item_started(&mut self, item: &PresentationItem) -> Result<(), PresentationError> {
        self.0.borrow_mut().push(format!("start {}", item.kind));
        Ok(())
    }

    fn item_completed(&mut self, item: &PresentationItem) -> Result<(), PresentationError> {
        self.0.borrow_mut().push(format!("complete {}", item.kind));
        Ok(())
    }
}

struct Broken;

impl Renderer for Broken {
    fn item_started(&mut self, _item: &PresentationItem) -> Result<(), PresentationError> {
        Err(PresentationError::new("canvas lost"))
    }
}

// ============================================================================
// Completion contract
// ============================================================================

/// Three items of 300/500/400 complete in order, and idle is signalled only
/// after all three completion callbacks have fired.
#[test]
fn test_three_items_complete_in_order_then_idle() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let mut queue = AnimationQueue::new();
    for (label, duration) in [("first", 300), ("second", 500), ("third", 400)] {
        let log = Rc::clone(&fired);
        queue.enqueue(
            PresentationRequest::new(PresentationKind::Notification)
                .with_duration(ms(duration))
                .on_complete(move |_| {
                    log.borrow_mut().push(label);
                    Ok(())
                }),
        );
    }

    let mut idle_at = None;
    for step in 1..=15u64 {
        let events = queue.advance(ms(100));
        if events.contains(&QueueEvent::Idle) {
            assert_eq!(*fired.borrow(), vec!["first", "second", "third"]);
            assert_eq!(events.last(), Some(&QueueEvent::Idle));
            idle_at = Some(step * 100);
            break;
        }
        assert!(fired.borrow().len() < 3, "idle must accompany the last completion");
        assert!(!queue.is_idle());
    }
    assert_eq!(idle_at, Some(1200));
}

#[test]
fn test_completions_follow_the_clock() {
    let mut queue = AnimationQueue::new();
    queue.enqueue(PresentationRequest::new(PresentationKind::Cast).with_duration(ms(300)));
    queue.enqueue(PresentationRequest::new(PresentationKind::Impact).with_duration(ms(500)));

    assert!(queue.advance(ms(299)).iter().all(|e| !matches!(e, QueueEvent::ItemCompleted { .. })));
    let events = queue.advance(ms(1));
    assert!(matches!(
        events.as_slice(),
        [
            QueueEvent::ItemCompleted { kind: PresentationKind::Cast, .. },
            QueueEvent::ItemStarted { kind: PresentationKind::Impact, .. }
        ]
    ));
    assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::Impact));
    assert_eq!(queue.clock(), ms(300));
}

#[test]
fn test_renderer_sees_every_item_and_failures_do_not_stall() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut queue = AnimationQueue::new()
        .with_renderer(Box::new(Broken))
        .with_renderer(Box::new(Recorder(Rc::clone(&log))));

    queue.enqueue(PresentationRequest::new(PresentationKind::Cast));
    queue.enqueue(
        PresentationRequest::new(PresentationKind::Impact).on_complete(|_| Err(PresentationError::new("boom"))),
    );
    let events = queue.advance(ms(2_000));

    assert_eq!(events.last(), Some(&QueueEvent::Idle));
    assert_eq!(
        *log.borrow(),
        vec!["start cast", "complete cast", "start impact", "complete impact"]
    );
}

// ============================================================================
// Composite sequences
// ============================================================================

#[test]
fn test_spell_sequence_plays_numbers_over_the_impact() {
    let target = InstanceId::new("player2-robo_fighter-0");
    let requests = SpellSequence::new(InstanceId::new("player1-wizard_toy-2"), "Fireball")
        .with_delivery(Delivery::Projectile)
        .with_caster_anchor(Anchor::new(0.0, 0.0))
        .with_target(target.clone(), Some(Anchor::new(300.0, 400.0)))
        .with_feedback([Feedback::Damage {
            target,
            amount: 21,
            critical: false,
        }])
        .build_with_ticket(Ticket(9));

    let mut queue = AnimationQueue::new();
    queue.enqueue_all(requests);

    // cast 300, travel clamp(500 * 2) = 1000, impact 400
    let events = queue.advance(ms(1_300));
    assert!(events
        .iter()
        .any(|e| matches!(e, QueueEvent::ItemStarted { kind: PresentationKind::DamageNumber, .. })));
    assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::Impact));

    let events = queue.advance(ms(400));
    assert!(events
        .iter()
        .any(|e| matches!(e, QueueEvent::ItemCompleted { ticket: Some(Ticket(9)), .. })));
    // The floating number outlives the impact by 600
    assert!(!queue.is_idle());
    let events = queue.advance(ms(600));
    assert_eq!(events.last(), Some(&QueueEvent::Idle));
}

#[test]
fn test_catch_up_halves_new_items() {
    let mut queue = AnimationQueue::new();
    queue.set_catch_up(true);
    queue.enqueue(PresentationRequest::new(PresentationKind::Ultimate));
    assert_eq!(queue.current().map(|i| i.duration), Some(ms(1_000)));

    let events = queue.advance(ms(1_000));
    assert_eq!(events.last(), Some(&QueueEvent::Idle));
}
