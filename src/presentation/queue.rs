//! Animation sequencing queue.
//!
//! Two lanes share one virtual clock:
//!
//! - **main**: strict FIFO, one item at a time, in submission order
//! - **overlay**: priority items and companions, started immediately and
//!   played concurrently with the main lane
//!
//! Time only moves through [`AnimationQueue::advance`]. Completion order
//! within one call follows the clock: an item whose duration elapses earlier
//! completes earlier, and the next main item starts at the exact instant its
//! predecessor finished.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};

use super::item::{Callback, PresentationId, PresentationItem, PresentationKind, PresentationRequest, Ticket};
use crate::error::PresentationError;

/// Notification emitted by the queue.
#[derive(Clone, Debug, PartialEq)]
pub enum QueueEvent {
    ItemStarted {
        id: PresentationId,
        kind: PresentationKind,
    },
    ItemCompleted {
        id: PresentationId,
        kind: PresentationKind,
        ticket: Option<Ticket>,
    },
    /// Both lanes drained after at least one completion.
    Idle,
}

/// External renderer notified of every item.
///
/// Errors are logged and swallowed.
pub trait Renderer {
    fn item_started(&mut self, _item: &PresentationItem) -> Result<(), PresentationError> {
        Ok(())
    }

    fn item_completed(&mut self, _item: &PresentationItem) -> Result<(), PresentationError> {
        Ok(())
    }
}

struct Playing {
    item: PresentationItem,
    remaining: Duration,
    on_complete: Option<Callback>,
}

/// Cooperative scheduler for presentation items.
///
/// ```
/// use std::time::Duration;
/// use toy_arena::presentation::{AnimationQueue, PresentationKind, PresentationRequest, QueueEvent};
///
/// let mut queue = AnimationQueue::new();
/// queue.enqueue(PresentationRequest::new(PresentationKind::Cast));
/// queue.enqueue(PresentationRequest::new(PresentationKind::Impact));
///
/// let events = queue.advance(Duration::from_millis(700));
/// assert!(queue.is_idle());
/// assert_eq!(events.last(), Some(&QueueEvent::Idle));
/// ```
#[derive(Default)]
pub struct AnimationQueue {
    pending: VecDeque<(PresentationId, PresentationRequest)>,
    current: Option<Playing>,
    overlay: Vec<Playing>,
    renderers: Vec<Box<dyn Renderer>>,
    events: Vec<QueueEvent>,
    next_id: u64,
    catch_up: bool,
    clock: Duration,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    /// Submit an item.
    ///
    /// Priority items start immediately on the overlay lane. Other items
    /// join the main lane and start at once if it is free.
    pub fn enqueue(&mut self, request: PresentationRequest) -> PresentationId {
        let id = self.allocate_id();
        if request.priority {
            let playing = self.start(id, request);
            self.overlay.push(playing);
        } else {
            self.pending.push_back((id, request));
            if self.current.is_none() {
                self.start_next();
            }
        }
        id
    }

    pub fn enqueue_all(&mut self, requests: impl IntoIterator<Item = PresentationRequest>) -> Vec<PresentationId> {
        requests.into_iter().map(|r| self.enqueue(r)).collect()
    }

    /// Move the clock forward and return every event produced since the
    /// last call, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<QueueEvent> {
        let mut budget = elapsed;
        let mut completed = self.settle();

        while !budget.is_zero() {
            let Some(step) = self.next_deadline() else {
                break;
            };
            let step = step.min(budget);
            for playing in self.current.iter_mut().chain(self.overlay.iter_mut()) {
                playing.remaining = playing.remaining.saturating_sub(step);
            }
            budget -= step;
            self.clock += step;
            completed |= self.settle();
        }
        self.clock += budget;

        if completed && self.is_idle() {
            self.events.push(QueueEvent::Idle);
        }
        std::mem::take(&mut self.events)
    }

    /// Events produced by `enqueue` that no `advance` has returned yet.
    pub fn take_events(&mut self) -> Vec<QueueEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every pending and playing item without firing callbacks.
    ///
    /// Returns how many items were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.len();
        self.pending.clear();
        self.current = None;
        self.overlay.clear();
        self.events.clear();
        if dropped > 0 {
            debug!(dropped, "presentation queue cleared");
        }
        dropped
    }

    /// Halve the duration of items started from now on.
    pub fn set_catch_up(&mut self, enabled: bool) {
        self.catch_up = enabled;
    }

    #[must_use]
    pub fn is_catch_up(&self) -> bool {
        self.catch_up
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.overlay.is_empty() && self.pending.is_empty()
    }

    /// Items waiting or playing on either lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some()) + self.overlay.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item playing on the main lane.
    #[must_use]
    pub fn current(&self) -> Option<&PresentationItem> {
        self.current.as_ref().map(|p| &p.item)
    }

    /// Total virtual time advanced.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    fn allocate_id(&mut self) -> PresentationId {
        let id = PresentationId(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.current
            .iter()
            .chain(self.overlay.iter())
            .map(|p| p.remaining)
            .min()
    }

    fn start_next(&mut self) {
        if let Some((id, request)) = self.pending.pop_front() {
            let playing = self.start(id, request);
            self.current = Some(playing);
        }
    }

    fn start(&mut self, id: PresentationId, mut request: PresentationRequest) -> Playing {
        let mut duration = request.effective_duration();
        if self.catch_up {
            duration /= 2;
        }
        let item = PresentationItem {
            id,
            kind: request.kind,
            cue: std::mem::take(&mut request.cue),
            duration,
            ticket: request.ticket,
        };

        if let Some(callback) = request.on_start.take() {
            report(&item, "start", callback(&item));
        }
        for renderer in &mut self.renderers {
            let result = renderer.item_started(&item);
            report(&item, "start", result);
        }
        self.events.push(QueueEvent::ItemStarted { id, kind: item.kind });

        for companion in std::mem::take(&mut request.companions) {
            let companion_id = self.allocate_id();
            let playing = self.start(companion_id, companion);
            self.overlay.push(playing);
        }

        Playing {
            item,
            remaining: duration,
            on_complete: request.on_complete,
        }
    }

    fn finish(&mut self, mut playing: Playing) {
        if let Some(callback) = playing.on_complete.take() {
            report(&playing.item, "complete", callback(&playing.item));
        }
        for renderer in &mut self.renderers {
            let result = renderer.item_completed(&playing.item);
            report(&playing.item, "complete", result);
        }
        self.events.push(QueueEvent::ItemCompleted {
            id: playing.item.id,
            kind: playing.item.kind,
            ticket: playing.item.ticket,
        });
    }

    /// Complete every item with no time left. Returns whether any did.
    fn settle(&mut self) -> bool {
        let mut completed = false;
        loop {
            let mut progressed = false;

            let mut i = 0;
            while i < self.overlay.len() {
                if self.overlay[i].remaining.is_zero() {
                    let playing = self.overlay.remove(i);
                    self.finish(playing);
                    progressed = true;
                } else {
                    i += 1;
                }
            }

            if self.current.as_ref().is_some_and(|p| p.remaining.is_zero()) {
                if let Some(playing) = self.current.take() {
                    self.finish(playing);
                }
                self.start_next();
                progressed = true;
            }

            if !progressed {
                return completed;
            }
            completed = true;
        }
    }
}

fn report(item: &PresentationItem, stage: &'static str, result: Result<(), PresentationError>) {
    if let Err(error) = result {
        warn!(item = %item.id, kind = %item.kind, stage, %error, "presentation callback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn completed_kinds(events: &[QueueEvent]) -> Vec<PresentationKind> {
        events
            .iter()
            .filter_map(|e| match e {
                QueueEvent::ItemCompleted { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fifo_one_at_a_time() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Cast));
        queue.enqueue(PresentationRequest::new(PresentationKind::Impact));

        assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::Cast));
        assert_eq!(queue.len(), 2);

        let events = queue.advance(ms(299));
        assert!(completed_kinds(&events).is_empty());

        let events = queue.advance(ms(1));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::Cast]);
        assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::Impact));
        assert!(!events.contains(&QueueEvent::Idle));

        let events = queue.advance(ms(400));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::Impact]);
        assert_eq!(events.last(), Some(&QueueEvent::Idle));
        assert!(queue.is_idle());
    }

    #[test]
    fn test_single_advance_crosses_items() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Cast));
        queue.enqueue(PresentationRequest::new(PresentationKind::Impact));
        queue.enqueue(PresentationRequest::new(PresentationKind::DamageNumber));

        // 300 + 400 = 700: damage number starts at 700 and has 700 left at 1000
        let events = queue.advance(ms(1000));
        assert_eq!(
            completed_kinds(&events),
            vec![PresentationKind::Cast, PresentationKind::Impact]
        );
        assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::DamageNumber));

        queue.advance(ms(700));
        assert!(queue.is_idle());
    }

    #[test]
    fn test_priority_plays_alongside_main() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Ultimate));
        queue.enqueue(PresentationRequest::new(PresentationKind::DamageNumber).priority());

        assert_eq!(queue.current().map(|i| i.kind), Some(PresentationKind::Ultimate));
        assert_eq!(queue.len(), 2);

        let events = queue.advance(ms(1000));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::DamageNumber]);
        assert!(!queue.is_idle());

        let events = queue.advance(ms(1000));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::Ultimate]);
        assert_eq!(events.last(), Some(&QueueEvent::Idle));
    }

    #[test]
    fn test_companions_start_with_parent() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Cast));
        queue.enqueue(
            PresentationRequest::new(PresentationKind::Impact)
                .with_companion(PresentationRequest::new(PresentationKind::DamageNumber)),
        );

        // Impact starts at 300; its number runs 300..1300 on the overlay lane
        let events = queue.advance(ms(300));
        let started: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                QueueEvent::ItemStarted { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            started,
            vec![PresentationKind::Cast, PresentationKind::Impact, PresentationKind::DamageNumber]
        );

        let events = queue.advance(ms(400));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::Impact]);
        assert!(!queue.is_idle());

        let events = queue.advance(ms(600));
        assert_eq!(completed_kinds(&events), vec![PresentationKind::DamageNumber]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_failing_callback_does_not_stall() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(
            PresentationRequest::new(PresentationKind::Cast)
                .on_start(|_| Err(PresentationError::new("renderer crashed")))
                .on_complete(|_| Err(PresentationError::new("renderer crashed again"))),
        );
        queue.enqueue(PresentationRequest::new(PresentationKind::Impact));

        let events = queue.advance(ms(700));
        assert_eq!(
            completed_kinds(&events),
            vec![PresentationKind::Cast, PresentationKind::Impact]
        );
        assert!(queue.is_idle());
    }

    #[test]
    fn test_renderer_sees_every_item() {
        struct Log(Rc<RefCell<Vec<String>>>);
        impl Renderer for Log {
            fn item_started(&mut self, item: &PresentationItem) -> Result<(), PresentationError> {
                self.0.borrow_mut().push(format!("start {}", item.kind));
                Ok(())
            }
            fn item_completed(&mut self, item: &PresentationItem) -> Result<(), PresentationError> {
                self.0.borrow_mut().push(format!("done {}", item.kind));
                Err(PresentationError::new("ignored"))
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = AnimationQueue::new().with_renderer(Box::new(Log(Rc::clone(&log))));
        queue.enqueue(PresentationRequest::new(PresentationKind::Miss));
        queue.advance(ms(1000));

        assert_eq!(*log.borrow(), vec!["start miss", "done miss"]);
    }

    #[test]
    fn test_ticket_reported_on_completion() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::TurnSkipped).with_ticket(Ticket(7)));
        let events = queue.advance(ms(1500));
        assert!(events.iter().any(|e| matches!(
            e,
            QueueEvent::ItemCompleted { ticket: Some(Ticket(7)), .. }
        )));
    }

    #[test]
    fn test_catch_up_halves_durations() {
        let mut queue = AnimationQueue::new();
        queue.set_catch_up(true);
        queue.enqueue(PresentationRequest::new(PresentationKind::Ultimate));
        assert_eq!(queue.current().map(|i| i.duration), Some(ms(1000)));
        queue.advance(ms(1000));
        assert!(queue.is_idle());
    }

    #[test]
    fn test_zero_duration_completes_on_next_advance() {
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Notification).with_duration(Duration::ZERO));
        let events = queue.advance(Duration::ZERO);
        assert_eq!(completed_kinds(&events), vec![PresentationKind::Notification]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_clear_drops_everything_silently() {
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        let mut queue = AnimationQueue::new();
        queue.enqueue(PresentationRequest::new(PresentationKind::Cast).on_complete(move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        }));
        queue.enqueue(PresentationRequest::new(PresentationKind::Impact));
        queue.enqueue(PresentationRequest::new(PresentationKind::DamageNumber).priority());

        assert_eq!(queue.clear(), 3);
        assert!(queue.is_idle());
        assert!(queue.advance(ms(5000)).is_empty());
        assert!(!*fired.borrow());
    }
}
