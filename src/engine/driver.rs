//! Cooperative loop wiring the engine to the animation queue.
//!
//! The driver is the only place where queue events reach the engine: every
//! `ItemCompleted` carrying a ticket is forwarded to
//! [`BattleEngine::on_presentation_complete`]. Callers feed it elapsed time
//! (a frame delta, a test step) and it never blocks.

use std::time::Duration;

use tracing::trace;

use super::battle::{BattleEngine, EnginePhase, TurnStage, TurnStep};
use super::selection::SelectionRequest;
use super::summary::BattleSummary;
use crate::core::InstanceId;
use crate::error::{BattleError, Result};
use crate::presentation::{AnimationQueue, QueueEvent};

/// Where the battle stands after a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverStatus {
    Running,
    AwaitingTarget(SelectionRequest),
    Over(BattleSummary),
}

pub struct BattleDriver {
    engine: BattleEngine,
    queue: AnimationQueue,
}

impl BattleDriver {
    pub fn new(engine: BattleEngine, queue: AnimationQueue) -> Self {
        Self { engine, queue }
    }

    pub fn start(&mut self) -> Result<()> {
        self.engine.start()
    }

    /// Advance by `elapsed`: act if the engine is ready, run the selection
    /// countdown if it is waiting, then play the queue.
    pub fn tick(&mut self, elapsed: Duration) -> Result<DriverStatus> {
        match self.engine.phase().clone() {
            EnginePhase::Idle => return Err(BattleError::NotStarted),
            EnginePhase::BattleOver(summary) => return Ok(DriverStatus::Over(summary)),
            EnginePhase::TurnInProgress(TurnStage::Ready) => match self.engine.act(&mut self.queue)? {
                TurnStep::Over(summary) => return Ok(DriverStatus::Over(summary)),
                TurnStep::AwaitingTarget(request) => return Ok(DriverStatus::AwaitingTarget(request)),
                TurnStep::Presenting { .. } => {}
            },
            EnginePhase::TurnInProgress(TurnStage::AwaitingTarget) => {
                if self.engine.advance_selection_timer(elapsed, &mut self.queue)?.is_none() {
                    return Ok(self.awaiting_status());
                }
                return self.pump(Duration::ZERO);
            }
            EnginePhase::TurnInProgress(TurnStage::Presenting(_)) => {}
        }
        self.pump(elapsed)
    }

    /// Resolve the pending selection with an explicit choice.
    pub fn select_target(&mut self, target: &InstanceId) -> Result<()> {
        self.engine.select_target(target, &mut self.queue).map(|_| ())
    }

    /// Tick until the battle ends or `max_ticks` is reached.
    ///
    /// Pending human selections are left to their countdown.
    pub fn run_until_over(&mut self, step: Duration, max_ticks: usize) -> Result<Option<BattleSummary>> {
        for _ in 0..max_ticks {
            if let DriverStatus::Over(summary) = self.tick(step)? {
                return Ok(Some(summary));
            }
        }
        Ok(None)
    }

    #[must_use]
    pub fn engine(&self) -> &BattleEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut BattleEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn queue(&self) -> &AnimationQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut AnimationQueue {
        &mut self.queue
    }

    pub fn into_parts(self) -> (BattleEngine, AnimationQueue) {
        (self.engine, self.queue)
    }

    fn awaiting_status(&self) -> DriverStatus {
        match self.engine.pending_selection() {
            Some(request) => DriverStatus::AwaitingTarget(request.clone()),
            None => DriverStatus::Running,
        }
    }

    fn pump(&mut self, elapsed: Duration) -> Result<DriverStatus> {
        for event in self.queue.advance(elapsed) {
            trace!(?event, "queue event");
            if let QueueEvent::ItemCompleted { ticket: Some(ticket), .. } = event {
                if let Some(summary) = self.engine.on_presentation_complete(ticket, &mut self.queue)? {
                    return Ok(DriverStatus::Over(summary));
                }
            }
        }
        Ok(DriverStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CharacterRegistry;
    use crate::core::{BattleConfig, Controller, Side};

    fn driver(config: BattleConfig) -> BattleDriver {
        let engine = BattleEngine::from_registry(
            config,
            &CharacterRegistry::standard(),
            &["robo_fighter", "teddy_warrior", "wizard_toy"],
            &["rubber_duckie", "brick_dude", "pirate_captain"],
        )
        .unwrap();
        BattleDriver::new(engine, AnimationQueue::new())
    }

    #[test]
    fn test_tick_before_start() {
        let mut driver = driver(BattleConfig::default());
        assert_eq!(driver.tick(Duration::from_millis(16)).unwrap_err(), BattleError::NotStarted);
    }

    #[test]
    fn test_ai_battle_runs_to_completion() {
        let mut driver = driver(BattleConfig::default().with_seed(2024));
        driver.start().unwrap();
        let summary = driver
            .run_until_over(Duration::from_millis(250), 50_000)
            .unwrap()
            .expect("battle should finish");

        let state = driver.engine().state();
        assert!(state.teams[summary.winner.opponent()].is_wiped_out());
        assert!(!state.teams[summary.winner].is_wiped_out());
        assert_eq!(summary.turns as usize, state.log.len());
        assert!(driver.queue().is_idle());
    }

    #[test]
    fn test_same_seed_same_battle() {
        let run = |seed| {
            let mut driver = driver(BattleConfig::default().with_seed(seed));
            driver.start().unwrap();
            driver.run_until_over(Duration::from_millis(500), 50_000).unwrap()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_human_side_waits_then_times_out() {
        let config = BattleConfig::default()
            .with_seed(5)
            .with_controller(Side::A, Controller::Human);
        let mut driver = driver(config);
        driver.start().unwrap();

        // Eventually a single-target ability needs a choice; let it time out
        let mut saw_request = false;
        for _ in 0..20_000 {
            match driver.tick(Duration::from_millis(500)).unwrap() {
                DriverStatus::AwaitingTarget(request) => {
                    saw_request = true;
                    assert!(!request.valid_targets.is_empty());
                }
                DriverStatus::Over(_) => break,
                DriverStatus::Running => {}
            }
        }
        assert!(saw_request);
        assert!(driver.engine().is_over());
    }
}
