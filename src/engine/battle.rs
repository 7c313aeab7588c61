//! Battle resolution engine.
//!
//! ## Turn lifecycle
//!
//! ```text
//! Idle ──start──▶ TurnInProgress(Ready) ──act──▶ AwaitingTarget ──select/timeout──┐
//!                        ▲                  │                                        │
//!                        │                  └────────────▶ Presenting(ticket) ◀──────┘
//!                        └──── on_presentation_complete(ticket) ──┘
//!                                        │
//!                                        └──▶ BattleOver
//! ```
//!
//! The engine owns all combat state. It never waits: `act` returns as soon
//! as outcomes are applied and presentation is enqueued, and the turn only
//! advances when the queue reports the action's ticket complete.

use smallvec::SmallVec;
use tracing::{debug, info};

use super::selection::{PendingSelection, SelectionRequest, SelectionResolved};
use super::summary::BattleSummary;
use crate::abilities::Ability;
use crate::characters::{CharacterInstance, CharacterRegistry, Team};
use crate::core::{
    ActionKind, ActionRecord, BattleConfig, BattleState, Controller, GameRng, InstanceId, RandomSource, Side,
    SideMap, TEAM_SIZE,
};
use crate::effects::{model_for, DamageModel, EffectResolver, TargetList, TargetSelector};
use crate::error::{BattleError, Result};
use crate::presentation::{missed, turn_skipped, AnimationQueue, SpellSequence, Ticket};
use crate::sync::BattleSnapshot;

/// Sub-state of a turn in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStage {
    /// The next `act` call will run an action.
    Ready,
    /// Suspended for a human target choice.
    AwaitingTarget,
    /// Outcomes applied; waiting for the queue to finish this ticket.
    Presenting(Ticket),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnginePhase {
    Idle,
    TurnInProgress(TurnStage),
    BattleOver(BattleSummary),
}

/// What one engine call produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnStep {
    /// An action was applied and its presentation enqueued.
    Presenting {
        ticket: Ticket,
        record: ActionRecord,
        selection: Option<SelectionResolved>,
    },
    /// Waiting for [`BattleEngine::select_target`] or the countdown.
    AwaitingTarget(SelectionRequest),
    Over(BattleSummary),
}

#[derive(Clone, Debug)]
struct InFlight {
    ticket: Ticket,
    actor_position: usize,
    record: ActionRecord,
}

/// Turn-based battle between two teams.
///
/// ```
/// use std::time::Duration;
/// use toy_arena::core::BattleConfig;
/// use toy_arena::engine::{BattleDriver, BattleEngine};
/// use toy_arena::presentation::AnimationQueue;
///
/// let engine = BattleEngine::from_registry(
///     BattleConfig::default().with_seed(7),
///     &toy_arena::characters::CharacterRegistry::standard(),
///     &["robo_fighter", "teddy_warrior", "wizard_toy"],
///     &["rubber_duckie", "brick_dude", "pirate_captain"],
/// )
/// .unwrap();
///
/// let mut driver = BattleDriver::new(engine, AnimationQueue::new());
/// driver.start().unwrap();
/// let summary = driver.run_until_over(Duration::from_millis(100), 100_000).unwrap();
/// assert!(summary.is_some());
/// ```
#[derive(Debug)]
pub struct BattleEngine {
    config: BattleConfig,
    state: BattleState,
    model: Box<dyn DamageModel>,
    rng: GameRng,
    phase: EnginePhase,
    pending: Option<PendingSelection>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl BattleEngine {
    /// Create a battle from two rosters.
    ///
    /// Rejects rosters that are not exactly [`TEAM_SIZE`] strong, duplicate
    /// instance ids, and invalid configuration.
    pub fn new(
        config: BattleConfig,
        roster_a: Vec<CharacterInstance>,
        roster_b: Vec<CharacterInstance>,
    ) -> Result<Self> {
        config.validate()?;
        for (side, roster) in [(Side::A, &roster_a), (Side::B, &roster_b)] {
            if roster.len() != TEAM_SIZE {
                return Err(BattleError::RosterSize {
                    side,
                    expected: TEAM_SIZE,
                    found: roster.len(),
                });
            }
        }

        let teams = SideMap::from_pair(Team::new(Side::A, roster_a)?, Team::new(Side::B, roster_b)?);
        for (side, team) in teams.iter() {
            if let Some(other) = team.members().iter().find(|c| teams[side.opponent()].contains(&c.instance_id)) {
                return Err(BattleError::DuplicateInstance(other.instance_id.clone()));
            }
        }

        let rng = match config.battle_id() {
            Some(battle_id) => GameRng::for_battle(battle_id),
            None => GameRng::new(config.seed),
        };

        Ok(Self {
            model: model_for(config.damage_model),
            state: BattleState::new(teams),
            config,
            rng,
            phase: EnginePhase::Idle,
            pending: None,
            in_flight: None,
            next_ticket: 0,
        })
    }

    /// Create a battle from catalog template ids.
    ///
    /// Instance ids follow the `player1-<template>-<slot>` /
    /// `player2-<template>-<slot>` convention shared with the arbiter.
    pub fn from_registry(
        config: BattleConfig,
        registry: &CharacterRegistry,
        side_a: &[&str],
        side_b: &[&str],
    ) -> Result<Self> {
        let roster_a = registry.roster(Side::A, "player1", side_a)?;
        let roster_b = registry.roster(Side::B, "player2", side_b)?;
        Self::new(config, roster_a, roster_b)
    }

    pub fn start(&mut self) -> Result<()> {
        if self.phase != EnginePhase::Idle {
            return Err(BattleError::AlreadyStarted);
        }
        info!(
            mode = ?self.config.mode,
            seed = self.rng.seed(),
            "battle started"
        );
        self.phase = EnginePhase::TurnInProgress(TurnStage::Ready);
        Ok(())
    }

    /// Run the current side's next action.
    ///
    /// Checks the terminal condition first, so a decided battle never
    /// issues another action. Returns [`TurnStep::Over`] once the battle has
    /// ended, on every later call too.
    pub fn act(&mut self, queue: &mut AnimationQueue) -> Result<TurnStep> {
        match &self.phase {
            EnginePhase::Idle => return Err(BattleError::NotStarted),
            EnginePhase::BattleOver(summary) => return Ok(TurnStep::Over(summary.clone())),
            EnginePhase::TurnInProgress(TurnStage::Ready) => {}
            EnginePhase::TurnInProgress(_) => {
                return Err(BattleError::ActionInFlight(self.state.current_turn_owner));
            }
        }

        let side = self.state.current_turn_owner;
        if let Some(winner) = self.state.winner(side) {
            return Ok(TurnStep::Over(self.finish(winner, queue)));
        }
        let actor = self
            .state
            .acting_position(side)
            .and_then(|p| self.state.teams[side].at(p).map(|c| (p, c.instance_id.clone())));
        let Some((position, actor_id)) = actor else {
            return Ok(TurnStep::Over(self.finish(side.opponent(), queue)));
        };
        let turn = self.state.turn_counter;

        let actor = self.state.teams[side]
            .get_mut(&actor_id)
            .ok_or_else(|| BattleError::UnknownInstance(actor_id.clone()))?;

        if actor.status.consume_freeze() {
            debug!(turn, %side, actor = %actor_id, "frozen, turn skipped");
            self.state.stats.skipped_turns += 1;
            let ticket = self.allocate_ticket();
            queue.enqueue(turn_skipped(actor_id.clone()).with_ticket(ticket));
            let record = ActionRecord::skipped(turn, side, actor_id);
            return Ok(self.present(ticket, position, record, None));
        }

        let miss_chance = actor.status.take_accuracy_debuff();
        let abilities = actor.abilities.clone();

        if let Some(chance) = miss_chance {
            if self.rng.gen_bool(chance) {
                debug!(turn, %side, actor = %actor_id, chance, "action missed");
                self.state.stats.missed_turns += 1;
                let ticket = self.allocate_ticket();
                queue.enqueue(missed(actor_id.clone()).with_ticket(ticket));
                let record = ActionRecord::missed(turn, side, actor_id);
                return Ok(self.present(ticket, position, record, None));
            }
        }

        let ability = select_ability(&abilities, &mut self.rng);
        let selector =
            TargetSelector::new(ability.targeting(), side).with_chain_max(self.config.chain_max_targets);
        debug!(turn, %side, actor = %actor_id, ability = %ability.id, "ability selected");

        if self.config.controllers[side] == Controller::Human && selector.mode().is_single() {
            let pool = selector.valid_targets(&self.state.teams);
            if !pool.is_empty() {
                let request = SelectionRequest {
                    side,
                    caster: actor_id,
                    ability: ability.id.clone(),
                    ability_name: ability.name.clone(),
                    valid_targets: pool,
                    countdown: self.config.selection_countdown,
                };
                debug!(
                    caster = %request.caster,
                    targets = request.valid_targets.len(),
                    "awaiting target selection"
                );
                self.pending = Some(PendingSelection::new(request.clone(), ability, position));
                self.phase = EnginePhase::TurnInProgress(TurnStage::AwaitingTarget);
                return Ok(TurnStep::AwaitingTarget(request));
            }
        }

        let targets = selector.auto_select(&self.state.teams, &mut self.rng);
        self.execute(queue, position, actor_id, ability, targets, None)
    }

    /// Resolve a pending selection with an explicit choice.
    ///
    /// The target must have been offered and still be valid.
    pub fn select_target(&mut self, target: &InstanceId, queue: &mut AnimationQueue) -> Result<TurnStep> {
        let Some(pending) = self.pending.take() else {
            return Err(BattleError::NoPendingSelection);
        };
        if !self.still_valid(&pending).contains(target) {
            let error = BattleError::InvalidTarget {
                ability: pending.ability.id.clone(),
                target: target.clone(),
            };
            self.pending = Some(pending);
            return Err(error);
        }
        debug!(target = %target, "target selected");
        self.resolve_selection(pending, Some(target.clone()), false, queue)
    }

    /// Advance the selection countdown.
    ///
    /// On expiry a uniformly random member of the still-valid pool is chosen
    /// and the turn proceeds. Returns `None` while no selection is pending or
    /// time remains.
    pub fn advance_selection_timer(
        &mut self,
        elapsed: std::time::Duration,
        queue: &mut AnimationQueue,
    ) -> Result<Option<TurnStep>> {
        let expired = match self.pending.as_mut() {
            Some(pending) => pending.countdown.tick(elapsed),
            None => return Ok(None),
        };
        if !expired {
            return Ok(None);
        }
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };

        let pool = self.still_valid(&pending);
        let target = self.rng.gen_index(pool.len()).map(|i| pool[i].clone());
        debug!(target = ?target, pool = pool.len(), "selection timed out");
        self.resolve_selection(pending, target, true, queue).map(Some)
    }

    /// Queue completion signal for the action in flight.
    ///
    /// Advances the acting side's cursor, hands control to the other side,
    /// increments the turn counter and re-checks the terminal condition.
    /// Returns the summary if the battle ended.
    pub fn on_presentation_complete(
        &mut self,
        ticket: Ticket,
        queue: &mut AnimationQueue,
    ) -> Result<Option<BattleSummary>> {
        if self.phase != EnginePhase::TurnInProgress(TurnStage::Presenting(ticket)) {
            return Err(BattleError::UnexpectedTicket(ticket.0));
        }
        let Some(in_flight) = self.in_flight.take() else {
            return Err(BattleError::UnexpectedTicket(ticket.0));
        };
        debug_assert_eq!(in_flight.ticket, ticket);

        let acting = self.state.current_turn_owner;
        self.state.complete_action(in_flight.actor_position, in_flight.record);

        if let Some(winner) = self.state.winner(acting) {
            return Ok(Some(self.finish(winner, queue)));
        }
        self.phase = EnginePhase::TurnInProgress(TurnStage::Ready);
        Ok(None)
    }

    #[must_use]
    pub fn phase(&self) -> &EnginePhase {
        &self.phase
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, EnginePhase::BattleOver(_))
    }

    #[must_use]
    pub fn summary(&self) -> Option<&BattleSummary> {
        match &self.phase {
            EnginePhase::BattleOver(summary) => Some(summary),
            _ => None,
        }
    }

    #[must_use]
    pub fn pending_selection(&self) -> Option<&SelectionRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    /// Remaining selection countdown, if a selection is pending.
    #[must_use]
    pub fn selection_time_left(&self) -> Option<std::time::Duration> {
        self.pending.as_ref().map(|p| p.countdown.remaining())
    }

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Direct state access for scenario setup.
    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Both rosters in the wire snapshot shape.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        let winner = self.summary().map(|s| s.winner);
        BattleSnapshot::from_state(&self.state, self.config.battle_id(), winner)
    }

    fn allocate_ticket(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn still_valid(&self, pending: &PendingSelection) -> TargetList {
        let current = TargetSelector::new(pending.ability.targeting(), pending.request.side)
            .valid_targets(&self.state.teams);
        pending.still_valid(&current)
    }

    fn resolve_selection(
        &mut self,
        pending: PendingSelection,
        target: Option<InstanceId>,
        timed_out: bool,
        queue: &mut AnimationQueue,
    ) -> Result<TurnStep> {
        self.phase = EnginePhase::TurnInProgress(TurnStage::Ready);
        let targets: TargetList = target.iter().cloned().collect();
        let selection = SelectionResolved { target, timed_out };
        self.execute(
            queue,
            pending.actor_position,
            pending.request.caster,
            pending.ability,
            targets,
            Some(selection),
        )
    }

    fn execute(
        &mut self,
        queue: &mut AnimationQueue,
        position: usize,
        actor_id: InstanceId,
        ability: Ability,
        targets: TargetList,
        selection: Option<SelectionResolved>,
    ) -> Result<TurnStep> {
        let side = self.state.current_turn_owner;
        let turn = self.state.turn_counter;

        let resolver = EffectResolver::new(&self.config, self.model.as_ref());
        let outcomes = resolver.resolve(
            &mut self.state.teams,
            &actor_id,
            &ability,
            &targets,
            &mut self.state.combo[side],
            &mut self.rng,
        )?;

        self.state.stats.record(&actor_id, &outcomes);
        if ability.is_ultimate {
            self.state.stats.record_ultimate(side, &actor_id);
        }
        debug!(
            turn,
            %side,
            actor = %actor_id,
            ability = %ability.id,
            targets = ?targets.iter().map(InstanceId::as_str).collect::<SmallVec<[&str; 3]>>(),
            combo = self.state.combo[side],
            "action applied"
        );

        let ticket = self.allocate_ticket();
        queue.enqueue_all(
            SpellSequence::for_ability(actor_id.clone(), &ability, &targets, &outcomes).build_with_ticket(ticket),
        );

        let record = ActionRecord {
            turn,
            side,
            actor: actor_id,
            kind: ActionKind::Ability {
                ability: ability.id,
                name: ability.name,
                ultimate: ability.is_ultimate,
            },
            targets,
            outcomes,
        };
        Ok(self.present(ticket, position, record, selection))
    }

    fn present(
        &mut self,
        ticket: Ticket,
        actor_position: usize,
        record: ActionRecord,
        selection: Option<SelectionResolved>,
    ) -> TurnStep {
        self.phase = EnginePhase::TurnInProgress(TurnStage::Presenting(ticket));
        self.in_flight = Some(InFlight {
            ticket,
            actor_position,
            record: record.clone(),
        });
        TurnStep::Presenting {
            ticket,
            record,
            selection,
        }
    }

    fn finish(&mut self, winner: Side, queue: &mut AnimationQueue) -> BattleSummary {
        self.pending = None;
        self.in_flight = None;
        let dropped = queue.clear();
        let summary = BattleSummary::from_state(&self.state, winner);
        info!(
            %winner,
            turns = summary.turns,
            ultimates = summary.ultimates_used,
            dropped_presentations = dropped,
            "battle over"
        );
        self.phase = EnginePhase::BattleOver(summary.clone());
        summary
    }
}

/// Weighted choice over the character's abilities; falls back to a basic
/// attack when there is nothing to choose from.
fn select_ability(abilities: &[Ability], rng: &mut impl RandomSource) -> Ability {
    let weights: SmallVec<[f64; 4]> = abilities.iter().map(|a| a.weight).collect();
    rng.choose_weighted(&weights)
        .and_then(|i| abilities.get(i))
        .cloned()
        .unwrap_or_else(Ability::basic_attack)
}
