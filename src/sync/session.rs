//! Player-vs-player synchronization session.
//!
//! The session mirrors an authoritative arbiter. It never computes outcomes:
//! every `battle_action` carries the effects and the full post-action
//! rosters, and the session replays them into the animation queue and a
//! local mirror of the battle state.
//!
//! ## Phases
//!
//! `AwaitingInitialization → InProgress → Complete | Errored`
//!
//! A malformed snapshot is a no-op turn. `desync_threshold` consecutive
//! malformed snapshots move the session to `Errored`, after which every
//! event fails with [`SyncError::Desynchronized`].

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::protocol::{
    BattleAction, BattleComplete, BattleInitialized, BattleReady, ClientMessage, SelectTarget, ServerMessage,
    TargetRequest, WireAbility, WireAction, WireActionKind, WireEffect, WireEffectKind,
};
use super::snapshot::{BattleSnapshot, Participant};
use crate::abilities::EffectKind;
use crate::characters::Team;
use crate::core::{
    battle_seed, AbilityId, ActionKind, ActionRecord, ArbiterRandom, BattleConfig, BattleState, InstanceId, Side,
    SideMap,
};
use crate::effects::{EffectOutcome, TargetList};
use crate::engine::{BattleSummary, Countdown};
use crate::error::{BattleError, SyncError};
use crate::presentation::{turn_skipped, AnimationQueue, Delivery, Feedback, PresentationRequest, SpellSequence};

/// How the session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    /// `None` for a draw.
    pub winner: Option<Side>,
    /// The opponent disconnected.
    pub forfeit: bool,
    /// Present once a winner and a mirrored state are known.
    pub summary: Option<BattleSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingInitialization,
    InProgress,
    Complete(SessionOutcome),
    /// Consecutive malformed snapshots that tripped the threshold.
    Errored(u32),
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::AwaitingInitialization => "awaiting initialization",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Complete(_) => "complete",
            SessionPhase::Errored(_) => "desynchronized",
        }
    }
}

/// Target choice the local user has to make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetPrompt {
    pub caster: InstanceId,
    pub ability_name: String,
    pub valid_targets: Vec<InstanceId>,
    pub countdown: Duration,
}

/// What one inbound event did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Initialized { seed: u64 },
    TargetRequested(TargetPrompt),
    ActionApplied { turn: Option<u32> },
    /// Not newer than the last applied action; dropped.
    Stale { turn: u32, last: u32 },
    /// Snapshot rejected; state unchanged.
    Malformed { streak: u32 },
    Completed(SessionOutcome),
    /// Event after completion.
    Ignored,
}

#[derive(Clone, Debug)]
struct PendingRequest {
    prompt: TargetPrompt,
    countdown: Countdown,
}

#[derive(Debug)]
pub struct SyncSession {
    battle_id: String,
    participant_id: String,
    local_side: Side,
    desync_threshold: u32,
    phase: SessionPhase,
    mirror: Option<BattleState>,
    last_turn: Option<u32>,
    malformed_streak: u32,
    pending: Option<PendingRequest>,
    /// Local timeout fallback.
    fallback: ArbiterRandom,
    /// Cosmetic choices shared by both participants.
    cosmetic: ArbiterRandom,
    fingerprint: Option<u64>,
}

impl SyncSession {
    /// Session for `participant_id` playing `local_side`.
    ///
    /// The config must be in player-vs-player mode; its battle id is echoed
    /// in every outbound message.
    pub fn new(config: &BattleConfig, participant_id: impl Into<String>, local_side: Side) -> Result<Self, SyncError> {
        let battle_id = config
            .battle_id()
            .ok_or_else(|| BattleError::InvalidConfig("sync session requires player-vs-player mode".into()))?
            .to_owned();
        let seed = battle_seed(&battle_id);
        Ok(Self {
            participant_id: participant_id.into(),
            local_side,
            desync_threshold: config.desync_threshold.max(1),
            phase: SessionPhase::AwaitingInitialization,
            mirror: None,
            last_turn: None,
            malformed_streak: 0,
            pending: None,
            fallback: ArbiterRandom::new(seed),
            cosmetic: ArbiterRandom::new(seed),
            fingerprint: None,
            battle_id,
        })
    }

    /// `battle_ready` announcing this participant.
    #[must_use]
    pub fn ready_message(&self) -> ClientMessage {
        ClientMessage::BattleReady(BattleReady {
            battle_id: self.battle_id.clone(),
            participant_id: self.participant_id.clone(),
        })
    }

    pub fn handle_json(&mut self, text: &str, queue: &mut AnimationQueue) -> Result<SessionUpdate, SyncError> {
        let message = ServerMessage::from_json(text)?;
        self.handle(message, queue)
    }

    /// Apply one inbound event.
    pub fn handle(&mut self, message: ServerMessage, queue: &mut AnimationQueue) -> Result<SessionUpdate, SyncError> {
        let event = message.event_name();
        match &self.phase {
            SessionPhase::Errored(streak) => return Err(SyncError::Desynchronized(*streak)),
            SessionPhase::Complete(_) => {
                debug!(event, "event after battle end ignored");
                return Ok(SessionUpdate::Ignored);
            }
            SessionPhase::AwaitingInitialization if !matches!(message, ServerMessage::BattleInitialized(_)) => {
                return Err(self.unexpected(event));
            }
            SessionPhase::InProgress if matches!(message, ServerMessage::BattleInitialized(_)) => {
                return Err(self.unexpected(event));
            }
            _ => {}
        }

        match message {
            ServerMessage::BattleInitialized(init) => self.initialize(init),
            ServerMessage::RequestTarget(request) => self.request_target(request),
            ServerMessage::BattleAction(action) => self.apply_action(action, queue),
            ServerMessage::BattleComplete(complete) => Ok(self.complete(complete)),
            ServerMessage::OpponentDisconnected => Ok(self.forfeit(queue)),
        }
    }

    /// Answer the pending request with an explicit choice.
    pub fn select_target(&mut self, target: &InstanceId) -> Result<ClientMessage, SyncError> {
        let pending = self.pending.as_ref().ok_or(SyncError::NoPendingRequest)?;
        if !pending.prompt.valid_targets.contains(target) {
            return Err(SyncError::TargetNotOffered(target.clone()));
        }
        self.pending = None;
        Ok(self.select_message(target.clone()))
    }

    /// Run the pending request's countdown. On expiry a random offered
    /// target is sent on the user's behalf.
    pub fn advance(&mut self, elapsed: Duration) -> Option<ClientMessage> {
        let pending = self.pending.as_mut()?;
        if !pending.countdown.tick(elapsed) {
            return None;
        }
        let pool = self.pending.take()?.prompt.valid_targets;
        if pool.is_empty() {
            debug!("target request expired with an empty pool");
            return None;
        }
        let index = self.fallback.int_inclusive(0, pool.len() as i64 - 1) as usize;
        let target = pool.get(index).or_else(|| pool.last())?.clone();
        info!(target = %target, "target selection timed out");
        Some(self.select_message(target))
    }

    /// Index in `0..count` chosen identically by both participants.
    pub fn cosmetic_variant(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.cosmetic.int_inclusive(0, count as i64 - 1) as usize
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn local_side(&self) -> Side {
        self.local_side
    }

    #[must_use]
    pub fn battle_id(&self) -> &str {
        &self.battle_id
    }

    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Locally mirrored state, once initialized.
    #[must_use]
    pub fn state(&self) -> Option<&BattleState> {
        self.mirror.as_ref()
    }

    #[must_use]
    pub fn pending_request(&self) -> Option<&TargetPrompt> {
        self.pending.as_ref().map(|p| &p.prompt)
    }

    #[must_use]
    pub fn selection_time_left(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.countdown.remaining())
    }

    #[must_use]
    pub fn last_turn(&self) -> Option<u32> {
        self.last_turn
    }

    #[must_use]
    pub fn malformed_streak(&self) -> u32 {
        self.malformed_streak
    }

    /// Fingerprint of the last accepted snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    fn unexpected(&self, event: &'static str) -> SyncError {
        SyncError::UnexpectedEvent {
            event,
            phase: self.phase.as_str(),
        }
    }

    fn select_message(&self, target: InstanceId) -> ClientMessage {
        ClientMessage::SelectTarget(SelectTarget {
            battle_id: self.battle_id.clone(),
            target_instance_id: target,
            participant_id: self.participant_id.clone(),
        })
    }

    fn initialize(&mut self, init: BattleInitialized) -> Result<SessionUpdate, SyncError> {
        let teams = init.state.teams()?;
        let seed = init.seed.unwrap_or_else(|| battle_seed(&self.battle_id));
        self.fallback = ArbiterRandom::new(seed);
        self.cosmetic = ArbiterRandom::new(seed);

        let mut state = BattleState::new(teams);
        sync_turn(&mut state, &init.state);
        self.fingerprint = init.state.fingerprint().ok();
        self.mirror = Some(state);
        self.phase = SessionPhase::InProgress;
        info!(battle = %self.battle_id, seed, side = %self.local_side, "pvp battle initialized");
        Ok(SessionUpdate::Initialized { seed })
    }

    fn request_target(&mut self, request: TargetRequest) -> Result<SessionUpdate, SyncError> {
        let caster = request
            .caster
            .instance_id
            .ok_or_else(|| SyncError::MalformedSnapshot("request_target without caster instanceId".into()))?;
        let valid_targets: Vec<InstanceId> = request
            .valid_targets
            .into_iter()
            .filter_map(|c| c.instance_id)
            .collect();
        let prompt = TargetPrompt {
            caster,
            ability_name: request.ability.name,
            valid_targets,
            countdown: Duration::from_millis(request.timeout),
        };
        debug!(
            caster = %prompt.caster,
            ability = %prompt.ability_name,
            pool = prompt.valid_targets.len(),
            "target requested"
        );
        self.pending = Some(PendingRequest {
            countdown: Countdown::new(prompt.countdown),
            prompt: prompt.clone(),
        });
        Ok(SessionUpdate::TargetRequested(prompt))
    }

    fn apply_action(&mut self, event: BattleAction, queue: &mut AnimationQueue) -> Result<SessionUpdate, SyncError> {
        let snapshot = event.snapshot();
        let turn = event
            .action
            .turn_number
            .or_else(|| snapshot.as_ref().ok().and_then(|s| s.turn_number));
        if let (Some(turn), Some(last)) = (turn, self.last_turn) {
            if turn <= last {
                debug!(turn, last, "stale battle action dropped");
                return Ok(SessionUpdate::Stale { turn, last });
            }
        }

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(SyncError::MalformedSnapshot(reason)) => return self.malformed(reason, queue),
            Err(other) => return Err(other),
        };
        let replay = match self.mirror.as_ref() {
            Some(mirror) => Replay::build(mirror, &event.action, &snapshot),
            None => Err(SyncError::MalformedSnapshot("no mirrored state".into())),
        };
        let replay = match replay {
            Ok(replay) => replay,
            Err(SyncError::MalformedSnapshot(reason)) => return self.malformed(reason, queue),
            Err(other) => return Err(other),
        };
        self.malformed_streak = 0;

        queue.set_catch_up(!queue.is_idle());
        queue.enqueue_all(replay.presentation(&event.action));

        let Some(mirror) = self.mirror.as_mut() else {
            return Err(SyncError::MalformedSnapshot("no mirrored state".into()));
        };
        mirror.teams = replay.teams;
        match &replay.record.kind {
            ActionKind::Skipped => mirror.stats.skipped_turns += 1,
            ActionKind::Missed => mirror.stats.missed_turns += 1,
            ActionKind::Ability { ultimate, .. } => {
                mirror.stats.record(&replay.record.actor, &replay.record.outcomes);
                if *ultimate {
                    mirror.stats.record_ultimate(replay.record.side, &replay.record.actor);
                }
            }
        }
        debug!(
            turn = ?turn,
            actor = %replay.record.actor,
            outcomes = replay.record.outcomes.len(),
            "battle action applied"
        );
        mirror.log.push_back(replay.record);
        mirror.turn_counter += 1;
        sync_turn(mirror, &snapshot);

        self.fingerprint = snapshot.fingerprint().ok();
        if turn.is_some() {
            self.last_turn = turn;
        }
        self.pending = None;
        Ok(SessionUpdate::ActionApplied { turn })
    }

    fn malformed(&mut self, reason: String, queue: &mut AnimationQueue) -> Result<SessionUpdate, SyncError> {
        self.malformed_streak += 1;
        let streak = self.malformed_streak;
        warn!(streak, reason = %reason, "malformed snapshot, turn skipped");
        if streak >= self.desync_threshold {
            error!(battle = %self.battle_id, streak, "battle desynchronized");
            self.phase = SessionPhase::Errored(streak);
            self.pending = None;
            queue.clear();
            return Err(SyncError::Desynchronized(streak));
        }
        Ok(SessionUpdate::Malformed { streak })
    }

    fn complete(&mut self, complete: BattleComplete) -> SessionUpdate {
        if let Some(mirror) = self.mirror.as_mut() {
            if let Some(teams) = complete.final_state.as_ref().and_then(|s| s.teams().ok()) {
                mirror.teams = teams;
            }
        }
        let winner = match complete.winner.as_deref() {
            Some("draw") => None,
            Some(id) if id == self.participant_id => Some(self.local_side),
            Some(id) => Some(Participant::parse(id).map_or(self.local_side.opponent(), Participant::side)),
            None => self.mirror.as_ref().and_then(|m| m.winner(m.current_turn_owner)),
        };
        self.pending = None;
        info!(
            battle = %self.battle_id,
            winner = ?winner,
            reason = complete.reason.as_deref().unwrap_or("knockout"),
            "pvp battle complete"
        );
        self.finish(winner, false)
    }

    fn forfeit(&mut self, queue: &mut AnimationQueue) -> SessionUpdate {
        let dropped = queue.clear();
        self.pending = None;
        info!(battle = %self.battle_id, dropped, "opponent disconnected, battle forfeited");
        self.finish(Some(self.local_side), true)
    }

    fn finish(&mut self, winner: Option<Side>, forfeit: bool) -> SessionUpdate {
        let summary = winner
            .zip(self.mirror.as_ref())
            .map(|(side, mirror)| BattleSummary::from_state(mirror, side))
            .map(|summary| if forfeit { summary.with_forfeit() } else { summary });
        let outcome = SessionOutcome {
            winner,
            forfeit,
            summary,
        };
        self.phase = SessionPhase::Complete(outcome.clone());
        SessionUpdate::Completed(outcome)
    }
}

/// Copy turn bookkeeping from an authoritative snapshot.
fn sync_turn(state: &mut BattleState, snapshot: &BattleSnapshot) {
    if let Some(owner) = snapshot.current_turn {
        state.current_turn_owner = owner.side();
    }
}

/// One validated action, ready to be committed to the mirror.
struct Replay {
    teams: SideMap<Team>,
    record: ActionRecord,
}

impl Replay {
    fn build(mirror: &BattleState, action: &WireAction, snapshot: &BattleSnapshot) -> Result<Self, SyncError> {
        let teams = snapshot.teams()?;
        let actor = action
            .caster
            .as_ref()
            .and_then(|c| c.instance_id.clone())
            .ok_or_else(|| SyncError::MalformedSnapshot("battle action without caster".into()))?;
        let side = mirror
            .character(&actor)
            .map(|c| c.side)
            .or_else(|| action.caster.as_ref().and_then(|c| c.team).map(Participant::side))
            .ok_or_else(|| SyncError::MalformedSnapshot(format!("unknown caster `{actor}`")))?;
        let turn = action.turn_number.unwrap_or(mirror.turn_counter);

        let record = match action.kind {
            WireActionKind::SkipTurn => ActionRecord::skipped(turn, side, actor),
            WireActionKind::Unknown => {
                return Err(SyncError::MalformedSnapshot("unknown battle action type".into()));
            }
            WireActionKind::AbilityUsed => {
                let ability = action
                    .ability
                    .as_ref()
                    .ok_or_else(|| SyncError::MalformedSnapshot("ability_used without ability".into()))?;
                let targets: TargetList = action.targets.iter().filter_map(|t| t.instance_id.clone()).collect();
                ActionRecord {
                    turn,
                    side,
                    actor,
                    kind: ActionKind::Ability {
                        ability: AbilityId::new(ability.id.clone().unwrap_or_else(|| ability.name.clone())),
                        name: ability.name.clone(),
                        ultimate: ability.is_ultimate,
                    },
                    targets,
                    outcomes: replay_effects(mirror, &teams, &action.effects)?,
                }
            }
        };
        Ok(Self { teams, record })
    }

    fn presentation(&self, action: &WireAction) -> Vec<PresentationRequest> {
        let record = &self.record;
        match &record.kind {
            ActionKind::Skipped | ActionKind::Missed => vec![turn_skipped(record.actor.clone())],
            ActionKind::Ability { name, ultimate, .. } => {
                let delivery = action
                    .ability
                    .as_ref()
                    .map_or(Delivery::Projectile, |a| delivery_for(a, record.targets.len()));
                let sequence = record
                    .targets
                    .iter()
                    .fold(SpellSequence::new(record.actor.clone(), name.clone()), |seq, target| {
                        seq.with_target(target.clone(), None)
                    })
                    .with_delivery(delivery)
                    .with_feedback(record.outcomes.iter().flat_map(Feedback::from_outcome));
                if *ultimate {
                    sequence.ultimate().build()
                } else {
                    sequence.build()
                }
            }
        }
    }
}

fn delivery_for(ability: &WireAbility, target_count: usize) -> Delivery {
    match ability.effect.as_deref().map(str::parse::<EffectKind>) {
        Some(Ok(EffectKind::MultiDamage)) => Delivery::MultiHit,
        Some(Ok(kind)) if kind.targeting().is_single() => Delivery::Projectile,
        Some(Ok(_)) => Delivery::Area,
        _ if target_count > 1 => Delivery::Area,
        _ => Delivery::Projectile,
    }
}

/// Turn pre-computed wire effects into outcomes by replaying them against
/// the previous mirror, the way the arbiter applied them. The new snapshot
/// decides freezes and shield totals.
fn replay_effects(
    before: &BattleState,
    after: &SideMap<Team>,
    effects: &[WireEffect],
) -> Result<Vec<EffectOutcome>, SyncError> {
    let mut shadow = before.teams.clone();
    let mut outcomes = Vec::with_capacity(effects.len());

    for effect in effects {
        let target = effect.target_id.clone();
        let current = shadow
            .iter_mut()
            .find_map(|(_, team)| team.get_mut(&target))
            .ok_or_else(|| SyncError::MalformedSnapshot(format!("effect targets unknown `{target}`")))?;
        let resulting = after.iter().find_map(|(_, team)| team.get(&target));
        let amount = effect.amount.max(0);

        match effect.kind {
            WireEffectKind::Damage => {
                if current.is_alive() {
                    let absorbed = current.status.absorb(amount);
                    let change = current.apply_damage(amount - absorbed);
                    outcomes.push(EffectOutcome::Damage {
                        target: target.clone(),
                        amount: change.applied,
                        absorbed,
                        critical: effect.is_critical,
                        killed: change.killed,
                    });
                }
            }
            WireEffectKind::Heal => {
                if current.is_alive() {
                    let healed = current.heal(amount);
                    if healed > 0 {
                        outcomes.push(EffectOutcome::Heal {
                            target: target.clone(),
                            amount: healed,
                        });
                    }
                } else if let Some(revived) = resulting.filter(|c| c.is_alive()) {
                    current.current_health = revived.current_health;
                    outcomes.push(EffectOutcome::Revive {
                        target: target.clone(),
                        restored: revived.current_health,
                    });
                }
            }
            WireEffectKind::Shield => {
                current.status.shield += amount;
                let total = resulting.map_or(current.status.shield, |c| c.status.shield);
                outcomes.push(EffectOutcome::Shield {
                    target: target.clone(),
                    amount,
                    total,
                });
            }
            WireEffectKind::Other => debug!(target = %target, "unrecognized effect type skipped"),
        }

        if effect.freeze && resulting.is_some_and(|c| c.is_alive()) {
            outcomes.push(EffectOutcome::Freeze { target, turns: 1 });
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BattleMode;
    use serde_json::json;

    fn config() -> BattleConfig {
        BattleConfig::default().with_mode(BattleMode::PlayerVsPlayer {
            battle_id: "battle_42".into(),
        })
    }

    fn member(team: &str, slot: u32, hp: i64, shields: i64) -> serde_json::Value {
        json!({
            "instanceId": format!("{team}-toy-{slot}"),
            "id": "toy",
            "name": format!("Toy {slot}"),
            "team": team,
            "currentHealth": hp,
            "maxHealth": 100,
            "isAlive": hp > 0,
            "shields": shields,
            "status": { "frozen": false }
        })
    }

    fn state(turn: u32, p2_hp: i64) -> serde_json::Value {
        json!({
            "battleId": "battle_42",
            "currentTurn": if turn % 2 == 0 { "player1" } else { "player2" },
            "turnNumber": turn,
            "player1Team": [member("player1", 0, 100, 0), member("player1", 1, 100, 0), member("player1", 2, 100, 0)],
            "player2Team": [member("player2", 0, p2_hp, 0), member("player2", 1, 100, 0), member("player2", 2, 100, 0)],
            "isComplete": false,
            "winner": null
        })
    }

    fn initialized() -> (SyncSession, AnimationQueue) {
        let mut session = SyncSession::new(&config(), "wallet-1", Side::A).unwrap();
        let mut queue = AnimationQueue::new();
        let init = json!({ "type": "battle_initialized", "state": state(0, 100), "seed": 99 });
        session.handle_json(&init.to_string(), &mut queue).unwrap();
        (session, queue)
    }

    fn hit(turn: u32, amount: i64, p2_hp: i64) -> String {
        json!({
            "type": "battle_action",
            "action": {
                "type": "ability_used",
                "turnNumber": turn,
                "caster": { "instanceId": "player1-toy-0", "team": "player1" },
                "ability": { "name": "Punch", "effect": "damage", "damage": 20 },
                "targets": [{ "instanceId": "player2-toy-0" }],
                "effects": [{ "targetId": "player2-toy-0", "type": "damage", "amount": amount }]
            },
            "state": state(turn + 1, p2_hp)
        })
        .to_string()
    }

    #[test]
    fn test_requires_pvp_mode() {
        let err = SyncSession::new(&BattleConfig::default(), "wallet-1", Side::A).unwrap_err();
        assert!(matches!(err, SyncError::Battle(BattleError::InvalidConfig(_))));
    }

    #[test]
    fn test_action_before_initialization_is_unexpected() {
        let mut session = SyncSession::new(&config(), "wallet-1", Side::A).unwrap();
        let err = session.handle_json(&hit(0, 20, 80), &mut AnimationQueue::new()).unwrap_err();
        assert!(matches!(err, SyncError::UnexpectedEvent { event: "battle_action", .. }));
    }

    #[test]
    fn test_initialize_mirrors_rosters() {
        let (session, _) = initialized();
        assert_eq!(session.phase(), &SessionPhase::InProgress);
        let state = session.state().unwrap();
        assert_eq!(state.teams[Side::B].living_count(), 3);
        assert_eq!(state.current_turn_owner, Side::A);
    }

    #[test]
    fn test_action_replays_effects() {
        let (mut session, mut queue) = initialized();
        let update = session.handle_json(&hit(0, 20, 80), &mut queue).unwrap();
        assert_eq!(update, SessionUpdate::ActionApplied { turn: Some(0) });

        let state = session.state().unwrap();
        let target = state.character(&InstanceId::new("player2-toy-0")).unwrap();
        assert_eq!(target.current_health, 80);
        assert_eq!(state.log.len(), 1);
        assert_eq!(state.stats.tally(&InstanceId::new("player1-toy-0")).damage_dealt, 20);
        assert!(!queue.is_idle());
    }

    #[test]
    fn test_stale_action_dropped() {
        let (mut session, mut queue) = initialized();
        session.handle_json(&hit(3, 20, 80), &mut queue).unwrap();
        let update = session.handle_json(&hit(2, 20, 60), &mut queue).unwrap();
        assert_eq!(update, SessionUpdate::Stale { turn: 2, last: 3 });
        let target = session.state().unwrap().character(&InstanceId::new("player2-toy-0")).unwrap().current_health;
        assert_eq!(target, 80);
    }

    #[test]
    fn test_shield_absorbs_replayed_damage() {
        let mut session = SyncSession::new(&config(), "wallet-1", Side::A).unwrap();
        let mut queue = AnimationQueue::new();
        let mut start = state(0, 100);
        start["player2Team"][0]["shields"] = json!(10);
        session
            .handle_json(&json!({ "type": "battle_initialized", "state": start }).to_string(), &mut queue)
            .unwrap();

        session.handle_json(&hit(0, 21, 89), &mut queue).unwrap();
        let record = session.state().unwrap().log.back().cloned().unwrap();
        assert_eq!(
            record.outcomes,
            vec![EffectOutcome::Damage {
                target: InstanceId::new("player2-toy-0"),
                amount: 11,
                absorbed: 10,
                critical: false,
                killed: false,
            }]
        );
    }

    #[test]
    fn test_cosmetic_variant_matches_across_participants() {
        let (mut one, _) = initialized();
        let mut other = SyncSession::new(&config(), "wallet-2", Side::B).unwrap();
        let init = json!({ "type": "battle_initialized", "state": state(0, 100), "seed": 99 });
        other.handle_json(&init.to_string(), &mut AnimationQueue::new()).unwrap();

        let picks: Vec<_> = (0..5).map(|_| one.cosmetic_variant(4)).collect();
        let theirs: Vec<_> = (0..5).map(|_| other.cosmetic_variant(4)).collect();
        assert_eq!(picks, theirs);
        assert!(picks.iter().all(|&p| p < 4));
    }

    #[test]
    fn test_complete_with_participant_id() {
        let (mut session, mut queue) = initialized();
        let done = json!({ "type": "battle_complete", "winner": "wallet-1" }).to_string();
        let SessionUpdate::Completed(outcome) = session.handle_json(&done, &mut queue).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(outcome.winner, Some(Side::A));
        assert!(!outcome.forfeit);
        assert_eq!(outcome.summary.map(|s| s.winner), Some(Side::A));
    }
}
