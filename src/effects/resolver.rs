//! Effect resolution.
//!
//! `EffectResolver::resolve` applies one ability to a resolved target list
//! and returns the outcomes in application order. Each `EffectKind` variant
//! has its own resolver method, dispatched by an exhaustive match.
//!
//! The only random draws are one critical roll per damage instance.

use tracing::debug;

use super::damage::{apply_combo, apply_critical, DamageModel};
use super::effect::EffectOutcome;
use crate::abilities::{Ability, EffectKind};
use crate::characters::{CharacterInstance, Team};
use crate::core::{BattleConfig, InstanceId, RandomSource, Side, SideMap};
use crate::error::{BattleError, Result};

/// Resolves abilities against the battle's teams.
///
/// ```
/// use toy_arena::abilities::{Ability, EffectKind};
/// use toy_arena::characters::{CharacterRegistry, Team};
/// use toy_arena::core::{BattleConfig, GameRng, Side, SideMap};
/// use toy_arena::effects::{EffectOutcome, EffectResolver, StandardDamageModel};
///
/// let registry = CharacterRegistry::standard();
/// let a = registry.roster(Side::A, "a", &["teddy_warrior", "brick_dude", "pirate_captain"]).unwrap();
/// let b = registry.roster(Side::B, "b", &["rubber_duckie", "wizard_toy", "robo_fighter"]).unwrap();
/// let mut teams = SideMap::from_pair(Team::new(Side::A, a).unwrap(), Team::new(Side::B, b).unwrap());
///
/// let config = BattleConfig::default().without_criticals();
/// let resolver = EffectResolver::new(&config, &StandardDamageModel);
/// let caster = teams[Side::A].members()[0].instance_id.clone();
/// let target = teams[Side::B].members()[0].instance_id.clone();
/// let punch = Ability::new("punch", "Punch", EffectKind::Damage).with_damage(20);
///
/// let mut combo = 0;
/// let outcomes = resolver
///     .resolve(&mut teams, &caster, &punch, &[target], &mut combo, &mut GameRng::new(1))
///     .unwrap();
///
/// // Rare caster: round(20 * 1.1) = 22, minus half of defense 5 => 20 (rounded from 19.5)
/// assert!(matches!(outcomes[0], EffectOutcome::Damage { amount: 20, .. }));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EffectResolver<'a> {
    config: &'a BattleConfig,
    model: &'a dyn DamageModel,
}

impl<'a> EffectResolver<'a> {
    pub fn new(config: &'a BattleConfig, model: &'a dyn DamageModel) -> Self {
        Self { config, model }
    }

    /// Apply `ability` cast by `caster` to `targets`.
    ///
    /// `combo` is the caster side's running count of damage instances since
    /// it took control; it is incremented once per damage instance.
    pub fn resolve<R: RandomSource>(
        &self,
        teams: &mut SideMap<Team>,
        caster: &InstanceId,
        ability: &Ability,
        targets: &[InstanceId],
        combo: &mut u32,
        rng: &mut R,
    ) -> Result<Vec<EffectOutcome>> {
        let caster = find(teams, caster)
            .cloned()
            .ok_or_else(|| BattleError::UnknownInstance(caster.clone()))?;
        if let Some(unknown) = targets.iter().find(|t| find(teams, t).is_none()) {
            return Err(BattleError::UnknownInstance(unknown.clone()));
        }

        let mut resolution = Resolution {
            config: self.config,
            model: self.model,
            teams,
            caster,
            ability,
            combo,
            rng,
            damage_bonus: None,
            outcomes: Vec::new(),
        };
        resolution.run(targets);
        resolution.finish();

        debug!(
            ability = %ability.id,
            kind = %ability.kind,
            outcomes = resolution.outcomes.len(),
            "ability resolved"
        );
        Ok(resolution.outcomes)
    }
}

fn find<'t>(teams: &'t SideMap<Team>, id: &InstanceId) -> Option<&'t CharacterInstance> {
    teams.iter().find_map(|(_, team)| team.get(id))
}

fn find_mut<'t>(teams: &'t mut SideMap<Team>, id: &InstanceId) -> Option<&'t mut CharacterInstance> {
    let side = Side::BOTH.into_iter().find(|&s| teams[s].contains(id))?;
    teams[side].get_mut(id)
}

/// State for one ability application.
struct Resolution<'r, R> {
    config: &'r BattleConfig,
    model: &'r dyn DamageModel,
    teams: &'r mut SideMap<Team>,
    caster: CharacterInstance,
    ability: &'r Ability,
    combo: &'r mut u32,
    rng: &'r mut R,
    /// Pending damage buff, taken from the caster on the first damage instance.
    damage_bonus: Option<i64>,
    outcomes: Vec<EffectOutcome>,
}

impl<R: RandomSource> Resolution<'_, R> {
    fn run(&mut self, targets: &[InstanceId]) {
        match self.ability.kind {
            EffectKind::Damage => self.resolve_damage(targets),
            EffectKind::DamageAll => self.resolve_damage_all(targets),
            EffectKind::DamageChain => self.resolve_damage_chain(targets),
            EffectKind::DamageCascade => self.resolve_damage_cascade(targets),
            EffectKind::MultiDamage => self.resolve_multi_damage(targets),
            EffectKind::Heal => self.resolve_heal(targets),
            EffectKind::HealAll => self.resolve_heal_all(targets),
            EffectKind::HealReviveAll => self.resolve_heal_revive_all(targets),
            EffectKind::Shield => self.resolve_shield(targets),
            EffectKind::ShieldAll => self.resolve_shield_all(targets),
            EffectKind::FreezeAll => self.resolve_freeze_all(targets),
            EffectKind::BuffDamageAll => self.resolve_buff_damage_all(targets),
            EffectKind::BuffCriticalAll => self.resolve_buff_critical_all(targets),
            EffectKind::DebuffAccuracy => self.resolve_debuff_accuracy(targets),
            EffectKind::Mixed => self.resolve_mixed(targets),
            EffectKind::MixedAll => self.resolve_mixed_all(targets),
        }
    }

    /// Consume single-use caster buffs once the action dealt damage.
    fn finish(&mut self) {
        if self.damage_bonus.is_none() {
            return;
        }
        if let Some(caster) = find_mut(self.teams, &self.caster.instance_id) {
            caster.status.expire_single_use_critical();
        }
    }

    // === Per-kind resolvers ===

    fn resolve_damage(&mut self, targets: &[InstanceId]) {
        for target in targets {
            self.hit(target, self.ability.damage as f64);
        }
    }

    fn resolve_damage_all(&mut self, targets: &[InstanceId]) {
        self.resolve_damage(targets);
    }

    fn resolve_damage_chain(&mut self, targets: &[InstanceId]) {
        let config = self.config;
        let multipliers = &config.chain_multipliers;
        for (i, target) in targets.iter().enumerate() {
            let multiplier = multipliers
                .get(i)
                .or_else(|| multipliers.last())
                .copied()
                .unwrap_or(1.0);
            self.hit(target, self.ability.damage as f64 * multiplier);
        }
    }

    fn resolve_damage_cascade(&mut self, targets: &[InstanceId]) {
        for (i, target) in targets.iter().enumerate() {
            let base = (self.ability.damage as f64 * self.ability.cascade_multiplier(i)).floor();
            self.hit(target, base);
        }
    }

    fn resolve_multi_damage(&mut self, targets: &[InstanceId]) {
        for target in targets {
            for _ in 0..self.ability.hits {
                if !self.is_alive(target) {
                    break;
                }
                self.hit(target, self.ability.damage as f64);
            }
        }
    }

    fn resolve_heal(&mut self, targets: &[InstanceId]) {
        for target in targets {
            self.heal(target, self.ability.heal);
        }
    }

    fn resolve_heal_all(&mut self, targets: &[InstanceId]) {
        self.resolve_heal(targets);
    }

    fn resolve_heal_revive_all(&mut self, targets: &[InstanceId]) {
        let fraction = self.config.revive_fraction;
        for target in targets {
            let Some(character) = find_mut(self.teams, target) else {
                continue;
            };
            if character.is_defeated() {
                let restored = character.revive(fraction);
                if restored > 0 {
                    self.outcomes.push(EffectOutcome::Revive {
                        target: target.clone(),
                        restored,
                    });
                }
            } else {
                self.heal(target, self.ability.heal);
            }
        }
    }

    fn resolve_shield(&mut self, targets: &[InstanceId]) {
        for target in targets {
            self.shield(target, self.ability.shield);
        }
    }

    fn resolve_shield_all(&mut self, targets: &[InstanceId]) {
        self.resolve_shield(targets);
    }

    fn resolve_freeze_all(&mut self, targets: &[InstanceId]) {
        for target in targets {
            self.hit(target, self.ability.damage as f64);
            if let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) {
                character.status.freeze(1);
                self.outcomes.push(EffectOutcome::Freeze {
                    target: target.clone(),
                    turns: 1,
                });
            }
        }
    }

    fn resolve_buff_damage_all(&mut self, targets: &[InstanceId]) {
        let bonus = self.ability.damage_buff.unwrap_or(self.config.default_damage_buff);
        for target in targets {
            if let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) {
                character.status.add_damage_buff(bonus);
                self.outcomes.push(EffectOutcome::DamageBuff {
                    target: target.clone(),
                    bonus,
                });
            }
        }
    }

    fn resolve_buff_critical_all(&mut self, targets: &[InstanceId]) {
        let bonus = self
            .ability
            .critical_boost
            .unwrap_or(self.config.default_critical_boost);
        let permanent = self.ability.critical_boost_permanent;
        for target in targets {
            if let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) {
                character.status.add_critical_buff(bonus, permanent);
                self.outcomes.push(EffectOutcome::CriticalBuff {
                    target: target.clone(),
                    bonus,
                    permanent,
                });
            }
        }
    }

    fn resolve_debuff_accuracy(&mut self, targets: &[InstanceId]) {
        let miss_chance = self.ability.miss_chance.unwrap_or(self.config.default_miss_chance);
        for target in targets {
            if self.ability.damage > 0 {
                self.flat_hit(target, self.ability.damage);
            }
            if let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) {
                character.status.debuff_accuracy(miss_chance);
                self.outcomes.push(EffectOutcome::AccuracyDebuff {
                    target: target.clone(),
                    miss_chance,
                });
            }
        }
    }

    fn resolve_mixed(&mut self, targets: &[InstanceId]) {
        let (enemies, allies) = self.partition(targets);
        for target in &enemies {
            self.hit(target, self.ability.damage as f64);
        }
        for target in &allies {
            self.heal(target, self.ability.heal);
        }
    }

    fn resolve_mixed_all(&mut self, targets: &[InstanceId]) {
        self.resolve_mixed(targets);
    }

    // === Shared rules ===

    fn is_alive(&self, target: &InstanceId) -> bool {
        find(self.teams, target).is_some_and(CharacterInstance::is_alive)
    }

    /// Split targets into opponents and the caster's own side.
    fn partition(&self, targets: &[InstanceId]) -> (Vec<InstanceId>, Vec<InstanceId>) {
        let own = self.caster.side;
        targets
            .iter()
            .cloned()
            .partition(|t| !self.teams[own].contains(t))
    }

    fn take_damage_bonus(&mut self) -> i64 {
        if let Some(bonus) = self.damage_bonus {
            return bonus;
        }
        let bonus = find_mut(self.teams, &self.caster.instance_id)
            .map(|c| c.status.take_damage_buff())
            .unwrap_or(0);
        self.damage_bonus = Some(bonus);
        bonus
    }

    /// One standard damage instance.
    fn hit(&mut self, target: &InstanceId, base: f64) {
        if !self.is_alive(target) {
            return;
        }
        let scaled = if base > 0.0 {
            self.model.scale(base, &self.caster).max(1)
        } else {
            0
        };
        let raw = scaled + self.take_damage_bonus();
        let critical_chance = self.caster.critical_chance(self.config.base_critical_chance);
        let config = self.config;

        let Some(character) = find_mut(self.teams, target) else {
            return;
        };
        let reduced = self.model.reduce(raw, character);
        if reduced <= 0 {
            return;
        }

        *self.combo += 1;
        let reduced = apply_combo(config, reduced, *self.combo);
        let absorbed = character.status.absorb(reduced);
        let mut remaining = reduced - absorbed;

        let critical = self.rng.gen_bool(critical_chance) && remaining > 0;
        if critical {
            remaining = apply_critical(config, remaining);
        }

        let change = character.apply_damage(remaining);
        self.outcomes.push(EffectOutcome::Damage {
            target: target.clone(),
            amount: change.applied,
            absorbed,
            critical,
            killed: change.killed,
        });
    }

    /// Unscaled damage that ignores defense, criticals and combos.
    fn flat_hit(&mut self, target: &InstanceId, amount: i64) {
        let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) else {
            return;
        };
        let absorbed = character.status.absorb(amount);
        let change = character.apply_damage(amount - absorbed);
        self.outcomes.push(EffectOutcome::Damage {
            target: target.clone(),
            amount: change.applied,
            absorbed,
            critical: false,
            killed: change.killed,
        });
    }

    /// Heal a living target. No-op heals produce no outcome.
    fn heal(&mut self, target: &InstanceId, amount: i64) {
        let Some(character) = find_mut(self.teams, target) else {
            return;
        };
        let actual = character.heal(amount);
        if actual > 0 {
            self.outcomes.push(EffectOutcome::Heal {
                target: target.clone(),
                amount: actual,
            });
        }
    }

    fn shield(&mut self, target: &InstanceId, amount: i64) {
        let cap = self.config.shield_cap;
        let Some(character) = find_mut(self.teams, target).filter(|c| c.is_alive()) else {
            return;
        };
        let added = character.status.add_shield(amount, cap);
        if added > 0 {
            self.outcomes.push(EffectOutcome::Shield {
                target: target.clone(),
                amount: added,
                total: character.status.shield,
            });
        }
    }
}
