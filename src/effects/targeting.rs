//! Target pools and automatic target resolution.
//!
//! The pool for an ability is derived from its targeting mode and the
//! caster's side. Defeated characters are excluded from every pool except
//! `AllAlliesIncludingDefeated`, which revive effects use.

use crate::abilities::TargetingMode;
use crate::characters::{CharacterInstance, Team};
use crate::core::{InstanceId, RandomSource, Side, SideMap};

use super::effect::TargetList;

/// Computes pools and automatic choices for one caster side.
#[derive(Clone, Copy, Debug)]
pub struct TargetSelector {
    mode: TargetingMode,
    caster_side: Side,
    chain_max: usize,
}

impl TargetSelector {
    pub fn new(mode: TargetingMode, caster_side: Side) -> Self {
        Self {
            mode,
            caster_side,
            chain_max: 3,
        }
    }

    /// Limit chain targets (defaults to 3).
    #[must_use]
    pub fn with_chain_max(mut self, chain_max: usize) -> Self {
        self.chain_max = chain_max;
        self
    }

    #[must_use]
    pub fn mode(&self) -> TargetingMode {
        self.mode
    }

    /// Every character this ability may touch, in roster order
    /// (enemies before allies for mixed modes).
    #[must_use]
    pub fn valid_targets(&self, teams: &SideMap<Team>) -> TargetList {
        let enemies = &teams[self.caster_side.opponent()];
        let allies = &teams[self.caster_side];

        match self.mode {
            TargetingMode::SingleEnemy | TargetingMode::AllEnemies => living_ids(enemies).collect(),
            TargetingMode::ChainEnemies => living_ids(enemies).take(self.chain_max).collect(),
            TargetingMode::SingleAlly | TargetingMode::AllAllies => living_ids(allies).collect(),
            TargetingMode::AllAlliesIncludingDefeated => allies
                .members()
                .iter()
                .map(|c| c.instance_id.clone())
                .collect(),
            TargetingMode::EnemyAndAlly | TargetingMode::Everyone => {
                living_ids(enemies).chain(living_ids(allies)).collect()
            }
        }
    }

    /// Resolve targets without asking anyone.
    ///
    /// - single enemy: uniform random living enemy
    /// - single ally: living ally with the lowest health ratio
    /// - enemy and ally: one random of each
    /// - everything else: the whole pool
    pub fn auto_select(&self, teams: &SideMap<Team>, rng: &mut impl RandomSource) -> TargetList {
        let enemies = &teams[self.caster_side.opponent()];
        let allies = &teams[self.caster_side];

        match self.mode {
            TargetingMode::SingleEnemy => random_living(enemies, rng).into_iter().collect(),
            TargetingMode::SingleAlly => most_injured(allies).into_iter().collect(),
            TargetingMode::EnemyAndAlly => random_living(enemies, rng)
                .into_iter()
                .chain(random_living(allies, rng))
                .collect(),
            _ => self.valid_targets(teams),
        }
    }
}

fn living_ids(team: &Team) -> impl Iterator<Item = InstanceId> + '_ {
    team.living().map(|c| c.instance_id.clone())
}

fn random_living(team: &Team, rng: &mut impl RandomSource) -> Option<InstanceId> {
    let living: Vec<&CharacterInstance> = team.living().collect();
    rng.choose(&living).map(|c| c.instance_id.clone())
}

/// Lowest health ratio, first in roster order on ties.
fn most_injured(team: &Team) -> Option<InstanceId> {
    team.living()
        .fold(None::<&CharacterInstance>, |best, c| match best {
            Some(b) if b.health_ratio() <= c.health_ratio() => Some(b),
            _ => Some(c),
        })
        .map(|c| c.instance_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{CharacterTemplate, Rarity};
    use crate::core::GameRng;

    fn team(side: Side, healths: &[i64]) -> Team {
        let template = CharacterTemplate::new("toy", "Toy", Rarity::Common, 100);
        let prefix = if side == Side::A { "a" } else { "b" };
        let members = healths
            .iter()
            .enumerate()
            .map(|(i, &hp)| {
                let mut c = template.instantiate(InstanceId::new(format!("{prefix}-{i}")), side);
                c.current_health = hp;
                c
            })
            .collect();
        Team::new(side, members).unwrap()
    }

    fn teams(a: &[i64], b: &[i64]) -> SideMap<Team> {
        SideMap::from_pair(team(Side::A, a), team(Side::B, b))
    }

    fn ids(list: &TargetList) -> Vec<&str> {
        list.iter().map(InstanceId::as_str).collect()
    }

    #[test]
    fn test_enemy_pool_excludes_defeated() {
        let teams = teams(&[100, 100, 100], &[100, 0, 50]);
        let pool = TargetSelector::new(TargetingMode::SingleEnemy, Side::A).valid_targets(&teams);
        assert_eq!(ids(&pool), vec!["b-0", "b-2"]);
    }

    #[test]
    fn test_revive_pool_includes_defeated_allies() {
        let teams = teams(&[0, 100, 0], &[100, 100, 100]);
        let pool = TargetSelector::new(TargetingMode::AllAlliesIncludingDefeated, Side::A)
            .valid_targets(&teams);
        assert_eq!(ids(&pool), vec!["a-0", "a-1", "a-2"]);
    }

    #[test]
    fn test_chain_takes_first_living_in_order() {
        let teams = teams(&[100, 100, 100], &[0, 40, 40]);
        let pool = TargetSelector::new(TargetingMode::ChainEnemies, Side::A)
            .with_chain_max(2)
            .valid_targets(&teams);
        assert_eq!(ids(&pool), vec!["b-1", "b-2"]);
    }

    #[test]
    fn test_mixed_pool_enemies_first() {
        let teams = teams(&[100, 0, 100], &[100, 100, 0]);
        let pool = TargetSelector::new(TargetingMode::Everyone, Side::B).valid_targets(&teams);
        assert_eq!(ids(&pool), vec!["a-0", "a-2", "b-0", "b-1"]);
    }

    #[test]
    fn test_auto_single_ally_picks_most_injured() {
        let teams = teams(&[90, 30, 30], &[100, 100, 100]);
        let mut rng = GameRng::new(1);
        let chosen = TargetSelector::new(TargetingMode::SingleAlly, Side::A).auto_select(&teams, &mut rng);
        assert_eq!(ids(&chosen), vec!["a-1"]);
    }

    #[test]
    fn test_auto_single_enemy_is_living_member() {
        let teams = teams(&[100, 100, 100], &[0, 10, 0]);
        let mut rng = GameRng::new(5);
        for _ in 0..20 {
            let chosen = TargetSelector::new(TargetingMode::SingleEnemy, Side::A).auto_select(&teams, &mut rng);
            assert_eq!(ids(&chosen), vec!["b-1"]);
        }
    }

    #[test]
    fn test_auto_enemy_and_ally() {
        let teams = teams(&[100, 100, 100], &[100, 100, 100]);
        let mut rng = GameRng::new(3);
        let chosen = TargetSelector::new(TargetingMode::EnemyAndAlly, Side::B).auto_select(&teams, &mut rng);
        assert_eq!(chosen.len(), 2);
        assert!(chosen[0].as_str().starts_with("a-"));
        assert!(chosen[1].as_str().starts_with("b-"));
    }

    #[test]
    fn test_empty_pool_when_enemies_wiped() {
        let teams = teams(&[100, 100, 100], &[0, 0, 0]);
        let mut rng = GameRng::new(3);
        let chosen = TargetSelector::new(TargetingMode::SingleEnemy, Side::A).auto_select(&teams, &mut rng);
        assert!(chosen.is_empty());
    }
}
