//! Ordered rosters.
//!
//! Roster order is fixed at battle start and only matters for deterministic
//! fallback iteration (round-robin scanning, chain targeting).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::instance::CharacterInstance;
use crate::core::{InstanceId, Side};
use crate::error::{BattleError, Result};

/// One side's characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "TeamData", try_from = "TeamData")]
pub struct Team {
    side: Side,
    members: Vec<CharacterInstance>,
    index: FxHashMap<InstanceId, usize>,
}

#[derive(Serialize, Deserialize)]
struct TeamData {
    side: Side,
    members: Vec<CharacterInstance>,
}

impl From<Team> for TeamData {
    fn from(team: Team) -> Self {
        Self {
            side: team.side,
            members: team.members,
        }
    }
}

impl TryFrom<TeamData> for Team {
    type Error = BattleError;

    fn try_from(data: TeamData) -> Result<Self> {
        Team::new(data.side, data.members)
    }
}

impl Team {
    /// Build a team, stamping every member with `side`.
    ///
    /// Rejects duplicate instance ids and non-positive max health.
    pub fn new(side: Side, members: Vec<CharacterInstance>) -> Result<Self> {
        let mut index = FxHashMap::default();
        let mut members = members;
        for (i, member) in members.iter_mut().enumerate() {
            if member.max_health <= 0 {
                return Err(BattleError::InvalidMaxHealth(member.instance_id.clone()));
            }
            if index.insert(member.instance_id.clone(), i).is_some() {
                return Err(BattleError::DuplicateInstance(member.instance_id.clone()));
            }
            member.side = side;
            member.current_health = member.current_health.clamp(0, member.max_health);
        }
        Ok(Self { side, members, index })
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn members(&self) -> &[CharacterInstance] {
        &self.members
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut CharacterInstance> {
        self.members.iter_mut()
    }

    #[must_use]
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn position(&self, id: &InstanceId) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&CharacterInstance> {
        self.position(id).map(|i| &self.members[i])
    }

    pub fn get_mut(&mut self, id: &InstanceId) -> Option<&mut CharacterInstance> {
        self.position(id).map(move |i| &mut self.members[i])
    }

    #[must_use]
    pub fn at(&self, position: usize) -> Option<&CharacterInstance> {
        self.members.get(position)
    }

    pub fn at_mut(&mut self, position: usize) -> Option<&mut CharacterInstance> {
        self.members.get_mut(position)
    }

    /// Living members in roster order.
    pub fn living(&self) -> impl Iterator<Item = &CharacterInstance> {
        self.members.iter().filter(|c| c.is_alive())
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// No living members remain.
    #[must_use]
    pub fn is_wiped_out(&self) -> bool {
        self.living_count() == 0
    }

    /// First living member at or after `cursor`, wrapping around the roster.
    #[must_use]
    pub fn next_living_from(&self, cursor: usize) -> Option<usize> {
        let len = self.members.len();
        if len == 0 {
            return None;
        }
        (0..len)
            .map(|offset| (cursor + offset) % len)
            .find(|&i| self.members[i].is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{CharacterTemplate, Rarity};

    fn roster(side: Side, healths: &[i64]) -> Team {
        let template = CharacterTemplate::new("toy", "Toy", Rarity::Common, 50);
        let members = healths
            .iter()
            .enumerate()
            .map(|(i, &hp)| {
                let mut c = template.instantiate(InstanceId::new(format!("t-{i}")), Side::A);
                c.current_health = hp;
                c
            })
            .collect();
        Team::new(side, members).unwrap()
    }

    #[test]
    fn test_side_is_stamped() {
        let team = roster(Side::B, &[50, 50, 50]);
        assert!(team.members().iter().all(|c| c.side == Side::B));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let template = CharacterTemplate::new("toy", "Toy", Rarity::Common, 50);
        let a = template.instantiate(InstanceId::new("dup"), Side::A);
        let b = template.instantiate(InstanceId::new("dup"), Side::A);
        let err = Team::new(Side::A, vec![a, b]).unwrap_err();
        assert_eq!(err, BattleError::DuplicateInstance(InstanceId::new("dup")));
    }

    #[test]
    fn test_non_positive_max_health_rejected() {
        let template = CharacterTemplate::new("ghost", "Ghost", Rarity::Common, 0);
        let ghost = template.instantiate(InstanceId::new("g"), Side::A);
        assert!(matches!(
            Team::new(Side::A, vec![ghost]),
            Err(BattleError::InvalidMaxHealth(_))
        ));
    }

    #[test]
    fn test_next_living_from_wraps_and_skips_dead() {
        let team = roster(Side::A, &[50, 0, 50]);
        assert_eq!(team.next_living_from(0), Some(0));
        assert_eq!(team.next_living_from(1), Some(2));
        assert_eq!(team.next_living_from(3), Some(0));

        let wiped = roster(Side::A, &[0, 0, 0]);
        assert_eq!(wiped.next_living_from(0), None);
        assert!(wiped.is_wiped_out());
    }

    #[test]
    fn test_lookup() {
        let team = roster(Side::A, &[50, 20, 50]);
        let id = InstanceId::new("t-1");
        assert_eq!(team.position(&id), Some(1));
        assert_eq!(team.get(&id).map(|c| c.current_health), Some(20));
        assert!(!team.contains(&InstanceId::new("missing")));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let team = roster(Side::A, &[50, 20, 50]);
        let json = serde_json::to_string(&team).unwrap();
        let back: Team = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position(&InstanceId::new("t-2")), Some(2));
        assert_eq!(back, team);
    }
}
