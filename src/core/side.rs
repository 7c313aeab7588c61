//! Team sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides, `A` and `B`. The side that is not
//! acting is the `opponent()`.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for anything the engine
//! tracks once per team (acting cursors, combo counters, controllers).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two teams in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides, in canonical order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Slot index (A = 0, B = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "Side A"),
            Side::B => write!(f, "Side B"),
        }
    }
}

/// Per-side data storage.
///
/// ```
/// use toy_arena::core::{Side, SideMap};
///
/// let mut combo: SideMap<u32> = SideMap::with_value(0);
/// combo[Side::A] += 2;
///
/// assert_eq!(combo[Side::A], 2);
/// assert_eq!(combo[Side::B], 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create from a factory called once per side.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::A), factory(Side::B)],
        }
    }

    /// Create from explicit values.
    pub fn from_pair(a: T, b: T) -> Self {
        Self { data: [a, b] }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::BOTH.into_iter().zip(self.data.iter_mut())
    }

    /// Borrow both entries mutably, acting side first.
    pub fn split_mut(&mut self, first: Side) -> (&mut T, &mut T) {
        let (a, b) = self.data.split_at_mut(1);
        match first {
            Side::A => (&mut a[0], &mut b[0]),
            Side::B => (&mut b[0], &mut a[0]),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
        assert_eq!(Side::A.opponent().opponent(), Side::A);
    }

    #[test]
    fn test_side_map_new() {
        let map: SideMap<usize> = SideMap::new(|s| s.index() * 10);
        assert_eq!(map[Side::A], 0);
        assert_eq!(map[Side::B], 10);
    }

    #[test]
    fn test_side_map_iter() {
        let map = SideMap::from_pair("left", "right");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::A, &"left"), (Side::B, &"right")]);
    }

    #[test]
    fn test_split_mut_orders_by_first() {
        let mut map = SideMap::from_pair(1, 2);
        let (mine, theirs) = map.split_mut(Side::B);
        assert_eq!((*mine, *theirs), (2, 1));
        *mine = 20;
        *theirs = 10;
        assert_eq!(map, SideMap::from_pair(10, 20));
    }

    #[test]
    fn test_side_serialization() {
        let json = serde_json::to_string(&Side::B).unwrap();
        assert_eq!(json, "\"B\"");
    }
}
