//! Random sources shared by the local engine and the sync layer.
//!
//! Every stream here is reproducible from a `u64` seed, and battles derive
//! their seed from the battle identifier so both ends of a match start from
//! the same number.
//!
//! Two generators implement [`RandomSource`]:
//!
//! - [`GameRng`] (ChaCha8) drives single-player resolution: ability
//!   selection, auto-targeting, critical and miss rolls.
//! - [`ArbiterRandom`] reproduces the remote arbiter's linear congruential
//!   generator bit for bit. The sync layer uses it for cosmetic choices and
//!   the local target-selection timeout fallback, never for contested
//!   outcomes.
//!
//! ```
//! use toy_arena::core::{battle_seed, ArbiterRandom, RandomSource};
//!
//! let mut ours = ArbiterRandom::new(battle_seed("battle-42"));
//! let mut theirs = ArbiterRandom::new(battle_seed("battle-42"));
//!
//! assert_eq!(ours.next_f64(), theirs.next_f64());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Common interface over the crate's random generators.
///
/// Only `next_f64` is required; the derived draws follow the arbiter's
/// conventions so every implementation agrees on how a uniform float maps to
/// an index or a weighted choice.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`, `None` when `len == 0`.
    fn gen_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let idx = (self.next_f64() * len as f64).floor() as usize;
        Some(idx.min(len - 1))
    }

    /// `true` with the given probability.
    fn gen_bool(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.next_f64() < probability
    }

    /// Choose a random element from a slice.
    fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        self.gen_index(slice.len()).map(|i| &slice[i])
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Non-positive weights are never picked. `None` when nothing is
    /// pickable.
    fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let positive = |w: &f64| *w > 0.0;
        let total: f64 = weights.iter().copied().filter(positive).sum();
        if total <= 0.0 {
            return None;
        }

        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        let picked = weights.iter().enumerate().filter(|(_, w)| positive(*w)).find(|(_, w)| {
            cumulative += **w;
            roll < cumulative
        });

        // Rounding can leave the roll just past the last bucket
        picked.map(|(i, _)| i).or_else(|| weights.iter().rposition(positive))
    }
}

/// Derive a numeric seed from a battle identifier.
///
/// 31-multiplier string hash over UTF-16 code units, wrapped to a signed
/// 32-bit integer and made non-negative. Matches the arbiter's derivation.
#[must_use]
pub fn battle_seed(battle_id: &str) -> u64 {
    let hash = battle_id.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    i64::from(hash).unsigned_abs()
}

const LCG_MULTIPLIER: u64 = 1_664_525;
const LCG_INCREMENT: u64 = 1_013_904_223;
const LCG_MODULUS: u64 = 2_147_483_647;

/// The arbiter's linear congruential generator.
///
/// `seed = (seed * 1664525 + 1013904223) mod 2147483647`, yielding
/// `seed / 2147483647`. Seeds are reduced modulo 2147483647 up front, which
/// leaves every draw unchanged and keeps the product within `u64`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterRandom {
    seed: u64,
}

impl ArbiterRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed: seed % LCG_MODULUS,
        }
    }

    /// Seed from a battle identifier.
    #[must_use]
    pub fn for_battle(battle_id: &str) -> Self {
        Self::new(battle_seed(battle_id))
    }

    /// Current internal state.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Integer in `min..=max`.
    pub fn int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }
}

impl RandomSource for ArbiterRandom {
    fn next_f64(&mut self) -> f64 {
        self.seed = ((self.seed % LCG_MODULUS) * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.seed as f64 / LCG_MODULUS as f64
    }
}

/// ChaCha8 stream for engine-side resolution.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Stream keyed by a battle identifier, see [`battle_seed`].
    #[must_use]
    pub fn for_battle(battle_id: &str) -> Self {
        Self::new(battle_seed(battle_id))
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn gen_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.inner.gen_range(0..len))
    }
}
