//! Dice hands, held-die masks and the two chance sources.
//!
//! - `roll` draws fresh faces from an injected `rand::Rng`.
//! - `roll_keyed` derives faces from a structural event key instead of evolving RNG
//!   state: event key (game_seed, player, round, roll) -> a fixed sequence of 5 faces.
//!   When k dice are rerolled, the k-th rerolled position (in position order) takes the
//!   k-th face of that sequence.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const NUM_DICE: usize = 5;

/// Five face values, each in 1..=6, in roll position order.
pub type Hand = [u8; NUM_DICE];

/// Set of held die positions; bit `i` is position `i` (0..=4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldMask(u8);

impl HeldMask {
    pub const NONE: HeldMask = HeldMask(0);
    pub const ALL: HeldMask = HeldMask(0b1_1111);

    /// Build from raw bits; bits above position 4 are dropped.
    pub fn from_bits(bits: u8) -> HeldMask {
        HeldMask(bits & Self::ALL.0)
    }

    pub fn from_positions(positions: &[usize]) -> HeldMask {
        let mut m = HeldMask::NONE;
        for &p in positions {
            if p < NUM_DICE {
                m.0 |= 1 << p;
            }
        }
        m
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, pos: usize) -> bool {
        pos < NUM_DICE && (self.0 >> pos) & 1 != 0
    }

    /// Flip `pos`. Out-of-range positions leave the mask unchanged.
    pub fn toggled(self, pos: usize) -> HeldMask {
        if pos < NUM_DICE {
            HeldMask(self.0 ^ (1 << pos))
        } else {
            self
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn positions(self) -> impl Iterator<Item = usize> {
        (0..NUM_DICE).filter(move |&p| self.contains(p))
    }
}

/// Roll every non-held position of `prev` with `rng`.
///
/// With no previous hand (first roll of a turn) all five dice are rolled and `held`
/// is ignored.
pub fn roll<R: Rng + ?Sized>(prev: Option<Hand>, held: HeldMask, rng: &mut R) -> Hand {
    match prev {
        None => {
            let mut out = [0u8; NUM_DICE];
            for o in &mut out {
                *o = rng.gen_range(1..=6);
            }
            out
        }
        Some(mut hand) => {
            for (i, die) in hand.iter_mut().enumerate() {
                if !held.contains(i) {
                    *die = rng.gen_range(1..=6);
                }
            }
            hand
        }
    }
}

/// Structural event key for deterministic dice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub game_seed: u64,
    pub player: u8,
    /// Turn number of `player` (categories already filled).
    pub round: u8,
    /// Roll number within the turn (0, 1, 2).
    pub roll: u8,
}

/// SplitMix64 step.
fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_seed(key: EventKey) -> u64 {
    // Fixed mixing; std Hash/RandomState is not stable across builds.
    let mut x = key.game_seed;
    x ^= (key.player as u64).wrapping_mul(0xD6E8FEB86659FD93);
    x ^= (key.round as u64).wrapping_mul(0xA5A35625E4F7C1AD);
    x ^= (key.roll as u64).wrapping_mul(0x9E3779B97F4A7C15);
    let mut s = x;
    splitmix64_next(&mut s)
}

/// The five faces assigned to an event key.
pub fn roll5(key: EventKey) -> Hand {
    let mut state = mix_seed(key);
    let mut out = [0u8; NUM_DICE];
    for o in &mut out {
        let r = splitmix64_next(&mut state);
        *o = ((r % 6) + 1) as u8;
    }
    out
}

/// Event-keyed counterpart of [`roll`].
pub fn roll_keyed(prev: Option<Hand>, held: HeldMask, key: EventKey) -> Hand {
    let draws = roll5(key);
    let Some(mut hand) = prev else {
        return draws;
    };
    let mut k = 0usize;
    for (i, die) in hand.iter_mut().enumerate() {
        if !held.contains(i) {
            *die = draws[k];
            k += 1;
        }
    }
    hand
}
