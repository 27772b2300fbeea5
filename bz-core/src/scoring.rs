//! Dice → category scoring.
//!
//! Scores are **raw** category scores: the upper bonus and Yahtzee bonuses are
//! aggregated by the scorecard, never folded in here.

use crate::category::{Category, NUM_CATS};
use crate::dice::{Hand, NUM_DICE};

pub const FULL_HOUSE_SCORE: u16 = 25;
pub const SMALL_STRAIGHT_SCORE: u16 = 30;
pub const LARGE_STRAIGHT_SCORE: u16 = 40;
pub const YAHTZEE_SCORE: u16 = 50;

/// Face bitsets (bit `f-1` set for face `f`).
const SMALL_RUNS: [u8; 3] = [0b00_1111, 0b01_1110, 0b11_1100];
const LARGE_RUNS: [u8; 2] = [0b01_1111, 0b11_1110];

/// Frequency table: `counts[f-1]` is the number of dice showing face `f`.
///
/// Faces outside 1..=6 are ignored.
pub fn face_counts(dice: &[u8]) -> [u8; 6] {
    let mut counts = [0u8; 6];
    for &d in dice {
        if (1..=6).contains(&d) {
            counts[(d - 1) as usize] += 1;
        }
    }
    counts
}

fn is_well_formed(dice: &[u8]) -> bool {
    dice.len() == NUM_DICE && dice.iter().all(|d| (1..=6).contains(d))
}

fn face_set(counts: &[u8; 6]) -> u8 {
    let mut set = 0u8;
    for (i, &c) in counts.iter().enumerate() {
        if c > 0 {
            set |= 1 << i;
        }
    }
    set
}

/// Score `dice` in `category`.
///
/// Anything other than exactly five dice in 1..=6 scores 0 in every category.
/// The engine never scores incomplete hands; this only keeps the function total.
pub fn score(category: Category, dice: &[u8]) -> u16 {
    if !is_well_formed(dice) {
        return 0;
    }

    let counts = face_counts(dice);
    let sum: u16 = dice.iter().map(|&d| d as u16).sum();
    let max_count = counts.iter().copied().max().unwrap_or(0);

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.index();
            counts[face] as u16 * (face as u16 + 1)
        }
        Category::ThreeOfAKind => {
            if max_count >= 3 {
                sum
            } else {
                0
            }
        }
        Category::FourOfAKind => {
            if max_count >= 4 {
                sum
            } else {
                0
            }
        }
        Category::FullHouse => {
            // Two distinct faces, one tripled and one paired. Five of a kind is not a house.
            let has3 = counts.contains(&3);
            let has2 = counts.contains(&2);
            if has3 && has2 {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            let faces = face_set(&counts);
            if SMALL_RUNS.iter().any(|&run| faces & run == run) {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            let faces = face_set(&counts);
            if LARGE_RUNS.contains(&faces) {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if max_count == 5 {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => sum,
    }
}

/// Scores for all 13 categories, in category index order.
pub fn scores_for_dice(dice: Hand) -> [u16; NUM_CATS] {
    let mut out = [0u16; NUM_CATS];
    for cat in Category::ALL {
        out[cat.index()] = score(cat, &dice);
    }
    out
}

/// True if all five dice show the same face.
pub fn is_yahtzee(dice: &[u8]) -> bool {
    score(Category::Yahtzee, dice) == YAHTZEE_SCORE
}
