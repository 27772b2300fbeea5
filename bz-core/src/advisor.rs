//! Greedy move advisor used for bot seats and hints.
//!
//! Categories are ranked by efficiency (score / best attainable score for the category).
//! The top open category is the turn's target; dice that help the target are held and
//! the rest rerolled.

use crate::action::Action;
use crate::category::Category;
use crate::dice::{Hand, HeldMask, NUM_DICE};
use crate::engine::is_game_over;
use crate::scorecard::Scorecard;
use crate::scoring::{face_counts, score};
use crate::state::GameState;

const SMALL_RUNS: [[u8; 4]; 3] = [[1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]];
const LARGE_RUNS: [[u8; 5]; 2] = [[1, 2, 3, 4, 5], [2, 3, 4, 5, 6]];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCategory {
    pub category: Category,
    pub score: u16,
    /// `score / category.max_score()`, in 0.0..=1.0.
    pub efficiency: f32,
}

/// Open categories of `card`, best first.
pub fn rank_categories(card: &Scorecard, hand: Hand) -> Vec<RankedCategory> {
    let mut out: Vec<RankedCategory> = card
        .open_categories()
        .map(|category| {
            let s = score(category, &hand);
            RankedCategory {
                category,
                score: s,
                efficiency: s as f32 / category.max_score() as f32,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.efficiency
            .total_cmp(&a.efficiency)
            .then(b.score.cmp(&a.score))
            .then(a.category.cmp(&b.category))
    });
    out
}

/// Category to chase with the remaining rolls.
pub fn choose_target(card: &Scorecard, hand: Hand) -> Option<Category> {
    rank_categories(card, hand).first().map(|r| r.category)
}

/// Category to score the final hand in.
///
/// Same as the target while the hand scores somewhere. When every open category
/// scores 0, the box with the lowest attainable maximum is scratched instead.
pub fn choose_commit(card: &Scorecard, hand: Hand) -> Option<Category> {
    let ranked = rank_categories(card, hand);
    let best = ranked.first()?;
    if best.score > 0 {
        return Some(best.category);
    }
    ranked
        .iter()
        .min_by_key(|r| (r.category.max_score(), r.category))
        .map(|r| r.category)
}

/// Positions holding faces in `faces`, at most one die per face.
fn one_per_face(hand: Hand, faces: &[u8]) -> HeldMask {
    let mut taken = [false; 7];
    let mut positions = Vec::with_capacity(NUM_DICE);
    for (i, &d) in hand.iter().enumerate() {
        if faces.contains(&d) && !taken[d as usize] {
            taken[d as usize] = true;
            positions.push(i);
        }
    }
    HeldMask::from_positions(&positions)
}

/// Positions holding any of `faces`, up to `limit` dice.
fn matching(hand: Hand, faces: &[u8], limit: usize) -> HeldMask {
    let positions: Vec<usize> = hand
        .iter()
        .enumerate()
        .filter(|(_, d)| faces.contains(*d))
        .map(|(i, _)| i)
        .take(limit)
        .collect();
    HeldMask::from_positions(&positions)
}

/// Highest face whose count satisfies `pred`.
fn best_face(counts: &[u8; 6], pred: impl Fn(u8) -> bool) -> Option<u8> {
    (0..6).rev().find(|&i| pred(counts[i])).map(|i| i as u8 + 1)
}

/// Face with the largest group (ties go to the higher face).
fn largest_group(counts: &[u8; 6]) -> (u8, u8) {
    let mut best = (0u8, 0u8);
    for i in (0..6).rev() {
        if counts[i] > best.1 {
            best = (i as u8 + 1, counts[i]);
        }
    }
    best
}

fn best_run_overlap<const N: usize>(hand: Hand, runs: &[[u8; N]], min: usize) -> HeldMask {
    let counts = face_counts(&hand);
    runs.iter()
        .map(|run| {
            run.iter()
                .copied()
                .filter(|&f| counts[(f - 1) as usize] > 0)
                .collect::<Vec<u8>>()
        })
        .filter(|o| o.len() >= min)
        .max_by_key(|o| o.len())
        .map(|o| one_per_face(hand, &o))
        .unwrap_or(HeldMask::NONE)
}

/// Dice to keep when aiming at `target` with the next reroll.
pub fn suggest_holds(hand: Hand, target: Category) -> HeldMask {
    let counts = face_counts(&hand);
    if !target.is_upper() && score(target, &hand) == target.max_score() {
        return HeldMask::ALL;
    }

    match target {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => match target.face() {
            Some(f) => matching(hand, &[f], NUM_DICE),
            None => HeldMask::NONE,
        },
        Category::ThreeOfAKind => best_face(&counts, |c| c >= 3)
            .or_else(|| best_face(&counts, |c| c == 2))
            .map(|f| matching(hand, &[f], NUM_DICE))
            .unwrap_or(HeldMask::NONE),
        Category::FourOfAKind => best_face(&counts, |c| c >= 4)
            .or_else(|| best_face(&counts, |c| c >= 3))
            .or_else(|| best_face(&counts, |c| c == 2))
            .map(|f| matching(hand, &[f], NUM_DICE))
            .unwrap_or(HeldMask::NONE),
        Category::FullHouse => {
            if let Some(f) = best_face(&counts, |c| c >= 3) {
                return matching(hand, &[f], 3);
            }
            let pairs: Vec<u8> = (1..=6u8)
                .filter(|&f| counts[(f - 1) as usize] == 2)
                .collect();
            matching(hand, &pairs, 4)
        }
        Category::SmallStraight => best_run_overlap(hand, &SMALL_RUNS[..], 3),
        Category::LargeStraight => best_run_overlap(hand, &LARGE_RUNS[..], 4),
        Category::Yahtzee => {
            let (face, count) = largest_group(&counts);
            if count >= 2 {
                matching(hand, &[face], NUM_DICE)
            } else {
                HeldMask::NONE
            }
        }
        Category::Chance => HeldMask::ALL,
    }
}

/// Next action for the active player under the greedy policy; `None` once the game is over.
///
/// Hold changes are emitted one die at a time, so a caller loops until a roll or commit.
pub fn next_action(state: &GameState) -> Option<Action> {
    if is_game_over(state) {
        return None;
    }
    let turn = &state.turn;
    let card = &state.active_player().scorecard;
    let Some(hand) = turn.dice else {
        return Some(Action::Roll);
    };

    let target = choose_target(card, hand)?;
    if turn.rolls_remaining == 0 || score(target, &hand) == target.max_score() {
        return choose_commit(card, hand).map(|category| Action::Commit { category });
    }

    let want = suggest_holds(hand, target);
    if want == HeldMask::ALL {
        // Nothing left to reroll.
        return choose_commit(card, hand).map(|category| Action::Commit { category });
    }
    let diff = want.bits() ^ turn.held.bits();
    if diff != 0 {
        let pos = diff.trailing_zeros() as u8;
        return Some(Action::ToggleHold { pos });
    }
    Some(Action::Roll)
}
