//! Action space and index mapping.
//!
//! Action space size: A = 19
//! - idx 0      : Roll
//! - idx 1..=5  : ToggleHold(pos) where pos = idx - 1
//! - idx 6..=18 : Commit(cat) where cat index = idx - 6

use serde::{Deserialize, Serialize};

use crate::category::{Category, NUM_CATS};
use crate::dice::NUM_DICE;

pub const A: usize = 1 + NUM_DICE + NUM_CATS; // 19

const HOLD_BASE: u8 = 1;
const COMMIT_BASE: u8 = 1 + NUM_DICE as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Roll all non-held dice.
    Roll,
    /// Flip whether die `pos` (0..=4) is held.
    ToggleHold { pos: u8 },
    /// Score the current dice in a category and end the turn.
    Commit { category: Category },
}

/// Convert an `Action` to its index (0..A).
///
/// # Panics
/// Panics if a hold position is out of range.
pub fn action_to_index(a: Action) -> u8 {
    match a {
        Action::Roll => 0,
        Action::ToggleHold { pos } => {
            assert!((pos as usize) < NUM_DICE, "hold position out of range: {}", pos);
            HOLD_BASE + pos
        }
        Action::Commit { category } => COMMIT_BASE + category.index() as u8,
    }
}

/// Convert an index (0..A) to an `Action`; `None` if out of range.
pub fn index_to_action(idx: u8) -> Option<Action> {
    match idx {
        0 => Some(Action::Roll),
        i if i < COMMIT_BASE => Some(Action::ToggleHold { pos: i - HOLD_BASE }),
        i => Category::from_index((i - COMMIT_BASE) as usize)
            .map(|category| Action::Commit { category }),
    }
}
