//! Legality of actions in a given state.
//!
//! Rules:
//! - Roll: rolls remaining > 0 and the game is not over
//! - ToggleHold(pos): dice exist this turn and pos is 0..=4
//! - Commit(cat): dice exist this turn and the active player's `cat` is still open

use crate::action::{index_to_action, Action, A};
use crate::dice::NUM_DICE;
use crate::engine::{is_game_over, ApplyError};
use crate::state::GameState;

/// Bitset over the fixed action space; bit `i` is action index `i`.
pub type LegalMask = u32;

#[inline]
pub fn is_legal(mask: LegalMask, idx: usize) -> bool {
    debug_assert!(idx < A);
    ((mask >> idx) & 1) != 0
}

/// Why `action` is illegal in `state`, or `Ok(())` if it may be applied.
pub fn check_action(state: &GameState, action: Action) -> Result<(), ApplyError> {
    let turn = &state.turn;
    match action {
        Action::Roll => {
            if is_game_over(state) {
                return Err(ApplyError::GameOver);
            }
            if turn.rolls_remaining == 0 {
                return Err(ApplyError::NoRollsRemaining);
            }
            Ok(())
        }
        Action::ToggleHold { pos } => {
            if !turn.has_rolled() {
                return Err(ApplyError::NotRolled);
            }
            if (pos as usize) >= NUM_DICE {
                return Err(ApplyError::InvalidPosition { pos });
            }
            Ok(())
        }
        Action::Commit { category } => {
            if !turn.has_rolled() {
                return Err(ApplyError::NotRolled);
            }
            if !state.active_player().scorecard.is_open(category) {
                return Err(ApplyError::CategoryFilled { category });
            }
            Ok(())
        }
    }
}

/// Legal actions for the active player as a bitset.
pub fn legal_action_mask(state: &GameState) -> LegalMask {
    let mut legal: LegalMask = 0;
    for idx in 0..A as u8 {
        let Some(a) = index_to_action(idx) else {
            continue;
        };
        if check_action(state, a).is_ok() {
            legal |= 1 << idx;
        }
    }
    legal
}

/// Legal actions as a list, in index order.
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    let mask = legal_action_mask(state);
    (0..A as u8)
        .filter(|&i| is_legal(mask, i as usize))
        .filter_map(index_to_action)
        .collect()
}
