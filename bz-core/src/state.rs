//! Game state values: players, rule set and the current turn.
//!
//! States are plain values. The engine never mutates a state in place; every transition
//! returns a new `GameState`.

use serde::{Deserialize, Serialize};

use crate::dice::{Hand, HeldMask};
use crate::scorecard::Scorecard;

/// Rolls available at the start of every turn.
pub const ROLLS_PER_TURN: u8 = 3;

/// How extra Yahtzees are rewarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YahtzeeBonusRule {
    /// Bonus row is shown but always 0.
    #[default]
    Placeholder,
    /// +100 for each Yahtzee rolled after the yahtzee box holds 50. No joker placement.
    Standard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default)]
    pub yahtzee_bonus: YahtzeeBonusRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    /// Placeholder bot seat ("Botzee"); driven by the advisor outside the core.
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub kind: PlayerKind,
    pub scorecard: Scorecard,
}

impl Player {
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scorecard: Scorecard::new(),
        }
    }
}

/// Where the active player is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingFirstRoll,
    /// At least one roll made, rerolls still available; a commit is also legal here.
    Rolling,
    /// No rolls left; only a commit moves the game on.
    AwaitingCategoryChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub active_player: usize,
    pub rolls_remaining: u8,
    /// `None` until the first roll of the turn.
    pub dice: Option<Hand>,
    pub held: HeldMask,
}

impl TurnState {
    /// Start-of-turn state for `player`.
    pub fn fresh(player: usize) -> Self {
        Self {
            active_player: player,
            rolls_remaining: ROLLS_PER_TURN,
            dice: None,
            held: HeldMask::NONE,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        match (self.dice, self.rolls_remaining) {
            (None, _) => TurnPhase::AwaitingFirstRoll,
            (Some(_), 0) => TurnPhase::AwaitingCategoryChoice,
            (Some(_), _) => TurnPhase::Rolling,
        }
    }

    pub fn has_rolled(&self) -> bool {
        self.dice.is_some()
    }

    /// Rolls made so far this turn (0..=3).
    pub fn rolls_used(&self) -> u8 {
        ROLLS_PER_TURN.saturating_sub(self.rolls_remaining)
    }
}

/// Whole-game state. `new_game` seats at least one player; the seat helpers
/// below also tolerate an empty `players` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub turn: TurnState,
    pub rules: Rules,
}

impl GameState {
    pub fn active_player(&self) -> &Player {
        &self.players[self.turn.active_player]
    }

    /// Index of the player after `idx`, wrapping after the last.
    pub fn next_player(&self, idx: usize) -> usize {
        (idx + 1) % self.players.len().max(1)
    }

    /// Rotate seats so that `first` moves first; turn state is reset.
    ///
    /// Used to give each seat the opening turn across a series of games.
    pub fn rotate_seats(&self, first: usize) -> GameState {
        let n = self.players.len();
        let mut players = self.players.clone();
        players.rotate_left(first % n.max(1));
        GameState {
            players,
            turn: TurnState::fresh(0),
            rules: self.rules,
        }
    }
}
