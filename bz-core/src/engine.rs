//! Rules engine: state transitions for a game of Botzee.
//!
//! This module is the single place that produces successor `GameState`s. Transitions
//! take the current state by reference and return a new one; an illegal action returns
//! an `ApplyError` and the caller's state is untouched. `step` is the no-op-on-illegal
//! wrapper a UI drives.

use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use thiserror::Error;

use crate::action::Action;
use crate::category::Category;
use crate::dice::{self, EventKey, Hand, HeldMask};
use crate::legal::check_action;
use crate::scorecard::ScoreBreakdown;
use crate::scoring::{is_yahtzee, score, YAHTZEE_SCORE};
use crate::state::{GameState, Player, Rules, TurnState, YahtzeeBonusRule};

/// How dice are generated for rolls.
pub enum ChanceMode {
    /// Event-keyed dice stream; same seed + same decisions => same dice.
    EventKeyed { game_seed: u64 },
    /// Pseudorandom dice stream.
    Rng { rng: Box<ChaCha8Rng> },
}

/// Mutable transition context: the dice source.
pub struct TurnContext {
    pub chance: ChanceMode,
}

impl TurnContext {
    pub fn new_deterministic(game_seed: u64) -> Self {
        Self {
            chance: ChanceMode::EventKeyed { game_seed },
        }
    }

    pub fn new_rng(seed: u64) -> Self {
        Self {
            chance: ChanceMode::Rng {
                rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
            },
        }
    }

    fn roll(&mut self, state: &GameState) -> Hand {
        let turn = &state.turn;
        match &mut self.chance {
            ChanceMode::EventKeyed { game_seed } => {
                let key = EventKey {
                    game_seed: *game_seed,
                    player: turn.active_player as u8,
                    round: state.active_player().scorecard.filled_count() as u8,
                    roll: turn.rolls_used(),
                };
                dice::roll_keyed(turn.dice, turn.held, key)
            }
            ChanceMode::Rng { rng } => dice::roll(turn.dice, turn.held, &mut **rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("no rolls remaining this turn")]
    NoRollsRemaining,
    #[error("dice have not been rolled this turn")]
    NotRolled,
    #[error("die position {pos} out of range (0..=4)")]
    InvalidPosition { pos: u8 },
    #[error("category {category} already scored")]
    CategoryFilled { category: Category },
    #[error("game is over")]
    GameOver,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub player: usize,
    pub category: Category,
    pub dice: Hand,
    pub points: u16,
    /// True if this commit earned a Yahtzee bonus.
    pub yahtzee_bonus: bool,
}

/// Fresh game: empty scorecards, player 0 awaiting the first roll.
///
/// # Panics
/// Panics if `players` is empty.
pub fn new_game(players: Vec<Player>, rules: Rules) -> GameState {
    assert!(!players.is_empty(), "a game needs at least one player");
    GameState {
        players,
        turn: TurnState::fresh(0),
        rules,
    }
}

/// Terminal when every player has filled all 13 categories.
pub fn is_game_over(state: &GameState) -> bool {
    state.players.iter().all(|p| p.scorecard.is_complete())
}

/// Roll the non-held dice of the active player.
pub fn roll(state: &GameState, ctx: &mut TurnContext) -> Result<GameState, ApplyError> {
    check_action(state, Action::Roll)?;
    let mut next = state.clone();
    next.turn.dice = Some(ctx.roll(state));
    next.turn.rolls_remaining -= 1;
    Ok(next)
}

/// Flip whether the die at `pos` is held.
pub fn toggle_hold(state: &GameState, pos: u8) -> Result<GameState, ApplyError> {
    check_action(state, Action::ToggleHold { pos })?;
    let mut next = state.clone();
    next.turn.held = state.turn.held.toggled(pos as usize);
    Ok(next)
}

/// Score the current dice in `category` for the active player and pass the turn on.
pub fn commit_category(
    state: &GameState,
    category: Category,
) -> Result<(GameState, Commit), ApplyError> {
    check_action(state, Action::Commit { category })?;
    let Some(hand) = state.turn.dice else {
        return Err(ApplyError::NotRolled);
    };

    let p = state.turn.active_player;
    let mut next = state.clone();
    let card = &mut next.players[p].scorecard;

    let earns_bonus = state.rules.yahtzee_bonus == YahtzeeBonusRule::Standard
        && is_yahtzee(&hand)
        && card.get(Category::Yahtzee) == Some(YAHTZEE_SCORE);

    let points = score(category, &hand);
    card.record(category, points)
        .map_err(|_| ApplyError::CategoryFilled { category })?;
    if earns_bonus {
        card.add_yahtzee_bonus();
    }

    next.turn = TurnState::fresh(state.next_player(p));

    Ok((
        next,
        Commit {
            player: p,
            category,
            dice: hand,
            points,
            yahtzee_bonus: earns_bonus,
        },
    ))
}

/// Apply an action, producing the next state (or an error if illegal).
pub fn apply_action(
    state: &GameState,
    action: Action,
    ctx: &mut TurnContext,
) -> Result<GameState, ApplyError> {
    match action {
        Action::Roll => roll(state, ctx),
        Action::ToggleHold { pos } => toggle_hold(state, pos),
        Action::Commit { category } => commit_category(state, category).map(|(s, _)| s),
    }
}

/// Apply an action; illegal actions are no-ops and return the state unchanged.
pub fn step(state: GameState, action: Action, ctx: &mut TurnContext) -> GameState {
    match apply_action(&state, action, ctx) {
        Ok(next) => next,
        Err(_) => state,
    }
}

/// Scores the current dice would earn in each open category of the active player.
///
/// Empty before the first roll of a turn.
pub fn potential_scores(state: &GameState) -> Vec<(Category, u16)> {
    let Some(hand) = state.turn.dice else {
        return Vec::new();
    };
    state
        .active_player()
        .scorecard
        .open_categories()
        .map(|c| (c, score(c, &hand)))
        .collect()
}

/// Current dice and held mask, if the active player has rolled this turn.
pub fn current_dice(state: &GameState) -> Option<(Hand, HeldMask)> {
    state.turn.dice.map(|d| (d, state.turn.held))
}

/// Players ranked by grand total (highest first); ties keep seat order.
pub fn standings(state: &GameState) -> Vec<(usize, ScoreBreakdown)> {
    let mut out: Vec<(usize, ScoreBreakdown)> = state
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.scorecard.breakdown()))
        .collect();
    out.sort_by(|a, b| b.1.grand_total.cmp(&a.1.grand_total).then(a.0.cmp(&b.0)));
    out
}

/// Seats sharing the top grand total, once the game is over.
pub fn winners(state: &GameState) -> Option<Vec<usize>> {
    if !is_game_over(state) {
        return None;
    }
    let ranked = standings(state);
    let top = ranked.first().map(|(_, b)| b.grand_total)?;
    Some(
        ranked
            .into_iter()
            .filter(|(_, b)| b.grand_total == top)
            .map(|(i, _)| i)
            .collect(),
    )
}
