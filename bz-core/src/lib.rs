//! bz-core: Botzee game rules, scoring, scorecards, state machine and configuration.

pub mod action;
pub mod advisor;
pub mod category;
pub mod config;
pub mod dice;
pub mod engine;
pub mod legal;
pub mod scorecard;
pub mod scoring;
pub mod state;

pub use action::{action_to_index, index_to_action, Action, A};
pub use advisor::{
    choose_commit, choose_target, next_action, rank_categories, suggest_holds, RankedCategory,
};
pub use category::{Category, ParseCategoryError, CAT_NAMES, NUM_CATS, NUM_UPPER};
pub use config::{Config, ConfigError, MAX_PLAYERS};
pub use dice::{roll5, roll_keyed, EventKey, Hand, HeldMask, NUM_DICE};
pub use engine::{
    apply_action, commit_category, current_dice, is_game_over, new_game, potential_scores,
    roll, standings, step, toggle_hold, winners, ApplyError, ChanceMode, Commit, TurnContext,
};
pub use legal::{check_action, is_legal, legal_action_mask, legal_actions, LegalMask};
pub use scorecard::{
    upper_bonus_for, ScoreBreakdown, Scorecard, ScorecardError, UpperProgress, UPPER_BONUS,
    UPPER_BONUS_THRESHOLD, YAHTZEE_BONUS,
};
pub use scoring::{face_counts, is_yahtzee, score, scores_for_dice};
pub use state::{
    GameState, Player, PlayerKind, Rules, TurnPhase, TurnState, YahtzeeBonusRule,
    ROLLS_PER_TURN,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ruleset identifier stamped into event logs and manifests.
pub const RULESET_ID: &str = "yahtzee_13cat_v1";

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod state_tests;
