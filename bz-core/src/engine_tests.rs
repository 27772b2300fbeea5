use crate::engine::{
    apply_action, commit_category, is_game_over, new_game, potential_scores, roll, standings,
    step, toggle_hold, winners, ApplyError, TurnContext,
};
use crate::legal::legal_actions;
use crate::{
    next_action, Action, Category, GameState, HeldMask, Player, PlayerKind, Rules, TurnState,
    YahtzeeBonusRule, ROLLS_PER_TURN,
};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

fn game(n: usize, rules: Rules) -> GameState {
    let players = (0..n)
        .map(|i| Player::new(format!("P{}", i + 1), PlayerKind::Human))
        .collect();
    new_game(players, rules)
}

fn three() -> GameState {
    game(3, Rules::default())
}

fn with_dice(mut s: GameState, dice: [u8; 5], rolls_remaining: u8) -> GameState {
    s.turn.dice = Some(dice);
    s.turn.rolls_remaining = rolls_remaining;
    s
}

fn assert_invariants(s: &GameState) {
    assert!(s.turn.active_player < s.players.len());
    assert!(s.turn.rolls_remaining <= ROLLS_PER_TURN);
    match s.turn.dice {
        None => {
            assert_eq!(s.turn.rolls_remaining, ROLLS_PER_TURN);
            assert_eq!(s.turn.held, HeldMask::NONE);
        }
        Some(d) => {
            assert!(s.turn.rolls_remaining < ROLLS_PER_TURN);
            for x in d {
                assert!((1..=6).contains(&x));
            }
        }
    }
    // Round-robin: no seat is ever more than one commit ahead of a later seat.
    let filled: Vec<usize> = s.players.iter().map(|p| p.scorecard.filled_count()).collect();
    let max = *filled.iter().max().unwrap();
    let min = *filled.iter().min().unwrap();
    assert!(max - min <= 1);
}

#[test]
fn roll_decrements_and_stops_at_zero() {
    let mut ctx = TurnContext::new_rng(1);
    let mut s = three();
    for expected in (0..ROLLS_PER_TURN).rev() {
        s = roll(&s, &mut ctx).unwrap();
        assert_eq!(s.turn.rolls_remaining, expected);
        assert!(s.turn.dice.is_some());
    }
    let before = s.clone();
    assert_eq!(roll(&s, &mut ctx).unwrap_err(), ApplyError::NoRollsRemaining);
    // `step` treats it as a no-op.
    let after = step(s, Action::Roll, &mut ctx);
    assert_eq!(after, before);
}

#[test]
fn holds_require_dice_and_persist_across_rerolls() {
    let mut ctx = TurnContext::new_rng(9);
    let s = three();
    assert_eq!(toggle_hold(&s, 0).unwrap_err(), ApplyError::NotRolled);

    let s = roll(&s, &mut ctx).unwrap();
    let first = s.turn.dice.unwrap();
    let s = toggle_hold(&s, 1).unwrap();
    let s = toggle_hold(&s, 3).unwrap();
    assert_eq!(s.turn.held, HeldMask::from_positions(&[1, 3]));

    let s = roll(&s, &mut ctx).unwrap();
    assert_eq!(s.turn.held, HeldMask::from_positions(&[1, 3]));
    let second = s.turn.dice.unwrap();
    assert_eq!(second[1], first[1]);
    assert_eq!(second[3], first[3]);

    // Toggling twice restores the mask; scores are unaffected.
    let before = potential_scores(&s);
    let s = toggle_hold(&toggle_hold(&s, 4).unwrap(), 4).unwrap();
    assert_eq!(s.turn.held, HeldMask::from_positions(&[1, 3]));
    assert_eq!(potential_scores(&s), before);

    assert_eq!(
        toggle_hold(&s, 5).unwrap_err(),
        ApplyError::InvalidPosition { pos: 5 }
    );
}

#[test]
fn commit_requires_a_roll() {
    let s = three();
    assert_eq!(
        commit_category(&s, Category::Chance).unwrap_err(),
        ApplyError::NotRolled
    );
}

#[test]
fn commit_scores_resets_turn_and_advances() {
    let s = with_dice(three(), [3, 3, 1, 2, 5], 1);
    let s = toggle_hold(&s, 0).unwrap();
    let (next, c) = commit_category(&s, Category::Threes).unwrap();

    assert_eq!(c.player, 0);
    assert_eq!(c.points, 6);
    assert!(!c.yahtzee_bonus);
    assert_eq!(next.players[0].scorecard.get(Category::Threes), Some(6));
    assert_eq!(next.turn, TurnState::fresh(1));
    assert_eq!(next.turn.rolls_remaining, 3);
    assert_eq!(next.turn.dice, None);
    assert_eq!(next.turn.held, HeldMask::NONE);
    // The input state is untouched.
    assert_eq!(s.players[0].scorecard.get(Category::Threes), None);
}

#[test]
fn committing_twice_is_rejected_and_keeps_first_score() {
    let mut ctx = TurnContext::new_rng(0);
    // Single seat so the same player commits again.
    let s = with_dice(game(1, Rules::default()), [6, 6, 6, 6, 6], 2);
    let (s, _) = commit_category(&s, Category::Sixes).unwrap();
    assert_eq!(s.players[0].scorecard.get(Category::Sixes), Some(30));

    let s = with_dice(s, [1, 1, 1, 1, 1], 2);
    assert_eq!(
        commit_category(&s, Category::Sixes).unwrap_err(),
        ApplyError::CategoryFilled {
            category: Category::Sixes
        }
    );
    let after = step(
        s.clone(),
        Action::Commit {
            category: Category::Sixes,
        },
        &mut ctx,
    );
    assert_eq!(after, s);
    assert_eq!(after.players[0].scorecard.get(Category::Sixes), Some(30));
}

#[test]
fn round_robin_wraps_over_full_cycle() {
    let mut ctx = TurnContext::new_rng(5);
    let mut s = three();
    let mut order = Vec::new();
    for i in 0..7 {
        order.push(s.turn.active_player);
        s = roll(&s, &mut ctx).unwrap();
        let cat = Category::ALL[i / 3];
        s = apply_action(&s, Action::Commit { category: cat }, &mut ctx).unwrap();
        assert_eq!(s.turn.active_player, (order[i] + 1) % 3);
    }
    assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn early_commit_is_legal_while_rolls_remain() {
    let mut ctx = TurnContext::new_rng(77);
    let s = roll(&three(), &mut ctx).unwrap();
    assert_eq!(s.turn.rolls_remaining, 2);
    let (s, _) = commit_category(&s, Category::Chance).unwrap();
    assert_eq!(s.turn.active_player, 1);
}

#[test]
fn potential_scores_cover_open_categories_only() {
    let s = three();
    assert!(potential_scores(&s).is_empty());

    let mut s = with_dice(s, [2, 2, 3, 3, 3], 2);
    s.players[0].scorecard.record(Category::Twos, 4).unwrap();
    let pot = potential_scores(&s);
    assert_eq!(pot.len(), 12);
    assert!(pot.iter().all(|(c, _)| *c != Category::Twos));
    assert!(pot.contains(&(Category::FullHouse, 25)));
    assert!(pot.contains(&(Category::Threes, 9)));
    assert!(pot.contains(&(Category::Chance, 13)));
}

#[test]
fn yahtzee_bonus_placeholder_stays_zero() {
    let s = with_dice(game(1, Rules::default()), [5, 5, 5, 5, 5], 2);
    let (s, _) = commit_category(&s, Category::Yahtzee).unwrap();
    let s = with_dice(s, [4, 4, 4, 4, 4], 2);
    let (s, c) = commit_category(&s, Category::Fours).unwrap();
    assert!(!c.yahtzee_bonus);
    assert_eq!(s.players[0].scorecard.yahtzee_bonus(), 0);
    assert_eq!(s.players[0].scorecard.grand_total(), 70);
}

#[test]
fn yahtzee_bonus_standard_needs_scored_fifty() {
    let rules = Rules {
        yahtzee_bonus: YahtzeeBonusRule::Standard,
    };

    // Box holds 50: an extra Yahtzee earns 100.
    let s = with_dice(game(1, rules), [5, 5, 5, 5, 5], 2);
    let (s, first) = commit_category(&s, Category::Yahtzee).unwrap();
    assert!(!first.yahtzee_bonus);
    let s = with_dice(s, [4, 4, 4, 4, 4], 0);
    let (s, c) = commit_category(&s, Category::Fours).unwrap();
    assert!(c.yahtzee_bonus);
    assert_eq!(c.points, 20);
    assert_eq!(s.players[0].scorecard.yahtzee_bonus_count(), 1);
    assert_eq!(s.players[0].scorecard.grand_total(), 50 + 20 + 100);

    // Box scratched with 0: no bonus.
    let s = with_dice(game(1, rules), [1, 2, 3, 4, 6], 2);
    let (s, _) = commit_category(&s, Category::Yahtzee).unwrap();
    let s = with_dice(s, [6, 6, 6, 6, 6], 2);
    let (s, c) = commit_category(&s, Category::Sixes).unwrap();
    assert!(!c.yahtzee_bonus);
    assert_eq!(s.players[0].scorecard.yahtzee_bonus(), 0);
}

fn random_playout(mut ctx: TurnContext, seats: usize, chooser_seed: u64) -> GameState {
    let mut s = game(seats, Rules::default());
    let mut chooser = ChaCha8Rng::seed_from_u64(chooser_seed);
    let mut commits = 0usize;

    for _step in 0..100_000 {
        assert_invariants(&s);
        if is_game_over(&s) {
            break;
        }
        let legal = legal_actions(&s);
        assert!(!legal.is_empty());
        let a = legal[chooser.gen_range(0..legal.len())];
        if matches!(a, Action::Commit { .. }) {
            commits += 1;
        }
        s = apply_action(&s, a, &mut ctx).unwrap();
    }

    assert!(is_game_over(&s), "playout did not terminate");
    assert_eq!(commits, 13 * seats);
    s
}

#[test]
fn random_playout_terminates_rng_mode() {
    let s = random_playout(TurnContext::new_rng(1234), 3, 7);
    for p in &s.players {
        assert!(p.scorecard.is_complete());
    }
    assert_eq!(roll(&s, &mut TurnContext::new_rng(0)).unwrap_err(), ApplyError::GameOver);
}

#[test]
fn random_playout_terminates_deterministic_mode() {
    random_playout(TurnContext::new_deterministic(99), 2, 3);
}

#[test]
fn deterministic_reproducibility_same_seed_same_actions() {
    let a = random_playout(TurnContext::new_deterministic(555), 3, 11);
    let b = random_playout(TurnContext::new_deterministic(555), 3, 11);
    assert_eq!(a, b);

    let c = random_playout(TurnContext::new_rng(555), 3, 11);
    let d = random_playout(TurnContext::new_rng(555), 3, 11);
    assert_eq!(c, d);
}

#[test]
fn advisor_plays_full_game() {
    let mut ctx = TurnContext::new_rng(2025);
    let mut s = three();
    let mut guard = 0;
    while let Some(a) = next_action(&s) {
        s = apply_action(&s, a, &mut ctx).expect("advisor proposes legal actions");
        assert_invariants(&s);
        guard += 1;
        assert!(guard < 10_000);
    }
    assert!(is_game_over(&s));
    let w = winners(&s).unwrap();
    assert!(!w.is_empty());
    let top = standings(&s)[0].1.grand_total;
    for i in w {
        assert_eq!(s.players[i].scorecard.grand_total(), top);
    }
}

#[test]
fn standings_and_winners() {
    let mut s = three();
    assert_eq!(winners(&s), None);
    for (i, p) in s.players.iter_mut().enumerate() {
        for c in Category::ALL {
            let pts = if c == Category::Chance { [20, 25, 25][i] } else { 0 };
            p.scorecard.record(c, pts).unwrap();
        }
    }
    let ranked: Vec<usize> = standings(&s).into_iter().map(|(i, _)| i).collect();
    assert_eq!(ranked, vec![1, 2, 0]);
    assert_eq!(winners(&s), Some(vec![1, 2]));
}
