//! One game in progress: state, dice source and its event log.
//!
//! Every state change made through a session is mirrored as one NDJSON event when an
//! event writer is attached.

use bz_core::{
    apply_action, check_action, commit_category, is_game_over, next_action, winners, Action,
    ApplyError, Category, Commit, GameState, HeldMask, Player, Rules, TurnContext, RULESET_ID,
};
use bz_logging::{
    now_ms, CommitEventV1, CommitRecordV1, GameOverEventV1, GameRecordV1, GameStartEventV1,
    HoldEventV1, IllegalActionEventV1, NdjsonError, NdjsonWriter, PlayerTotalV1, RollEventV1,
    VersionInfoV1,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Illegal(#[from] ApplyError),
    #[error("event log: {0}")]
    Log(#[from] NdjsonError),
}

/// Dice source for a game: seed plus stream kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceSpec {
    pub seed: u64,
    pub deterministic: bool,
}

impl ChanceSpec {
    pub fn mode_name(self) -> &'static str {
        if self.deterministic {
            "event_keyed"
        } else {
            "rng"
        }
    }

    fn context(self) -> TurnContext {
        if self.deterministic {
            TurnContext::new_deterministic(self.seed)
        } else {
            TurnContext::new_rng(self.seed)
        }
    }
}

/// What a successful action did, for the caller to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rolled { dice: [u8; 5], rolls_remaining: u8 },
    Held { held: HeldMask },
    Committed(Commit),
}

pub struct Session<'a> {
    pub state: GameState,
    ctx: TurnContext,
    chance: ChanceSpec,
    game_index: u64,
    log: Option<&'a mut NdjsonWriter>,
    commits: Vec<CommitRecordV1>,
}

fn held_flags(mask: HeldMask) -> [bool; 5] {
    let mut out = [false; 5];
    for (i, f) in out.iter_mut().enumerate() {
        *f = mask.contains(i);
    }
    out
}

fn action_label(action: Action) -> String {
    match action {
        Action::Roll => "roll".to_string(),
        Action::ToggleHold { pos } => format!("hold {pos}"),
        Action::Commit { category } => format!("score {category}"),
    }
}

pub fn totals(state: &GameState) -> Vec<PlayerTotalV1> {
    state
        .players
        .iter()
        .map(|p| {
            let b = p.scorecard.breakdown();
            PlayerTotalV1 {
                name: p.name.clone(),
                upper_total: b.upper_total,
                upper_bonus: b.upper_bonus,
                lower_total: b.lower_total,
                yahtzee_bonus: b.yahtzee_bonus,
                grand_total: b.grand_total,
            }
        })
        .collect()
}

impl<'a> Session<'a> {
    /// Start a game and log `game_start`.
    pub fn start(
        players: Vec<Player>,
        rules: Rules,
        chance: ChanceSpec,
        game_index: u64,
        log: Option<&'a mut NdjsonWriter>,
    ) -> Result<Self, SessionError> {
        let state = bz_core::new_game(players, rules);
        Self::resume(state, chance, game_index, log)
    }

    /// Start from an already seated (possibly rotated) fresh state.
    pub fn resume(
        state: GameState,
        chance: ChanceSpec,
        game_index: u64,
        log: Option<&'a mut NdjsonWriter>,
    ) -> Result<Self, SessionError> {
        let mut s = Self {
            state,
            ctx: chance.context(),
            chance,
            game_index,
            log,
            commits: Vec::new(),
        };
        let ev = GameStartEventV1 {
            event: "game_start",
            ts_ms: now_ms(),
            v: VersionInfoV1::new(RULESET_ID),
            game_index,
            seed: chance.seed,
            chance_mode: chance.mode_name(),
            players: s.state.players.iter().map(|p| p.name.clone()).collect(),
        };
        s.emit(&ev)?;
        Ok(s)
    }

    fn emit<T: serde::Serialize>(&mut self, ev: &T) -> Result<(), NdjsonError> {
        match self.log.as_deref_mut() {
            Some(w) => w.write_event(ev),
            None => Ok(()),
        }
    }

    pub fn is_over(&self) -> bool {
        is_game_over(&self.state)
    }

    /// Apply `action` for the active player.
    ///
    /// Illegal actions are logged and leave the state unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, SessionError> {
        let player = self.state.turn.active_player;
        if let Err(e) = check_action(&self.state, action) {
            let ev = IllegalActionEventV1 {
                event: "illegal_action",
                ts_ms: now_ms(),
                v: VersionInfoV1::new(RULESET_ID),
                game_index: self.game_index,
                player,
                action: action_label(action),
                reason: e.to_string(),
            };
            self.emit(&ev)?;
            return Err(e.into());
        }

        match action {
            Action::Commit { category } => self.commit(category),
            Action::Roll => {
                let round = self.state.players[player].scorecard.filled_count() as u8;
                let roll = self.state.turn.rolls_used();
                let held = self.state.turn.held;
                self.state = apply_action(&self.state, action, &mut self.ctx)?;
                let turn = self.state.turn;
                let dice = turn.dice.ok_or(ApplyError::NotRolled)?;
                let ev = RollEventV1 {
                    event: "roll",
                    ts_ms: now_ms(),
                    v: VersionInfoV1::new(RULESET_ID),
                    game_index: self.game_index,
                    player,
                    round,
                    roll,
                    held: held_flags(held),
                    dice,
                    rolls_remaining: turn.rolls_remaining,
                };
                self.emit(&ev)?;
                Ok(Outcome::Rolled {
                    dice,
                    rolls_remaining: turn.rolls_remaining,
                })
            }
            Action::ToggleHold { pos } => {
                self.state = apply_action(&self.state, action, &mut self.ctx)?;
                let held = self.state.turn.held;
                let ev = HoldEventV1 {
                    event: "hold",
                    ts_ms: now_ms(),
                    v: VersionInfoV1::new(RULESET_ID),
                    game_index: self.game_index,
                    player,
                    pos,
                    held: held_flags(held),
                };
                self.emit(&ev)?;
                Ok(Outcome::Held { held })
            }
        }
    }

    fn commit(&mut self, category: Category) -> Result<Outcome, SessionError> {
        let (next, c) = commit_category(&self.state, category)?;
        self.state = next;
        let grand_total = self.state.players[c.player].scorecard.grand_total();
        let ev = CommitEventV1 {
            event: "commit",
            ts_ms: now_ms(),
            v: VersionInfoV1::new(RULESET_ID),
            game_index: self.game_index,
            player: c.player,
            category: c.category.name().to_string(),
            dice: c.dice,
            points: c.points,
            yahtzee_bonus: c.yahtzee_bonus,
            grand_total,
        };
        self.emit(&ev)?;
        self.commits.push(CommitRecordV1 {
            player: c.player,
            category: c.category.name().to_string(),
            dice: c.dice,
            points: c.points,
            yahtzee_bonus: c.yahtzee_bonus,
        });
        Ok(Outcome::Committed(c))
    }

    /// Play the active player's turn with the advisor, up to and including its commit.
    ///
    /// `on_outcome` sees every roll and the final commit.
    pub fn play_advised_turn(
        &mut self,
        mut on_outcome: impl FnMut(&GameState, &Outcome),
    ) -> Result<Option<Commit>, SessionError> {
        while let Some(action) = next_action(&self.state) {
            let out = self.apply(action)?;
            if !matches!(out, Outcome::Held { .. }) {
                on_outcome(&self.state, &out);
            }
            if let Outcome::Committed(c) = out {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    /// Log `game_over` and return the finished game's record.
    pub fn finish(mut self) -> Result<GameRecordV1, SessionError> {
        let totals = totals(&self.state);
        let winners = winners(&self.state).unwrap_or_default();
        let ev = GameOverEventV1 {
            event: "game_over",
            ts_ms: now_ms(),
            v: VersionInfoV1::new(RULESET_ID),
            game_index: self.game_index,
            totals: totals.clone(),
            winners: winners.clone(),
        };
        self.emit(&ev)?;
        if let Some(w) = self.log.as_deref_mut() {
            w.flush()?;
        }
        Ok(GameRecordV1 {
            game_index: self.game_index,
            seed: self.chance.seed,
            commits: self.commits,
            totals,
            winners,
        })
    }
}
