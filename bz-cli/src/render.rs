//! Plain-text rendering of dice and scorecards.

use std::fmt::Write;

use bz_core::{Category, GameState, Hand, HeldMask};

/// `[3] 5 [1] 6 2`: held dice are bracketed.
pub fn dice_line(dice: Hand, held: HeldMask) -> String {
    dice.iter()
        .enumerate()
        .map(|(i, d)| {
            if held.contains(i) {
                format!("[{d}]")
            } else {
                d.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn scorecards(state: &GameState) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<16}", "");
    for (i, p) in state.players.iter().enumerate() {
        let marker = if i == state.turn.active_player { "*" } else { "" };
        let _ = write!(out, "{:>12}", format!("{marker}{}", p.name));
    }
    out.push('\n');

    let row = |out: &mut String, label: &str, cells: Vec<String>| {
        let _ = write!(out, "{label:<16}");
        for c in cells {
            let _ = write!(out, "{c:>12}");
        }
        out.push('\n');
    };

    for c in Category::UPPER {
        let cells = state
            .players
            .iter()
            .map(|p| cell(p.scorecard.get(c)))
            .collect();
        row(&mut out, c.label(), cells);
    }
    row(&mut out, "Upper total", totals(state, |b| b.upper_total));
    row(&mut out, "Upper bonus", totals(state, |b| b.upper_bonus));
    for c in Category::LOWER {
        let cells = state
            .players
            .iter()
            .map(|p| cell(p.scorecard.get(c)))
            .collect();
        row(&mut out, c.label(), cells);
    }
    row(&mut out, "Yahtzee bonus", totals(state, |b| b.yahtzee_bonus));
    row(&mut out, "Lower total", totals(state, |b| b.lower_total));
    row(&mut out, "Grand total", totals(state, |b| b.grand_total));
    out
}

fn cell(v: Option<u16>) -> String {
    match v {
        Some(x) => x.to_string(),
        None => "-".to_string(),
    }
}

fn totals(state: &GameState, f: impl Fn(&bz_core::ScoreBreakdown) -> u16) -> Vec<String> {
    state
        .players
        .iter()
        .map(|p| f(&p.scorecard.breakdown()).to_string())
        .collect()
}
