//! Per-player scorecard: write-once category entries plus derived totals.
//!
//! Totals are recomputed on every call; nothing derived is stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::{Category, NUM_CATS};

/// Upper subtotal needed for the upper bonus.
pub const UPPER_BONUS_THRESHOLD: u16 = 63;
pub const UPPER_BONUS: u16 = 35;
/// Value of each extra Yahtzee under the standard bonus rule.
pub const YAHTZEE_BONUS: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScorecardError {
    #[error("category {0} is already scored")]
    AlreadyScored(Category),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    entries: [Option<u16>; NUM_CATS],
    yahtzee_bonus_count: u8,
}

/// All totals of a scorecard at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub upper_total: u16,
    pub upper_bonus: u16,
    pub lower_total: u16,
    pub yahtzee_bonus: u16,
    pub grand_total: u16,
}

/// Progress towards the upper bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpperProgress {
    pub total: u16,
    pub needed_for_bonus: u16,
    pub open_upper: usize,
    /// False once the missing points exceed what the open upper rows can still give.
    pub bonus_reachable: bool,
}

/// 35 iff `upper_total` reaches 63.
pub fn upper_bonus_for(upper_total: u16) -> u16 {
    if upper_total >= UPPER_BONUS_THRESHOLD {
        UPPER_BONUS
    } else {
        0
    }
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cat: Category) -> Option<u16> {
        self.entries[cat.index()]
    }

    pub fn is_open(&self, cat: Category) -> bool {
        self.entries[cat.index()].is_none()
    }

    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| self.is_open(c))
    }

    pub fn filled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    /// Write `score` into `cat`. Entries are write-once.
    pub fn record(&mut self, cat: Category, score: u16) -> Result<(), ScorecardError> {
        let slot = &mut self.entries[cat.index()];
        if slot.is_some() {
            return Err(ScorecardError::AlreadyScored(cat));
        }
        *slot = Some(score);
        Ok(())
    }

    pub fn yahtzee_bonus_count(&self) -> u8 {
        self.yahtzee_bonus_count
    }

    pub fn add_yahtzee_bonus(&mut self) {
        self.yahtzee_bonus_count = self.yahtzee_bonus_count.saturating_add(1);
    }

    pub fn upper_total(&self) -> u16 {
        Category::UPPER
            .iter()
            .map(|&c| self.get(c).unwrap_or(0))
            .sum()
    }

    pub fn upper_bonus(&self) -> u16 {
        upper_bonus_for(self.upper_total())
    }

    pub fn lower_total(&self) -> u16 {
        Category::LOWER
            .iter()
            .map(|&c| self.get(c).unwrap_or(0))
            .sum()
    }

    pub fn yahtzee_bonus(&self) -> u16 {
        self.yahtzee_bonus_count as u16 * YAHTZEE_BONUS
    }

    pub fn grand_total(&self) -> u16 {
        self.upper_total() + self.upper_bonus() + self.lower_total() + self.yahtzee_bonus()
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            upper_total: self.upper_total(),
            upper_bonus: self.upper_bonus(),
            lower_total: self.lower_total(),
            yahtzee_bonus: self.yahtzee_bonus(),
            grand_total: self.grand_total(),
        }
    }

    pub fn upper_progress(&self) -> UpperProgress {
        let total = self.upper_total();
        let needed = UPPER_BONUS_THRESHOLD.saturating_sub(total);
        let open: Vec<Category> = Category::UPPER
            .into_iter()
            .filter(|&c| self.is_open(c))
            .collect();
        let reachable_max: u16 = open.iter().map(|c| c.max_score()).sum();
        UpperProgress {
            total,
            needed_for_bonus: needed,
            open_upper: open.len(),
            bonus_reachable: needed <= reachable_max,
        }
    }
}
