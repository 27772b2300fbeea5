//! Scoring categories: fixed order, stable indices and names.
//!
//! Index order is the scorecard order: the six upper categories (0..=5) followed by
//! the seven lower categories (6..=12). Bonus and display code rely on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NUM_CATS: usize = 13;
pub const NUM_UPPER: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

/// Names in index order (snake_case, as used by config, CLI and event logs).
pub const CAT_NAMES: [&str; NUM_CATS] = [
    "ones",
    "twos",
    "threes",
    "fours",
    "fives",
    "sixes",
    "three_of_a_kind",
    "four_of_a_kind",
    "full_house",
    "small_straight",
    "large_straight",
    "yahtzee",
    "chance",
];

impl Category {
    pub const ALL: [Category; NUM_CATS] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    pub const UPPER: [Category; NUM_UPPER] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    pub const LOWER: [Category; NUM_CATS - NUM_UPPER] = [
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Position in scorecard order (0..13).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Category> {
        Self::ALL.get(idx).copied()
    }

    pub fn is_upper(self) -> bool {
        self.index() < NUM_UPPER
    }

    /// Face value counted by an upper category (`Ones` -> 1 ... `Sixes` -> 6).
    pub fn face(self) -> Option<u8> {
        if self.is_upper() {
            Some(self.index() as u8 + 1)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        CAT_NAMES[self.index()]
    }

    /// Scorecard row label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Ones => "Ones",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::ThreeOfAKind => "3 of a Kind",
            Category::FourOfAKind => "4 of a Kind",
            Category::FullHouse => "Full House",
            Category::SmallStraight => "Sm. Straight",
            Category::LargeStraight => "Lg. Straight",
            Category::Yahtzee => "YAHTZEE",
            Category::Chance => "Chance",
        }
    }

    /// Best score any hand can reach in this category.
    pub fn max_score(self) -> u16 {
        match self {
            Category::Ones
            | Category::Twos
            | Category::Threes
            | Category::Fours
            | Category::Fives
            | Category::Sixes => self.index() as u16 * 5 + 5,
            Category::ThreeOfAKind | Category::FourOfAKind | Category::Chance => 30,
            Category::FullHouse => crate::scoring::FULL_HOUSE_SCORE,
            Category::SmallStraight => crate::scoring::SMALL_STRAIGHT_SCORE,
            Category::LargeStraight => crate::scoring::LARGE_STRAIGHT_SCORE,
            Category::Yahtzee => crate::scoring::YAHTZEE_SCORE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts snake_case names plus a few short aliases (`3k`, `4k`, `fh`, `ss`, `ls`, `yz`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let alias = match norm.as_str() {
            "3k" | "three_kind" => Some(Category::ThreeOfAKind),
            "4k" | "four_kind" => Some(Category::FourOfAKind),
            "fh" | "house" => Some(Category::FullHouse),
            "ss" => Some(Category::SmallStraight),
            "ls" => Some(Category::LargeStraight),
            "yz" => Some(Category::Yahtzee),
            _ => None,
        };
        if let Some(c) = alias {
            return Ok(c);
        }
        CAT_NAMES
            .iter()
            .position(|&n| n == norm)
            .and_then(Category::from_index)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
