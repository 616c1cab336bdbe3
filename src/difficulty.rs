//! Difficulty levels
//!
//! A difficulty decides how many distinct symbols are in play.

use serde::{Deserialize, Serialize};

use crate::consts::EMOJIS;
use crate::sim::Symbol;

/// Difficulty selected before (or between) games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Value used by the difficulty selector
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Selector value, falling back to easy for anything unknown
    pub fn from_str_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Number of distinct symbols in play
    pub fn pool_size(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }

    /// The active symbol pool, in display order
    pub fn pool(self) -> impl Iterator<Item = Symbol> {
        (0..self.pool_size().min(EMOJIS.len())).map(|i| Symbol::new(i as u8))
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol.index() < self.pool_size()
    }
}
