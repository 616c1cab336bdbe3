//! Player picks against the remaining answers of a round

use serde::{Deserialize, Serialize};

use super::round::{Round, Symbol};

/// Display state of one choice button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMark {
    #[default]
    Untouched,
    /// Picked correctly at least once; may be picked again
    Hit,
    /// Picked while absent; locked for the rest of the round
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickOutcome {
    pub matched: bool,
    /// Answers still to be matched after this pick
    pub remaining: usize,
}

/// Remaining answers (a multiset), pick history and per-choice marks
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    remaining: Vec<Symbol>,
    history: Vec<Symbol>,
    marks: Vec<ChoiceMark>,
}

impl SelectionTracker {
    pub fn new(round: &Round, pool_size: usize) -> Self {
        Self {
            remaining: round.sequence().to_vec(),
            history: Vec::new(),
            marks: vec![ChoiceMark::Untouched; pool_size],
        }
    }

    /// Record a pick. A match consumes one occurrence; a miss leaves the
    /// remaining answers untouched. Both are appended to the history.
    pub fn record_pick(&mut self, symbol: Symbol) -> PickOutcome {
        self.history.push(symbol);

        let matched = match self.remaining.iter().position(|&s| s == symbol) {
            Some(i) => {
                self.remaining.swap_remove(i);
                true
            }
            None => false,
        };

        if let Some(mark) = self.marks.get_mut(symbol.index()) {
            *mark = if matched { ChoiceMark::Hit } else { ChoiceMark::Miss };
        }

        PickOutcome {
            matched,
            remaining: self.remaining.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn remaining(&self) -> &[Symbol] {
        &self.remaining
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn history(&self) -> &[Symbol] {
        &self.history
    }

    pub fn mark(&self, symbol: Symbol) -> ChoiceMark {
        self.marks.get(symbol.index()).copied().unwrap_or_default()
    }

    pub fn marks(&self) -> &[ChoiceMark] {
        &self.marks
    }

    pub fn is_locked(&self, symbol: Symbol) -> bool {
        self.mark(symbol) == ChoiceMark::Miss
    }
}
