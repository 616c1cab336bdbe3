//! Read-only snapshot handed to the presentation layer

use serde::Serialize;

use crate::persistence::ScoreStore;
use crate::sim::{ChoiceMark, CountdownKind, Game, GamePhase};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub remaining: u32,
    pub kind: CountdownKind,
    pub warning: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
    pub glyph: &'static str,
    pub mark: ChoiceMark,
    pub enabled: bool,
}

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub phase: GamePhase,
    pub difficulty: &'static str,
    pub level: u32,
    pub best_score: u32,
    pub countdown: CountdownView,
    /// Cards in the current round (drawn face down when `sequence` is None)
    pub card_count: usize,
    /// Only while memorizing, or revealed after a loss or an ended session
    pub sequence: Option<Vec<&'static str>>,
    pub remaining_answers: usize,
    pub history: Vec<&'static str>,
    pub choices: Vec<ChoiceView>,
    pub mistakes_left: u8,
    pub failure: Option<&'static str>,
    pub summary: Option<String>,
}

impl View {
    pub fn capture<S: ScoreStore>(game: &Game<S>) -> Self {
        let state = game.state();
        let selection = &state.selection;
        let picks_open = state.accepts_picks();

        let choices = state
            .difficulty
            .pool()
            .map(|symbol| {
                let mark = selection.mark(symbol);
                ChoiceView {
                    glyph: symbol.glyph(),
                    mark,
                    enabled: picks_open && mark != ChoiceMark::Miss,
                }
            })
            .collect();

        Self {
            phase: state.phase,
            difficulty: state.difficulty.as_str(),
            level: state.level,
            best_score: game.best_score(),
            countdown: CountdownView {
                remaining: state.countdown.remaining(),
                kind: state.countdown.kind(),
                warning: state.countdown.is_warning(),
                active: state.countdown.is_active(),
            },
            card_count: state.round.as_ref().map_or(0, |r| r.len()),
            sequence: state
                .visible_sequence()
                .map(|seq| seq.iter().map(|s| s.glyph()).collect()),
            remaining_answers: selection.remaining_count(),
            history: selection.history().iter().map(|s| s.glyph()).collect(),
            choices,
            mistakes_left: state.mistakes_left,
            failure: state.failure.map(|f| f.as_str()),
            summary: state.summary.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restart button is offered only once the session is over
    pub fn can_restart(&self) -> bool {
        self.phase.is_terminal()
    }
}
