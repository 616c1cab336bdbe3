//! Session state and core phase types
//!
//! Everything the round lifecycle mutates lives in [`GameState`], owned by
//! the [`Game`](super::Game) controller.

use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, CountdownKind};
use super::round::{Round, Symbol};
use super::selection::SelectionTracker;
use crate::difficulty::Difficulty;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    #[default]
    Idle,
    /// Sequence visible, memorize countdown running
    Memorizing,
    /// Sequence hidden, picks accepted, selection countdown running
    Selecting,
    /// All answers matched; next level after a short pause
    RoundWon,
    /// Out of mistakes or out of time
    RoundLost,
    /// Ended by the player
    SessionEnded,
}

impl GamePhase {
    /// Phases an explicit end can interrupt
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            GamePhase::Memorizing | GamePhase::Selecting | GamePhase::RoundWon
        )
    }

    /// Phases that wait for a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::RoundLost | GamePhase::SessionEnded)
    }

    /// Whether the sequence is shown to the player
    pub fn reveals_sequence(&self) -> bool {
        matches!(
            self,
            GamePhase::Memorizing | GamePhase::RoundLost | GamePhase::SessionEnded
        )
    }
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Out of mistakes; `symbol` was the final wrong pick
    WrongSymbol { symbol: Symbol },
    TimeExpired,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::WrongSymbol { .. } => "wrong symbol",
            FailureReason::TimeExpired => "time expired",
        }
    }
}

/// Notifications for the presentation layer, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Session returned to Idle (restart or difficulty change)
    Reset,
    BestScoreRaised { best: u32 },
    /// A level entered Memorizing with a fresh sequence
    LevelStarted { level: u32, card_count: usize },
    /// Memorize time is up; picks are open for `seconds`
    SelectionOpened { seconds: u32 },
    CountdownTick { kind: CountdownKind, remaining: u32 },
    Picked {
        symbol: Symbol,
        matched: bool,
        remaining: usize,
        mistakes_left: u8,
    },
    RoundWon { level: u32 },
    RoundLost { reason: FailureReason },
    SessionEnded { level: u32, summary: String },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Level being played (1-based)
    pub level: u32,
    /// Current round; `None` while idle
    pub round: Option<Round>,
    pub selection: SelectionTracker,
    /// Wrong picks still tolerated this round
    pub mistakes_left: u8,
    pub countdown: Countdown,
    /// Time left before the next level starts (RoundWon only)
    pub win_delay_ms: Option<u32>,
    pub failure: Option<FailureReason>,
    /// Rank summary of an ended session
    pub summary: Option<String>,
    /// Pending events, drained by the presentation layer
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            phase: GamePhase::Idle,
            level: 1,
            round: None,
            selection: SelectionTracker::default(),
            mistakes_left: 0,
            countdown: Countdown::new(),
            win_delay_ms: None,
            failure: None,
            summary: None,
            events: Vec::new(),
        }
    }

    /// Sequence if the current phase shows it
    pub fn visible_sequence(&self) -> Option<&[Symbol]> {
        if self.phase.reveals_sequence() {
            self.round.as_ref().map(|r| r.sequence())
        } else {
            None
        }
    }

    pub fn accepts_picks(&self) -> bool {
        self.phase == GamePhase::Selecting
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
