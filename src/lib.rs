//! Memory Adventure - a timed memory game
//!
//! Core modules:
//! - `sim`: Deterministic round lifecycle (countdown, generation, picks, phases)
//! - `difficulty`: Difficulty levels and their symbol pools
//! - `rank`: Cosmetic rank/title tables and the shareable summary
//! - `highscores`: Best level reached, written through to storage
//! - `persistence`: The single persisted score slot
//! - `platform`: View snapshots and messages for the presentation layer
//! - `config`: Tunable timings and counts

pub mod config;
pub mod difficulty;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod rank;
pub mod sim;

pub use config::GameConfig;
pub use difficulty::Difficulty;
pub use error::{ConfigError, StorageError};
pub use highscores::BestScore;
pub use rank::{Rank, rank_for, share_text, summary_text};
pub use sim::{Game, GameEvent, GamePhase, Intent, Symbol};

/// Game configuration constants
pub mod consts {
    /// Full symbol alphabet; a difficulty plays with a prefix of it
    pub const EMOJIS: [&str; 8] = ["🍎", "🐱", "🌸", "⭐", "🐶", "🍋", "🍓", "⚡"];

    /// Cards shown at level 1
    pub const BASE_CARD_COUNT: usize = 3;

    /// Memorize phase length (seconds)
    pub const MEMORIZE_DURATION_SECONDS: f32 = 5.0;
    /// Selection phase length (seconds)
    pub const SELECTION_DURATION_SECONDS: f32 = 10.0;

    /// Wrong picks tolerated per round before it is lost
    pub const MAX_MISTAKES: u8 = 1;

    /// Pause between a won round and the next level (ms)
    pub const WIN_DELAY_MS: u32 = 1200;

    /// Countdown step (ms)
    pub const TICK_MS: u32 = 1000;

    /// Low-time warning thresholds (seconds)
    pub const MEMORIZE_WARNING_SECONDS: u32 = 2;
    pub const SELECTION_WARNING_SECONDS: u32 = 3;

    /// Storage slot for the best level reached
    pub const BEST_SCORE_KEY: &str = "memoryAdventureBest";
}
