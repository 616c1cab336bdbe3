//! Tunable game timings and counts
//!
//! Defaults mirror [`crate::consts`]. Any field may be omitted from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Round lifecycle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds the sequence stays visible
    pub memorize_seconds: f32,
    /// Seconds allowed to pick the sequence back
    pub select_seconds: f32,
    /// Sequence length at level 1
    pub base_card_count: usize,
    /// Wrong picks tolerated per round
    pub max_mistakes: u8,
    /// Pause after a won round before the next level begins (ms)
    pub win_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            memorize_seconds: MEMORIZE_DURATION_SECONDS,
            select_seconds: SELECTION_DURATION_SECONDS,
            base_card_count: BASE_CARD_COUNT,
            max_mistakes: MAX_MISTAKES,
            win_delay_ms: WIN_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_card_count == 0 {
            return Err(ConfigError::Invalid {
                field: "base_card_count",
                reason: "must be at least 1".to_string(),
            });
        }
        for (field, secs) in [
            ("memorize_seconds", self.memorize_seconds),
            ("select_seconds", self.select_seconds),
        ] {
            if !secs.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{secs} is not a finite number of seconds"),
                });
            }
        }
        Ok(())
    }

    /// Sequence length for a level (levels start at 1)
    pub fn card_count(&self, level: u32) -> usize {
        self.base_card_count + level.saturating_sub(1) as usize
    }
}
