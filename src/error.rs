//! Error types shared across the crate.

use thiserror::Error;

/// Failures of the persisted score slot.
///
/// None of these are fatal: the score keeper logs them and play continues.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No storage backend is reachable (private browsing, no `window`, ...).
    #[error("storage unavailable")]
    Unavailable,

    /// Reading the slot failed.
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Writing the slot failed (quota, permissions).
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Failures while loading a [`GameConfig`](crate::GameConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
