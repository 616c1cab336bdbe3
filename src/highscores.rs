//! Best level reached
//!
//! Read once at startup, written through to the store on every increase.

use crate::persistence::ScoreStore;

/// Parse a stored best score. Any finite non-negative number counts, floored
/// to a whole level; everything else is no score.
pub fn parse_stored(raw: Option<&str>) -> u32 {
    raw.and_then(parse_level).unwrap_or(0)
}

fn parse_level(raw: &str) -> Option<u32> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then(|| value.floor() as u32)
}

/// Best level ever reached, backed by a store
#[derive(Debug)]
pub struct BestScore<S: ScoreStore> {
    best: u32,
    store: S,
}

impl<S: ScoreStore> BestScore<S> {
    /// Load the best score from the store (0 on absence or garbage)
    pub fn load(store: S) -> Self {
        let raw = match store.read() {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read best score: {e}");
                None
            }
        };
        let best = match raw.as_deref() {
            Some(raw) => parse_level(raw).unwrap_or_else(|| {
                log::debug!("Ignoring unparseable stored best score {raw:?}");
                0
            }),
            None => 0,
        };
        log::info!("Best score loaded: {best}");
        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record that `level` was reached. Returns true if it is a new best.
    ///
    /// A failed write keeps the in-memory best; the next increase retries.
    pub fn record_level(&mut self, level: u32) -> bool {
        if level <= self.best {
            return false;
        }
        self.best = level;
        if let Err(e) = self.store.write(&level.to_string()) {
            log::warn!("Best score {level} not persisted: {e}");
        } else {
            log::info!("New best score: {level}");
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
