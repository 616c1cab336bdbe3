//! One-shot countdown in whole-second steps
//!
//! The countdown owns no callback. The controller advances it with elapsed
//! milliseconds and reacts to the [`CountdownStep`] it returns, so stopping it
//! is always immediate: there is nothing left in flight to fire later.

use serde::{Deserialize, Serialize};

use crate::consts::{MEMORIZE_WARNING_SECONDS, SELECTION_WARNING_SECONDS, TICK_MS};

/// Which phase a countdown is timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownKind {
    #[default]
    Memorize,
    Select,
}

impl CountdownKind {
    /// Seconds at or below which the display shows "low time"
    pub fn warning_threshold(&self) -> u32 {
        match self {
            CountdownKind::Memorize => MEMORIZE_WARNING_SECONDS,
            CountdownKind::Select => SELECTION_WARNING_SECONDS,
        }
    }
}

/// Result of starting or advancing a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Nothing is running
    Idle,
    /// Running, no whole second elapsed
    Running,
    /// At least one second elapsed; new remaining value
    Ticked { remaining: u32 },
    /// Reached zero. Reported once, after which the countdown is stopped.
    Expired(CountdownKind),
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    active: bool,
    kind: CountdownKind,
    remaining: u32,
    /// Milliseconds accumulated toward the next step
    elapsed_ms: u32,
    /// Bumped on every start and every stop of a running countdown
    generation: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `seconds` (rounded, floored at 0), replacing
    /// any running countdown. A zero duration expires right here.
    pub fn start(&mut self, seconds: f32, kind: CountdownKind) -> CountdownStep {
        self.stop();
        self.generation += 1;
        self.kind = kind;
        // NaN and negatives saturate to 0
        self.remaining = seconds.round().max(0.0) as u32;
        self.elapsed_ms = 0;

        if self.remaining == 0 {
            return CountdownStep::Expired(kind);
        }
        self.active = true;
        CountdownStep::Running
    }

    /// Cancel the running countdown. Safe to call at any time.
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.generation += 1;
        }
        self.elapsed_ms = 0;
    }

    /// Advance by `dt_ms` of wall time
    ///
    /// Time left over in the call that expires the countdown is dropped.
    pub fn advance(&mut self, dt_ms: u32) -> CountdownStep {
        if !self.active {
            return CountdownStep::Idle;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let mut ticked = false;
        while self.elapsed_ms >= TICK_MS {
            self.elapsed_ms -= TICK_MS;
            self.remaining -= 1;
            ticked = true;
            if self.remaining == 0 {
                self.active = false;
                self.elapsed_ms = 0;
                return CountdownStep::Expired(self.kind);
            }
        }

        if ticked {
            CountdownStep::Ticked {
                remaining: self.remaining,
            }
        } else {
            CountdownStep::Running
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn kind(&self) -> CountdownKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Low-time signal for the display; no effect on play
    pub fn is_warning(&self) -> bool {
        self.active && self.remaining > 0 && self.remaining <= self.kind.warning_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_expires_once() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.start(3.0, CountdownKind::Memorize), CountdownStep::Running);
        assert_eq!(countdown.remaining(), 3);

        assert_eq!(countdown.advance(999), CountdownStep::Running);
        assert_eq!(countdown.advance(1), CountdownStep::Ticked { remaining: 2 });
        assert_eq!(countdown.advance(1000), CountdownStep::Ticked { remaining: 1 });
        assert_eq!(
            countdown.advance(1000),
            CountdownStep::Expired(CountdownKind::Memorize)
        );
        assert!(!countdown.is_active());
        assert_eq!(countdown.remaining(), 0);

        // Nothing after expiry
        assert_eq!(countdown.advance(5000), CountdownStep::Idle);
    }

    #[test]
    fn test_large_step_expires() {
        let mut countdown = Countdown::new();
        countdown.start(10.0, CountdownKind::Select);
        assert_eq!(
            countdown.advance(60_000),
            CountdownStep::Expired(CountdownKind::Select)
        );
        assert_eq!(countdown.advance(1000), CountdownStep::Idle);
    }

    #[test]
    fn test_duration_rounded() {
        let mut countdown = Countdown::new();
        countdown.start(2.6, CountdownKind::Select);
        assert_eq!(countdown.remaining(), 3);
        countdown.start(2.4, CountdownKind::Select);
        assert_eq!(countdown.remaining(), 2);
    }

    #[test]
    fn test_zero_duration_expires_immediately() {
        let mut countdown = Countdown::new();
        assert_eq!(
            countdown.start(0.0, CountdownKind::Memorize),
            CountdownStep::Expired(CountdownKind::Memorize)
        );
        assert!(!countdown.is_active());
        assert_eq!(
            countdown.start(-4.0, CountdownKind::Select),
            CountdownStep::Expired(CountdownKind::Select)
        );
        assert_eq!(
            countdown.start(0.3, CountdownKind::Select),
            CountdownStep::Expired(CountdownKind::Select)
        );
        assert_eq!(countdown.advance(1000), CountdownStep::Idle);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut countdown = Countdown::new();
        countdown.stop();
        countdown.stop();
        assert_eq!(countdown.generation(), 0);

        countdown.start(5.0, CountdownKind::Memorize);
        countdown.advance(500);
        countdown.stop();
        let generation = countdown.generation();
        countdown.stop();
        assert_eq!(countdown.generation(), generation);
        assert_eq!(countdown.advance(10_000), CountdownStep::Idle);
    }

    #[test]
    fn test_restart_replaces_previous() {
        let mut countdown = Countdown::new();
        countdown.start(5.0, CountdownKind::Memorize);
        countdown.advance(700);
        let first = countdown.generation();

        countdown.start(2.0, CountdownKind::Select);
        assert!(countdown.generation() > first);
        assert_eq!(countdown.kind(), CountdownKind::Select);
        // Partial second from the old countdown does not carry over
        assert_eq!(countdown.advance(300), CountdownStep::Running);
        assert_eq!(countdown.advance(700), CountdownStep::Ticked { remaining: 1 });
    }

    #[test]
    fn test_warning_thresholds() {
        let mut countdown = Countdown::new();
        countdown.start(5.0, CountdownKind::Memorize);
        assert!(!countdown.is_warning());
        countdown.advance(3000);
        assert_eq!(countdown.remaining(), 2);
        assert!(countdown.is_warning());

        countdown.start(10.0, CountdownKind::Select);
        countdown.advance(6000);
        assert_eq!(countdown.remaining(), 4);
        assert!(!countdown.is_warning());
        countdown.advance(1000);
        assert!(countdown.is_warning());
        countdown.advance(3000);
        assert!(!countdown.is_warning());
    }
}
