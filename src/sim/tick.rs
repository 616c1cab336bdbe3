//! Round lifecycle controller
//!
//! [`Game`] is the single handle over a session. The presentation layer feeds
//! it player intents through [`Game::handle`] and elapsed time through
//! [`Game::tick`]; each call runs to completion before the next. Timers are
//! counters inside the state, so a phase change that stops them leaves no
//! stale expiry behind.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::countdown::{CountdownKind, CountdownStep};
use super::round::{Round, Symbol};
use super::selection::SelectionTracker;
use super::state::{FailureReason, GameEvent, GamePhase, GameState};
use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::highscores::BestScore;
use crate::persistence::ScoreStore;
use crate::rank::summary_text;

/// Player intents forwarded by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pick(Symbol),
    Restart,
    EndSession,
    /// Switch difficulty; always begins a fresh game
    ChangeDifficulty(Difficulty),
}

pub struct Game<S: ScoreStore> {
    state: GameState,
    config: GameConfig,
    scores: BestScore<S>,
    rng: Pcg32,
    seed: u64,
}

impl<S: ScoreStore> Game<S> {
    /// New idle session. The best score is read from `store` once, here.
    pub fn new(seed: u64, config: GameConfig, store: S) -> Self {
        Self {
            state: GameState::new(Difficulty::default()),
            config,
            scores: BestScore::load(store),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Pick the difficulty before the first start
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.state.difficulty = difficulty;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn best_score(&self) -> u32 {
        self.scores.best()
    }

    pub fn scores(&self) -> &BestScore<S> {
        &self.scores
    }

    /// Shareable rank summary for the current level
    pub fn summary(&self) -> String {
        summary_text(self.state.difficulty, self.state.level, self.scores.best())
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Apply one player intent. Intents that make no sense in the current
    /// phase are ignored.
    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::Start => {
                if self.state.phase == GamePhase::Idle {
                    self.start();
                } else {
                    log::debug!("Start ignored in {:?}", self.state.phase);
                }
            }
            Intent::Pick(symbol) => self.pick(symbol),
            Intent::Restart => {
                if self.state.phase.is_terminal() {
                    self.reset();
                    self.start();
                } else {
                    log::debug!("Restart ignored in {:?}", self.state.phase);
                }
            }
            Intent::EndSession => self.end_session(),
            Intent::ChangeDifficulty(difficulty) => {
                log::info!("Difficulty changed to {}", difficulty.as_str());
                self.reset();
                self.state.difficulty = difficulty;
                self.start();
            }
        }
    }

    /// Advance timers by `dt_ms` of wall time
    pub fn tick(&mut self, dt_ms: u32) {
        match self.state.phase {
            GamePhase::Memorizing | GamePhase::Selecting => {
                match self.state.countdown.advance(dt_ms) {
                    CountdownStep::Ticked { remaining } => {
                        let kind = self.state.countdown.kind();
                        self.state
                            .push_event(GameEvent::CountdownTick { kind, remaining });
                    }
                    CountdownStep::Expired(kind) => {
                        self.state.push_event(GameEvent::CountdownTick { kind, remaining: 0 });
                        self.on_expired(kind);
                    }
                    CountdownStep::Idle | CountdownStep::Running => {}
                }
            }
            GamePhase::RoundWon => {
                if let Some(left) = self.state.win_delay_ms {
                    if dt_ms >= left {
                        self.state.win_delay_ms = None;
                        self.state.level += 1;
                        self.begin_level();
                    } else {
                        self.state.win_delay_ms = Some(left - dt_ms);
                    }
                }
            }
            GamePhase::Idle | GamePhase::RoundLost | GamePhase::SessionEnded => {}
        }
    }

    /// Fresh game from level 1. Caller guarantees the session is idle.
    fn start(&mut self) {
        self.state.level = 1;
        log::info!(
            "Game started on {} (seed {})",
            self.state.difficulty.as_str(),
            self.seed
        );
        self.begin_level();
    }

    /// Back to Idle, cancelling every pending timer
    fn reset(&mut self) {
        self.state.countdown.stop();
        self.state.win_delay_ms = None;
        self.state.phase = GamePhase::Idle;
        self.state.level = 1;
        self.state.round = None;
        self.state.selection = SelectionTracker::default();
        self.state.failure = None;
        self.state.summary = None;
        self.state.push_event(GameEvent::Reset);
    }

    fn begin_level(&mut self) {
        self.state.countdown.stop();
        self.state.win_delay_ms = None;
        self.state.failure = None;
        self.state.summary = None;
        self.state.mistakes_left = self.config.max_mistakes;

        let level = self.state.level;
        if self.scores.record_level(level) {
            self.state.push_event(GameEvent::BestScoreRaised { best: level });
        }

        let difficulty = self.state.difficulty;
        let round = Round::generate(level, difficulty, &self.config, &mut self.rng);
        log::info!("Level {} begins with {} cards", level, round.len());
        self.state.selection = SelectionTracker::new(&round, difficulty.pool_size());
        self.state.push_event(GameEvent::LevelStarted {
            level,
            card_count: round.len(),
        });
        self.state.round = Some(round);
        self.state.phase = GamePhase::Memorizing;

        let step = self
            .state
            .countdown
            .start(self.config.memorize_seconds, CountdownKind::Memorize);
        if let CountdownStep::Expired(kind) = step {
            self.on_expired(kind);
        }
    }

    fn open_selection(&mut self) {
        self.state.phase = GamePhase::Selecting;
        let step = self
            .state
            .countdown
            .start(self.config.select_seconds, CountdownKind::Select);
        self.state.push_event(GameEvent::SelectionOpened {
            seconds: self.state.countdown.remaining(),
        });
        if let CountdownStep::Expired(kind) = step {
            self.on_expired(kind);
        }
    }

    fn on_expired(&mut self, kind: CountdownKind) {
        match (kind, self.state.phase) {
            (CountdownKind::Memorize, GamePhase::Memorizing) => self.open_selection(),
            (CountdownKind::Select, GamePhase::Selecting) => {
                // A winning pick already processed takes precedence
                if !self.state.selection.is_complete() {
                    self.lose(FailureReason::TimeExpired);
                }
            }
            (kind, phase) => log::debug!("Stale {kind:?} expiry ignored in {phase:?}"),
        }
    }

    fn pick(&mut self, symbol: Symbol) {
        if !self.state.accepts_picks() {
            log::debug!("Pick {symbol} ignored in {:?}", self.state.phase);
            return;
        }
        if !self.state.difficulty.contains(symbol) {
            log::debug!("Pick {symbol} is not in the active pool");
            return;
        }
        if self.state.selection.is_locked(symbol) {
            log::debug!("Pick {symbol} ignored, choice already spent");
            return;
        }

        let outcome = self.state.selection.record_pick(symbol);
        log::debug!(
            "Picked {symbol}: matched={} remaining={}",
            outcome.matched,
            outcome.remaining
        );

        if outcome.matched {
            self.state.push_event(GameEvent::Picked {
                symbol,
                matched: true,
                remaining: outcome.remaining,
                mistakes_left: self.state.mistakes_left,
            });
            if self.state.selection.is_complete() {
                self.win();
            }
            return;
        }

        let out_of_mistakes = self.state.mistakes_left == 0;
        self.state.mistakes_left = self.state.mistakes_left.saturating_sub(1);
        self.state.push_event(GameEvent::Picked {
            symbol,
            matched: false,
            remaining: outcome.remaining,
            mistakes_left: self.state.mistakes_left,
        });
        if out_of_mistakes {
            self.lose(FailureReason::WrongSymbol { symbol });
        }
    }

    fn win(&mut self) {
        self.state.countdown.stop();
        self.state.phase = GamePhase::RoundWon;
        self.state.win_delay_ms = Some(self.config.win_delay_ms);
        log::info!("Level {} cleared", self.state.level);
        self.state.push_event(GameEvent::RoundWon {
            level: self.state.level,
        });
    }

    fn lose(&mut self, reason: FailureReason) {
        self.state.countdown.stop();
        self.state.phase = GamePhase::RoundLost;
        self.state.failure = Some(reason);
        log::info!("Level {} lost: {}", self.state.level, reason.as_str());
        self.state.push_event(GameEvent::RoundLost { reason });
    }

    fn end_session(&mut self) {
        if !self.state.phase.is_active() {
            log::debug!("End ignored in {:?}", self.state.phase);
            return;
        }
        self.state.countdown.stop();
        self.state.win_delay_ms = None;
        self.state.phase = GamePhase::SessionEnded;

        let summary = self.summary();
        log::info!("Session ended at level {}", self.state.level);
        self.state.summary = Some(summary.clone());
        self.state.push_event(GameEvent::SessionEnded {
            level: self.state.level,
            summary,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    const SECOND: u32 = 1000;

    fn game() -> Game<MemoryStore> {
        Game::new(12345, GameConfig::default(), MemoryStore::new())
    }

    fn sequence(game: &Game<MemoryStore>) -> Vec<Symbol> {
        game.state().round.as_ref().unwrap().sequence().to_vec()
    }

    /// Pool symbol absent from the current sequence, if any
    fn absent_symbol(game: &Game<MemoryStore>) -> Option<Symbol> {
        let seq = sequence(game);
        game.difficulty().pool().find(|s| !seq.contains(s))
    }

    /// Start with a controlled sequence: replay seeds until `pred` holds
    fn game_where(pred: impl Fn(&Game<MemoryStore>) -> bool) -> Game<MemoryStore> {
        for seed in 0..10_000 {
            let mut g = Game::new(seed, GameConfig::default(), MemoryStore::new());
            g.handle(Intent::Start);
            if pred(&g) {
                return g;
            }
        }
        panic!("no seed satisfies predicate");
    }

    fn to_selecting(game: &mut Game<MemoryStore>) {
        game.tick(5 * SECOND);
        assert_eq!(game.phase(), GamePhase::Selecting);
    }

    #[test]
    fn test_tick_idle_does_nothing() {
        let mut g = game();
        g.tick(60 * SECOND);
        assert_eq!(g.phase(), GamePhase::Idle);
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_start_to_selecting() {
        let mut g = game();
        g.handle(Intent::Start);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
        assert_eq!(sequence(&g).len(), 3);
        assert_eq!(g.state().mistakes_left, 1);
        assert_eq!(g.state().countdown.remaining(), 5);
        assert!(g.state().visible_sequence().is_some());

        g.tick(4 * SECOND);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        g.tick(SECOND);
        assert_eq!(g.phase(), GamePhase::Selecting);
        assert_eq!(g.state().countdown.remaining(), 10);
        assert_eq!(g.state().countdown.kind(), CountdownKind::Select);
        assert!(g.state().visible_sequence().is_none());
    }

    #[test]
    fn test_pick_before_selection_ignored() {
        let mut g = game();
        g.handle(Intent::Pick(Symbol::new(0)));
        g.handle(Intent::Start);
        g.handle(Intent::Pick(Symbol::new(0)));
        assert!(g.state().selection.history().is_empty());
        assert_eq!(g.state().selection.remaining_count(), 3);
    }

    #[test]
    fn test_full_match_advances_level() {
        let mut g = game();
        g.handle(Intent::Start);
        let mut seq = sequence(&g);
        to_selecting(&mut g);

        // Any order works
        seq.reverse();
        for symbol in seq {
            g.handle(Intent::Pick(symbol));
        }
        assert_eq!(g.phase(), GamePhase::RoundWon);
        assert!(!g.state().countdown.is_active());

        // Picks are closed during the pause
        g.handle(Intent::Pick(Symbol::new(0)));
        assert_eq!(g.state().selection.history().len(), 3);

        g.tick(1199);
        assert_eq!(g.phase(), GamePhase::RoundWon);
        g.tick(1);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 2);
        assert_eq!(sequence(&g).len(), 4);
        assert!(g.state().selection.history().is_empty());
        assert_eq!(g.best_score(), 2);
    }

    #[test]
    fn test_first_wrong_pick_spends_budget() {
        let mut g = game_where(|g| absent_symbol(g).is_some());
        let wrong = absent_symbol(&g).unwrap();
        to_selecting(&mut g);

        g.handle(Intent::Pick(wrong));
        assert_eq!(g.phase(), GamePhase::Selecting);
        assert_eq!(g.state().mistakes_left, 0);
        assert!(g.state().selection.is_locked(wrong));
        assert_eq!(g.state().selection.remaining_count(), 3);

        // Spent choice stays disabled
        g.handle(Intent::Pick(wrong));
        assert_eq!(g.phase(), GamePhase::Selecting);
        assert_eq!(g.state().selection.history().len(), 1);
    }

    #[test]
    fn test_second_wrong_pick_loses() {
        // Need two distinct absent symbols: use medium (5-symbol pool)
        let mut g = {
            let mut found = None;
            for seed in 0..10_000 {
                let mut g = Game::new(seed, GameConfig::default(), MemoryStore::new())
                    .with_difficulty(Difficulty::Medium);
                g.handle(Intent::Start);
                let seq = sequence(&g);
                if g.difficulty().pool().filter(|s| !seq.contains(s)).count() >= 2 {
                    found = Some(g);
                    break;
                }
            }
            found.unwrap()
        };
        let seq = sequence(&g);
        let absent: Vec<Symbol> = g.difficulty().pool().filter(|s| !seq.contains(s)).collect();
        to_selecting(&mut g);

        g.handle(Intent::Pick(absent[0]));
        assert_eq!(g.phase(), GamePhase::Selecting);
        g.handle(Intent::Pick(absent[1]));
        assert_eq!(g.phase(), GamePhase::RoundLost);
        assert_eq!(
            g.state().failure,
            Some(FailureReason::WrongSymbol { symbol: absent[1] })
        );
        assert_eq!(g.state().failure.unwrap().as_str(), "wrong symbol");
        assert!(!g.state().countdown.is_active());
        assert_eq!(g.state().visible_sequence(), Some(seq.as_slice()));
    }

    #[test]
    fn test_timeout_loses() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        to_selecting(&mut g);
        g.handle(Intent::Pick(seq[0]));

        g.tick(9 * SECOND);
        assert_eq!(g.phase(), GamePhase::Selecting);
        g.tick(SECOND);
        assert_eq!(g.phase(), GamePhase::RoundLost);
        assert_eq!(g.state().failure, Some(FailureReason::TimeExpired));

        // Further time changes nothing
        g.tick(60 * SECOND);
        assert_eq!(g.phase(), GamePhase::RoundLost);
    }

    #[test]
    fn test_winning_pick_beats_timer() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        to_selecting(&mut g);
        g.tick(9 * SECOND + 999);
        for symbol in seq {
            g.handle(Intent::Pick(symbol));
        }
        assert_eq!(g.phase(), GamePhase::RoundWon);

        // The expiry instant has passed; the win stands and the level advances
        g.tick(1);
        assert_eq!(g.phase(), GamePhase::RoundWon);
        g.tick(1200);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 2);
    }

    #[test]
    fn test_end_session_cancels_win_delay() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        to_selecting(&mut g);
        for symbol in seq {
            g.handle(Intent::Pick(symbol));
        }
        g.handle(Intent::EndSession);
        assert_eq!(g.phase(), GamePhase::SessionEnded);
        assert_eq!(g.state().win_delay_ms, None);

        g.tick(10 * SECOND);
        assert_eq!(g.phase(), GamePhase::SessionEnded);
        assert_eq!(g.level(), 1);
        let summary = g.state().summary.as_deref().unwrap();
        assert!(summary.contains("現在のレベル: Lv1"));
        assert!(summary.contains("称号: ぼんやり村人"));
        assert!(summary.contains("最高スコア: 1"));
    }

    #[test]
    fn test_end_session_during_memorize_reveals() {
        let mut g = game();
        g.handle(Intent::Start);
        g.tick(2 * SECOND);
        g.handle(Intent::EndSession);
        assert_eq!(g.phase(), GamePhase::SessionEnded);
        assert!(!g.state().countdown.is_active());
        assert!(g.state().visible_sequence().is_some());

        // No stale memorize expiry
        g.tick(10 * SECOND);
        assert_eq!(g.phase(), GamePhase::SessionEnded);
    }

    #[test]
    fn test_end_ignored_when_idle_or_lost() {
        let mut g = game();
        g.handle(Intent::EndSession);
        assert_eq!(g.phase(), GamePhase::Idle);

        g.handle(Intent::Start);
        g.tick(5 * SECOND);
        g.tick(10 * SECOND);
        assert_eq!(g.phase(), GamePhase::RoundLost);
        g.handle(Intent::EndSession);
        assert_eq!(g.phase(), GamePhase::RoundLost);
    }

    #[test]
    fn test_restart_after_loss() {
        let mut g = game();
        g.handle(Intent::Start);
        // Restart is only for finished sessions
        g.handle(Intent::Restart);
        assert_eq!(g.phase(), GamePhase::Memorizing);

        g.tick(5 * SECOND);
        g.tick(10 * SECOND);
        assert_eq!(g.phase(), GamePhase::RoundLost);
        g.drain_events();

        g.handle(Intent::Restart);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
        assert_eq!(g.state().failure, None);
        let events = g.drain_events();
        assert_eq!(events[0], GameEvent::Reset);
        assert!(matches!(events[1], GameEvent::LevelStarted { level: 1, card_count: 3 }));
    }

    #[test]
    fn test_change_difficulty_starts_fresh() {
        let mut g = game();
        g.handle(Intent::Start);
        to_selecting(&mut g);
        g.handle(Intent::ChangeDifficulty(Difficulty::Hard));
        assert_eq!(g.difficulty(), Difficulty::Hard);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
        assert_eq!(g.state().countdown.kind(), CountdownKind::Memorize);
        assert_eq!(g.state().countdown.remaining(), 5);
        assert_eq!(g.state().selection.marks().len(), 7);
    }

    #[test]
    fn test_change_difficulty_cancels_win_delay() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        to_selecting(&mut g);
        for symbol in seq {
            g.handle(Intent::Pick(symbol));
        }
        assert_eq!(g.phase(), GamePhase::RoundWon);

        g.handle(Intent::ChangeDifficulty(Difficulty::Hard));
        assert_eq!(g.state().win_delay_ms, None);
        g.tick(1200);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
        assert_eq!(g.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_restart_after_end_session() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        to_selecting(&mut g);
        for symbol in seq {
            g.handle(Intent::Pick(symbol));
        }
        g.handle(Intent::EndSession);
        assert_eq!(g.phase(), GamePhase::SessionEnded);
        g.drain_events();

        g.handle(Intent::Restart);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
        assert_eq!(g.state().summary, None);
        assert_eq!(g.state().win_delay_ms, None);
        assert_eq!(g.drain_events()[0], GameEvent::Reset);

        g.tick(1200);
        assert_eq!(g.phase(), GamePhase::Memorizing);
        assert_eq!(g.level(), 1);
    }

    #[test]
    fn test_decimal_stored_best_kept_on_start() {
        let mut g = Game::new(1, GameConfig::default(), MemoryStore::with_value("7.0"));
        assert_eq!(g.best_score(), 7);
        g.handle(Intent::Start);
        assert_eq!(g.best_score(), 7);
        assert_eq!(g.scores().store().value(), Some("7.0"));
    }

    #[test]
    fn test_pick_outside_pool_ignored() {
        let mut g = game();
        g.handle(Intent::Start);
        to_selecting(&mut g);
        g.handle(Intent::Pick(Symbol::new(7)));
        assert!(g.state().selection.history().is_empty());
        assert_eq!(g.state().mistakes_left, 1);
    }

    #[test]
    fn test_best_score_loaded_and_raised() {
        let mut g = Game::new(1, GameConfig::default(), MemoryStore::with_value("7"));
        assert_eq!(g.best_score(), 7);
        g.handle(Intent::Start);
        assert_eq!(g.best_score(), 7);
        assert!(
            !g.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::BestScoreRaised { .. }))
        );

        let mut g = Game::new(1, GameConfig::default(), MemoryStore::with_value("abc"));
        assert_eq!(g.best_score(), 0);
        g.handle(Intent::Start);
        assert_eq!(g.best_score(), 1);
        assert_eq!(g.scores().store().value(), Some("1"));
        assert!(g.drain_events().contains(&GameEvent::BestScoreRaised { best: 1 }));
    }

    #[test]
    fn test_zero_second_timers() {
        let config = GameConfig {
            memorize_seconds: 0.0,
            ..GameConfig::default()
        };
        let mut g = Game::new(5, config, MemoryStore::new());
        g.handle(Intent::Start);
        // Memorize expires inside start
        assert_eq!(g.phase(), GamePhase::Selecting);

        let config = GameConfig {
            memorize_seconds: 0.0,
            select_seconds: 0.0,
            ..GameConfig::default()
        };
        let mut g = Game::new(5, config, MemoryStore::new());
        g.handle(Intent::Start);
        assert_eq!(g.phase(), GamePhase::RoundLost);
        assert_eq!(g.state().failure, Some(FailureReason::TimeExpired));
    }

    #[test]
    fn test_event_order_for_a_round() {
        let mut g = game();
        g.handle(Intent::Start);
        let seq = sequence(&g);
        g.tick(5 * SECOND);
        for symbol in &seq {
            g.handle(Intent::Pick(*symbol));
        }
        let events = g.drain_events();
        assert_eq!(events[0], GameEvent::BestScoreRaised { best: 1 });
        assert_eq!(events[1], GameEvent::LevelStarted { level: 1, card_count: 3 });
        assert_eq!(
            events[2],
            GameEvent::CountdownTick {
                kind: CountdownKind::Memorize,
                remaining: 0
            }
        );
        assert_eq!(events[3], GameEvent::SelectionOpened { seconds: 10 });
        assert!(matches!(events[4], GameEvent::Picked { matched: true, remaining: 2, .. }));
        assert_eq!(*events.last().unwrap(), GameEvent::RoundWon { level: 1 });
    }

    #[test]
    fn test_determinism() {
        let mut a = Game::new(4242, GameConfig::default(), MemoryStore::new());
        let mut b = Game::new(4242, GameConfig::default(), MemoryStore::new());
        for g in [&mut a, &mut b] {
            g.handle(Intent::Start);
            let seq = sequence(g);
            g.tick(5 * SECOND);
            for symbol in seq {
                g.handle(Intent::Pick(symbol));
            }
            g.tick(1200);
        }
        assert_eq!(sequence(&a), sequence(&b));
        assert_eq!(a.level(), 2);
    }
}
