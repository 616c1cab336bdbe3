//! Deterministic round lifecycle
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only arrives through `Game::tick`
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies beyond `ScoreStore`

pub mod countdown;
pub mod round;
pub mod selection;
pub mod state;
pub mod tick;

pub use countdown::{Countdown, CountdownKind, CountdownStep};
pub use round::{Round, Symbol, generate, generate_sequence};
pub use selection::{ChoiceMark, PickOutcome, SelectionTracker};
pub use state::{FailureReason, GameEvent, GamePhase, GameState};
pub use tick::{Game, Intent};
