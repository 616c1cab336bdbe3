//! Symbols and round generation

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::EMOJIS;
use crate::difficulty::Difficulty;

/// A game token: an index into [`EMOJIS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(u8);

impl Symbol {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn glyph(&self) -> &'static str {
        EMOJIS.get(self.index()).copied().unwrap_or("?")
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        EMOJIS
            .iter()
            .position(|&e| e == glyph)
            .map(|i| Symbol(i as u8))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Draw `count` symbols uniformly, with replacement, from the difficulty's pool
pub fn generate_sequence<R: Rng + ?Sized>(
    count: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Symbol> {
    let pool = difficulty.pool_size();
    (0..count)
        .map(|_| Symbol(rng.random_range(0..pool) as u8))
        .collect()
}

/// Sequence for a level under the default config
pub fn generate<R: Rng + ?Sized>(level: u32, difficulty: Difficulty, rng: &mut R) -> Vec<Symbol> {
    Round::generate(level, difficulty, &GameConfig::default(), rng).sequence
}

/// Target sequence for one level. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    level: u32,
    sequence: Vec<Symbol>,
}

impl Round {
    pub fn generate<R: Rng + ?Sized>(
        level: u32,
        difficulty: Difficulty,
        config: &GameConfig,
        rng: &mut R,
    ) -> Self {
        Self {
            level,
            sequence: generate_sequence(config.card_count(level), difficulty, rng),
        }
    }

    /// Round with a known sequence
    pub fn from_sequence(level: u32, sequence: Vec<Symbol>) -> Self {
        Self { level, sequence }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_glyph_roundtrip() {
        for (i, glyph) in EMOJIS.iter().enumerate() {
            let symbol = Symbol::from_glyph(glyph).unwrap();
            assert_eq!(symbol.index(), i);
            assert_eq!(symbol.glyph(), *glyph);
        }
        assert_eq!(Symbol::from_glyph("🦀"), None);
        assert_eq!(Symbol::new(42).glyph(), "?");
    }

    #[test]
    fn test_level_one_easy_has_three_cards() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(generate(1, Difficulty::Easy, &mut rng).len(), 3);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = generate(5, Difficulty::Hard, &mut Pcg32::seed_from_u64(99));
        let b = generate(5, Difficulty::Hard, &mut Pcg32::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicates_occur() {
        // 3-symbol pool, 20 cards: pigeonhole guarantees repeats
        let mut rng = Pcg32::seed_from_u64(1);
        let sequence = generate(18, Difficulty::Easy, &mut rng);
        assert_eq!(sequence.len(), 20);
        let mut distinct = sequence.clone();
        distinct.sort();
        distinct.dedup();
        assert!(distinct.len() < sequence.len());
    }

    #[test]
    fn test_round_uses_base_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = GameConfig {
            base_card_count: 2,
            ..GameConfig::default()
        };
        let round = Round::generate(4, Difficulty::Medium, &config, &mut rng);
        assert_eq!(round.level(), 4);
        assert_eq!(round.len(), 5);
    }

    proptest! {
        #[test]
        fn length_tracks_level(level in 1u32..60, seed in any::<u64>(), d in 0usize..3) {
            let difficulty = Difficulty::ALL[d];
            let mut rng = Pcg32::seed_from_u64(seed);
            let round = Round::generate(level, difficulty, &GameConfig::default(), &mut rng);
            prop_assert_eq!(round.len(), 3 + level as usize - 1);
            prop_assert!(round.sequence().iter().all(|s| difficulty.contains(*s)));
        }
    }
}
