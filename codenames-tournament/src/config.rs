//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use codenames_core::{EngineConfig, WordList, DEFAULT_MAX_TURNS};

/// Settings shared by every game of a matchup
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Turn cap per game
    pub max_turns: u32,
    /// Base seed; game `i` is seeded with `seed + i` (None = fresh entropy per game)
    pub seed: Option<u64>,
    /// Words boards are drawn from
    pub words: WordList,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            seed: None,
            words: WordList::default(),
        }
    }
}

impl MatchConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_words(mut self, words: WordList) -> Self {
        self.words = words;
        self
    }

    /// Seed for one game of the match
    pub fn game_seed(&self, game_id: u64) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(game_id))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::with_max_turns(self.max_turns)
    }
}
