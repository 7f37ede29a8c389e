//! Codenames Tournament - Matchups between team configurations
//!
//! This crate provides match infrastructure:
//! - Match play between two team configs over many games
//! - Per-team aggregation (win rate, mean words-per-clue)
//! - Per-game structured logs with pluggable storage
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: MatchRunner::run_matchup (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: recorder, configuration

mod config;
mod game_runner;
mod match_play;
mod recorder;

pub use config::MatchConfig;
pub use game_runner::GameRunner;
pub use match_play::{MatchError, MatchRunner, MatchStatistics, TeamMatchStats};
pub use recorder::{
    ForfeitLog, GameLog, GameRecorder, GameSummary, GivenClue, JsonDirSink, LogSink, MemorySink, RecorderError,
    TurnLog,
};
