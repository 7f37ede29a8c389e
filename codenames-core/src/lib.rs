//! Codenames Core - Board, rules and the turn engine
//!
//! This crate provides the game itself:
//! - Word lists and board generation (25 words, 9 / 8 / 7 / 1 split)
//! - Game state, turn records and results
//! - Codemaster and guesser agent traits
//! - The turn state machine driving a game to completion

pub mod agent;
pub mod board;
pub mod config;
pub mod game;
pub mod scripted;

// Re-exports for convenient access
pub use agent::{AgentError, AgentFactory, Codemaster, Guesser, Role, TeamAgents};
pub use board::{
    generate_board, rng_from_seed, split_words, Board, BoardError, BoardSetup, WordAssignment,
    WordList, BOARD_SIZE,
};
pub use config::TeamConfig;
pub use game::{
    Clue, EndReason, EngineConfig, EngineError, GameEngine, GameResult, GameState, GuessOutcome,
    Phase, Team, TeamStats, TurnEvent, TurnRecord, DEFAULT_MAX_TURNS,
};
