//! Agent capabilities: codemaster and guesser
//!
//! The engine only sees these traits. How an agent reaches its answer
//! (a language model, a script, a human) is up to the implementation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TeamConfig;
use crate::game::{Clue, GameState, Team};

/// The two seats on a team
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Codemaster,
    Guesser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Codemaster => f.write_str("codemaster"),
            Role::Guesser => f.write_str("guesser"),
        }
    }
}

/// Agent failures, split by how the engine reacts to them
#[derive(Debug, Error)]
pub enum AgentError {
    /// Output could not be read as a clue; the turn is forfeited
    #[error("invalid clue format: {0}")]
    InvalidClueFormat(String),

    /// Backend gave up after retrying; the engine forfeits or falls back
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    /// Credentials or configuration are wrong; the match is aborted
    #[error("{0}")]
    Fatal(String),
}

impl AgentError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::Fatal(_))
    }
}

/// Gives one-word clues to its own team
pub trait Codemaster {
    fn give_clue(
        &mut self,
        team: Team,
        own_words: &[String],
        neutral_words: &[String],
        opponent_words: &[String],
        assassin: &str,
        state: &GameState,
    ) -> Result<Clue, AgentError>;
}

/// Picks one board word per call in response to a clue
pub trait Guesser {
    /// Should return one of `available_words`; anything else is replaced by the engine
    fn make_guess(
        &mut self,
        team: Team,
        available_words: &[String],
        clue: &Clue,
        state: &GameState,
    ) -> Result<String, AgentError>;
}

/// One team's pair of agents
pub struct TeamAgents {
    pub codemaster: Box<dyn Codemaster>,
    pub guesser: Box<dyn Guesser>,
}

impl TeamAgents {
    pub fn new(codemaster: impl Codemaster + 'static, guesser: impl Guesser + 'static) -> Self {
        Self {
            codemaster: Box::new(codemaster),
            guesser: Box::new(guesser),
        }
    }
}

/// Builds fresh agents for every game
pub trait AgentFactory {
    fn create_team(&self, config: &TeamConfig) -> Result<TeamAgents, AgentError>;
}
