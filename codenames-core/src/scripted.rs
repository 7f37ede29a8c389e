//! Scripted agents that replay fixed answers
//!
//! Used for tests and dry runs. Once a script runs out, the agent reports
//! itself unavailable and the engine's recovery rules take over.

use std::collections::VecDeque;

use crate::agent::{AgentError, AgentFactory, Codemaster, Guesser, TeamAgents};
use crate::config::TeamConfig;
use crate::game::{Clue, GameState, Team};

/// Codemaster that hands out queued clues
#[derive(Debug, Default)]
pub struct ScriptedCodemaster {
    script: VecDeque<Result<Clue, AgentError>>,
}

impl ScriptedCodemaster {
    pub fn new(clues: Vec<Clue>) -> Self {
        Self {
            script: clues.into_iter().map(Ok).collect(),
        }
    }

    pub fn push_clue(&mut self, clue: Clue) {
        self.script.push_back(Ok(clue));
    }

    pub fn push_error(&mut self, error: AgentError) {
        self.script.push_back(Err(error));
    }
}

impl Codemaster for ScriptedCodemaster {
    fn give_clue(
        &mut self,
        _team: Team,
        _own_words: &[String],
        _neutral_words: &[String],
        _opponent_words: &[String],
        _assassin: &str,
        _state: &GameState,
    ) -> Result<Clue, AgentError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Unavailable("clue script exhausted".to_string())))
    }
}

/// Guesser that answers with queued words
#[derive(Debug, Default)]
pub struct ScriptedGuesser {
    script: VecDeque<String>,
}

impl ScriptedGuesser {
    pub fn new<I, S>(guesses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: guesses.into_iter().map(Into::into).collect(),
        }
    }
}

impl Guesser for ScriptedGuesser {
    fn make_guess(
        &mut self,
        _team: Team,
        _available_words: &[String],
        _clue: &Clue,
        _state: &GameState,
    ) -> Result<String, AgentError> {
        self.script
            .pop_front()
            .ok_or_else(|| AgentError::Unavailable("guess script exhausted".to_string()))
    }
}

/// Codemaster that points straight at its first remaining word.
///
/// The clue is the word's board position (`#n`) with count 0, so every turn
/// is exactly one correct guess when paired with [`KeyGuesser`]. Gives a
/// deterministic offline game.
#[derive(Debug, Default)]
pub struct KeyCodemaster;

impl Codemaster for KeyCodemaster {
    fn give_clue(
        &mut self,
        _team: Team,
        own_words: &[String],
        _neutral_words: &[String],
        _opponent_words: &[String],
        _assassin: &str,
        state: &GameState,
    ) -> Result<Clue, AgentError> {
        let position = own_words
            .first()
            .and_then(|target| state.board().words().iter().position(|w| w == target))
            .ok_or_else(|| AgentError::InvalidClueFormat("no words left to clue".to_string()))?;
        Ok(Clue::new(format!("#{}", position), 0))
    }
}

/// Guesser that reads the clue produced by [`KeyCodemaster`]
#[derive(Debug, Default)]
pub struct KeyGuesser;

impl Guesser for KeyGuesser {
    fn make_guess(
        &mut self,
        _team: Team,
        _available_words: &[String],
        clue: &Clue,
        state: &GameState,
    ) -> Result<String, AgentError> {
        clue.word
            .strip_prefix('#')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| state.board().words().get(n))
            .cloned()
            .ok_or_else(|| AgentError::Unavailable(format!("cannot read clue '{}'", clue.word)))
    }
}

/// Factory producing [`KeyCodemaster`] / [`KeyGuesser`] pairs for any config
#[derive(Debug, Default)]
pub struct KeyAgentFactory;

impl AgentFactory for KeyAgentFactory {
    fn create_team(&self, _config: &TeamConfig) -> Result<TeamAgents, AgentError> {
        Ok(TeamAgents::new(KeyCodemaster, KeyGuesser))
    }
}
