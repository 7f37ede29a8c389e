//! Language-model codemaster and guesser

use codenames_core::{
    AgentError, AgentFactory, Clue, Codemaster, GameState, Guesser, Team, TeamAgents, TeamConfig,
};

use crate::parse::{normalize_guess, parse_clue};
use crate::prompts::{codemaster_prompt, guesser_prompt, CODEMASTER_SYSTEM_PROMPT, GUESSER_SYSTEM_PROMPT};
use crate::provider::{create_provider, Message, Provider};
use crate::retry::{RetryPolicy, RetryingProvider};

pub const CODEMASTER_MAX_TOKENS: u32 = 20;
pub const GUESSER_MAX_TOKENS: u32 = 10;

pub struct LlmCodemaster {
    provider: Box<dyn Provider>,
}

impl LlmCodemaster {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl Codemaster for LlmCodemaster {
    fn give_clue(
        &mut self,
        team: Team,
        own_words: &[String],
        neutral_words: &[String],
        opponent_words: &[String],
        assassin: &str,
        state: &GameState,
    ) -> Result<Clue, AgentError> {
        let conversation = [
            Message::system(CODEMASTER_SYSTEM_PROMPT),
            Message::user(codemaster_prompt(team, own_words, neutral_words, opponent_words, assassin, state)),
        ];
        let reply = self.provider.generate(&conversation, CODEMASTER_MAX_TOKENS)?;
        tracing::debug!("{} codemaster ({}) replied {:?}", team, self.provider.name(), reply);
        parse_clue(&reply)
    }
}

pub struct LlmGuesser {
    provider: Box<dyn Provider>,
}

impl LlmGuesser {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl Guesser for LlmGuesser {
    fn make_guess(
        &mut self,
        team: Team,
        available_words: &[String],
        clue: &Clue,
        state: &GameState,
    ) -> Result<String, AgentError> {
        let conversation = [
            Message::system(GUESSER_SYSTEM_PROMPT),
            Message::user(guesser_prompt(team, available_words, clue, state)),
        ];
        let reply = self.provider.generate(&conversation, GUESSER_MAX_TOKENS)?;
        tracing::debug!("{} guesser ({}) replied {:?}", team, self.provider.name(), reply);

        // Unmatched replies go back verbatim so the engine applies its fallback
        Ok(normalize_guess(&reply, available_words).unwrap_or(reply))
    }
}

/// Builds retrying LLM agents from team configs
#[derive(Clone, Debug, Default)]
pub struct LlmAgentFactory {
    retry: RetryPolicy,
}

impl LlmAgentFactory {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    fn provider(&self, config: &TeamConfig) -> Result<Box<dyn Provider>, AgentError> {
        let inner = create_provider(config)?;
        Ok(Box::new(RetryingProvider::new(inner, self.retry.clone())))
    }
}

impl AgentFactory for LlmAgentFactory {
    fn create_team(&self, config: &TeamConfig) -> Result<TeamAgents, AgentError> {
        Ok(TeamAgents::new(
            LlmCodemaster::new(self.provider(config)?),
            LlmGuesser::new(self.provider(config)?),
        ))
    }
}
