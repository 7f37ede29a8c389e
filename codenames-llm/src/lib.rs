//! Codenames LLM - Language-model agents and provider backends
//!
//! - `provider`: conversation types, the `Provider` trait and its factory
//! - `openai` / `claude` / `gemini`: blocking HTTP backends
//! - `retry`: exponential backoff for rate limits and transient failures
//! - `prompts` / `parse`: prompt text and reply parsing
//! - `agent`: codemaster and guesser agents built on a provider

pub mod agent;
pub mod claude;
pub mod gemini;
mod http;
pub mod openai;
pub mod parse;
pub mod prompts;
pub mod provider;
pub mod retry;

pub use agent::{LlmAgentFactory, LlmCodemaster, LlmGuesser};
pub use parse::{normalize_guess, parse_clue};
pub use provider::{create_provider, ChatRole, Message, Provider, ProviderError, ProviderKind};
pub use retry::{RetryPolicy, RetryingProvider};
