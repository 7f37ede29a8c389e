//! Inference provider boundary
//!
//! A provider turns a role-tagged conversation into text. Each backend
//! translates the conversation into its own request format.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use codenames_core::{AgentError, TeamConfig};

use crate::claude::ClaudeProvider;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

// ============================================================================
// CONVERSATION
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transient provider failure: {0}")]
    Transient(String),

    #[error("provider rejected request: {0}")]
    Fatal(String),

    #[error("unsupported provider type: {0}")]
    UnsupportedProvider(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Worth another attempt after a pause
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_) | ProviderError::Transient(_))
    }
}

impl From<ProviderError> for AgentError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited(_)
            | ProviderError::Transient(_)
            | ProviderError::RetriesExhausted { .. } => AgentError::Unavailable(err.to_string()),
            ProviderError::Fatal(_) | ProviderError::UnsupportedProvider(_) => {
                AgentError::Fatal(err.to_string())
            }
        }
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

/// A text generation backend
pub trait Provider {
    /// Provider and model, for logs
    fn name(&self) -> String;

    fn generate(&mut self, conversation: &[Message], max_output_tokens: u32) -> Result<String, ProviderError>;
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn generate(&mut self, conversation: &[Message], max_output_tokens: u32) -> Result<String, ProviderError> {
        (**self).generate(conversation, max_output_tokens)
    }
}

/// Supported backends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Claude,
    Gemini,
}

impl ProviderKind {
    /// Parse a provider tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Result<Self, ProviderError> {
        match tag.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(ProviderError::UnsupportedProvider(other.to_string())),
        }
    }

    /// Environment variable consulted when the config names none
    pub fn default_key_env(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => f.write_str("openai"),
            ProviderKind::Claude => f.write_str("claude"),
            ProviderKind::Gemini => f.write_str("gemini"),
        }
    }
}

/// Build the provider a team config asks for
pub fn create_provider(config: &TeamConfig) -> Result<Box<dyn Provider>, ProviderError> {
    let kind = ProviderKind::from_tag(&config.provider)?;
    let api_key = resolve_api_key(config, kind)?;

    let provider: Box<dyn Provider> = match kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(&config.model_name, api_key, config.temperature)?),
        ProviderKind::Claude => Box::new(ClaudeProvider::new(&config.model_name, api_key, config.temperature)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(&config.model_name, api_key, config.temperature)?),
    };

    tracing::debug!("Created provider {} for {}", provider.name(), config.display_name());
    Ok(provider)
}

/// Inline key first, then the configured or default environment variable
pub fn resolve_api_key(config: &TeamConfig, kind: ProviderKind) -> Result<String, ProviderError> {
    if let Some(key) = config.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.clone());
    }

    let var = config.api_key_env.as_deref().unwrap_or_else(|| kind.default_key_env());
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ProviderError::Fatal(format!(
            "missing API key for {}: set {}",
            config.display_name(),
            var
        ))),
    }
}
