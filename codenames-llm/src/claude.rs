//! Anthropic messages API backend
//!
//! The messages API takes the system prompt as a top-level field, so any
//! system messages are pulled out of the conversation and joined.

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::http::{build_client, send_json, Pacer};
use crate::provider::{ChatRole, Message, Provider, ProviderError};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    pacer: Pacer,
}

impl ClaudeProvider {
    pub fn new(model: &str, api_key: String, temperature: f32) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client()?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.to_string(),
            api_key,
            temperature,
            pacer: Pacer::default(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

pub fn request_body(model: &str, conversation: &[Message], max_output_tokens: u32, temperature: f32) -> Value {
    let system: Vec<&str> = conversation
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .collect();
    let messages: Vec<&Message> = conversation.iter().filter(|m| m.role != ChatRole::System).collect();

    let mut body = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_output_tokens,
        "temperature": temperature,
    });
    if !system.is_empty() {
        body["system"] = Value::String(system.join("\n\n"));
    }
    body
}

/// Concatenate the text blocks of a messages API response
pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
    let blocks = response["content"]
        .as_array()
        .ok_or_else(|| ProviderError::Transient("response has no content blocks".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();
    Ok(text.trim().to_string())
}

impl Provider for ClaudeProvider {
    fn name(&self) -> String {
        format!("claude/{}", self.model)
    }

    fn generate(&mut self, conversation: &[Message], max_output_tokens: u32) -> Result<String, ProviderError> {
        self.pacer.pace();
        let body = request_body(&self.model, conversation, max_output_tokens, self.temperature);
        let request = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);
        extract_text(&send_json(request)?)
    }
}
