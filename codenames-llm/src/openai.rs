//! OpenAI chat completions backend

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::http::{build_client, send_json, Pacer};
use crate::provider::{Message, Provider, ProviderError};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    pacer: Pacer,
}

impl OpenAiProvider {
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

/// Chat completions request body; messages are passed through as-is
pub fn request_body(model: &str, conversation: &[Message], max_output_tokens: u32, temperature: f32) -> Value {
    json!({
        "model": model,
        "messages": conversation,
        "max_tokens": max_output_tokens,
        "temperature": temperature,
    })
}

pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ProviderError::Transient("response has no message content".to_string()))
}

impl Provider for OpenAiProvider {
    fn name(&self) -> String {
        format!("openai/{}", self.model)
    }

    fn generate(&mut self, conversation: &[Message], max_output_tokens: u32) -> Result<String, ProviderError> {
        self.pacer.pace();
        let body = request_body(&self.model, conversation, max_output_tokens, self.temperature);
        let request = self.client.post(&self.endpoint).bearer_auth(&self.api_key).json(&body);
        extract_text(&send_json(request)?)
    }
}
