//! Google Gemini backend
//!
//! The conversation is folded into one prompt string. Generation settings
//! are fixed; the per-call token limit is not forwarded.

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::http::{build_client, send_json, Pacer};
use crate::provider::{ChatRole, Message, Provider, ProviderError};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_OUTPUT_TOKENS: u32 = 1024;
const TOP_P: f64 = 0.8;
const TOP_K: u32 = 40;

/// Reply substituted when the response is blocked by safety filtering
pub const BLOCKED_REPLY: &str = "I cannot provide an answer.";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    pacer: Pacer,
}

impl GeminiProvider {
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

    /// Base URL; the model path is appended per request
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

pub fn flatten_prompt(conversation: &[Message]) -> String {
    conversation
        .iter()
        .map(|m| match m.role {
            ChatRole::System => format!("Instructions: {}", m.content),
            ChatRole::User => format!("User: {}", m.content),
            ChatRole::Assistant => format!("Assistant: {}", m.content),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn request_body(conversation: &[Message], temperature: f32) -> Value {
    let safety: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|c| json!({"category": c, "threshold": "BLOCK_NONE"}))
        .collect();

    json!({
        "contents": [{"role": "user", "parts": [{"text": flatten_prompt(conversation)}]}],
        "generationConfig": {
            "temperature": temperature,
            "topP": TOP_P,
            "topK": TOP_K,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        },
        "safetySettings": safety,
    })
}

/// Pull the text out of a response, substituting [`BLOCKED_REPLY`] for blocked output
pub fn extract_text(response: &Value) -> Result<String, ProviderError> {
    if response["promptFeedback"]["blockReason"].is_string() {
        return Ok(BLOCKED_REPLY.to_string());
    }

    let candidate = &response["candidates"][0];
    if candidate.is_null() {
        return Err(ProviderError::Transient("response has no candidates".to_string()));
    }
    if candidate["finishReason"] == "SAFETY" {
        return Ok(BLOCKED_REPLY.to_string());
    }

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

impl Provider for GeminiProvider {
    fn name(&self) -> String {
        format!("gemini/{}", self.model)
    }

    fn generate(&mut self, conversation: &[Message], _max_output_tokens: u32) -> Result<String, ProviderError> {
        self.pacer.pace();
        let url = format!("{}/{}:generateContent", self.endpoint, self.model);
        let request = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(conversation, self.temperature));
        extract_text(&send_json(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_prompt() {
        let conversation = vec![
            Message::system("be brief"),
            Message::user("clue?"),
            Message::assistant("fruit\n2"),
        ];
        assert_eq!(
            flatten_prompt(&conversation),
            "Instructions: be brief\n\nUser: clue?\n\nAssistant: fruit\n2"
        );
    }

    #[test]
    fn test_fixed_generation_config() {
        let body = request_body(&[Message::user("hi")], 0.7);
        let config = &body["generationConfig"];
        assert_eq!(config["maxOutputTokens"], 1024);
        assert_eq!(config["topK"], 40);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn test_blocked_response() {
        let blocked = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert_eq!(extract_text(&blocked).unwrap(), BLOCKED_REPLY);

        let filtered = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert_eq!(extract_text(&filtered).unwrap(), BLOCKED_REPLY);
    }

    #[test]
    fn test_extract_text() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": "river "}]}}]});
        assert_eq!(extract_text(&response).unwrap(), "river");
    }
}
