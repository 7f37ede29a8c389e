//! Team configuration

use serde::{Deserialize, Serialize};

fn default_temperature() -> f32 {
    0.7
}

/// Which model plays for a team and how to reach it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Short name used in logs and reports (e.g. "gpt4")
    #[serde(default)]
    pub label: String,
    /// Provider tag: "openai", "claude" or "gemini"
    pub provider: String,
    pub model_name: String,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Inline key; takes precedence over `api_key_env`. Never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl TeamConfig {
    pub fn new(label: impl Into<String>, provider: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            provider: provider.into(),
            model_name: model_name.into(),
            api_key_env: None,
            api_key: None,
            temperature: default_temperature(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Label if set, otherwise the model name
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.model_name
        } else {
            &self.label
        }
    }
}
