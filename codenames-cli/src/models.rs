//! Model registry - named team configurations
//!
//! Level 4 - Configuration

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use codenames_core::TeamConfig;

/// Team configs keyed by the name used on the command line
#[derive(Clone, Debug)]
pub struct ModelRegistry {
    models: BTreeMap<String, TeamConfig>,
}

impl ModelRegistry {
    /// The four stock models; keys come from the provider's default env var
    pub fn builtin() -> Self {
        let configs = [
            TeamConfig::new("gpt4", "openai", "gpt-4"),
            TeamConfig::new("gpt3", "openai", "gpt-3.5-turbo"),
            TeamConfig::new("gemini", "gemini", "gemini-2.0-flash-exp"),
            TeamConfig::new("claude", "claude", "claude-3-opus-20240229"),
        ];
        Self {
            models: configs.into_iter().map(|c| (c.label.clone(), c)).collect(),
        }
    }

    /// Parse a JSON object of `key -> TeamConfig`.
    ///
    /// Entries are looked up by their key; `label` only changes how a team
    /// is displayed and defaults to the key.
    pub fn parse(json: &str) -> Result<Self> {
        let mut models: BTreeMap<String, TeamConfig> = serde_json::from_str(json).context("Invalid models file")?;
        if models.is_empty() {
            bail!("Models file defines no models");
        }

        for (key, config) in models.iter_mut() {
            if config.label.is_empty() {
                config.label = key.clone();
            }
        }
        Ok(Self { models })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read models file: {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Failed to load models from {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Result<&TeamConfig> {
        self.models.get(key).with_context(|| {
            format!(
                "Unknown model '{}' (available: {})",
                key,
                self.keys().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}
