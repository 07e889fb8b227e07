//! Completion service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{ChatCompletionsConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Chat-completions service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// Bearer token for the service
    pub api_key: Option<Secret<String>>,

    /// Full chat-completions endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CompletionConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate completion configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired(
                "ADHD_COMPANION__COMPLETION__API_KEY",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }

        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyModel);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }

    /// Gateway settings; `None` until an API key is configured
    pub fn gateway_config(&self) -> Option<ChatCompletionsConfig> {
        let api_key = self.api_key.as_ref()?.expose_secret();
        Some(
            ChatCompletionsConfig::new(api_key.trim())
                .with_base_url(&self.base_url)
                .with_model(&self.model)
                .with_timeout(self.timeout()),
        )
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}
