//! Chat-completions Gateway - CompletionGateway over an OpenAI-compatible HTTP API.
//!
//! Defaults target Perplexity's `sonar` model, which speaks the same
//! chat-completions dialect as OpenAI.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ChatCompletionsConfig::new(api_key)
//!     .with_model("sonar")
//!     .with_base_url("https://api.perplexity.ai/chat/completions");
//!
//! let gateway = ChatCompletionsGateway::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{CompletionGateway, CompletionRequest, GatewayError, Message};

/// Default endpoint: the full chat-completions URL, not an API root.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai/chat/completions";

pub const DEFAULT_MODEL: &str = "sonar";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the chat-completions gateway.
#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    pub model: String,
    /// Endpoint URL requests are POSTed to.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the endpoint URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP implementation of [`CompletionGateway`].
///
/// One POST per call; failures are reported, never retried.
pub struct ChatCompletionsGateway {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsGateway {
    /// Creates a gateway with its own HTTP client.
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ChatCompletionsConfig {
        &self.config
    }

    fn to_wire_request<'a>(&'a self, request: &'a CompletionRequest) -> WireRequest<'a> {
        WireRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Pulls the assistant text out of a 2xx body.
///
/// Bodies without a `choices` array are handed back whole so the
/// normalizer can make what it can of them.
fn extract_content(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    if value.get("choices").is_none() {
        return body.to_string();
    }

    value
        .pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl CompletionGateway for ChatCompletionsGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        tracing::debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_wire_request(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::network(format!(
                        "Request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    GatewayError::network(format!("Connection failed: {}", e))
                } else {
                    GatewayError::network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Chat completion request rejected");
            return Err(GatewayError::upstream(status.as_u16(), body));
        }

        Ok(extract_content(&body))
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}
