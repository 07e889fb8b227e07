//! Completion Gateway Port - Interface to a chat-completions service.
//!
//! The orchestrator hands over a fully shaped [`CompletionRequest`] and gets
//! back the raw assistant text. Making sense of that text is the normalizer's
//! job, not the gateway's.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoGateway;
//!
//! #[async_trait]
//! impl CompletionGateway for EchoGateway {
//!     async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
//!         Ok(request.messages.last().map(|m| m.content.clone()).unwrap_or_default())
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::chatbot::{ChatTurn, Sender};

/// History turns forwarded with each request.
pub const HISTORY_WINDOW: usize = 4;

/// Generation budget per reply.
pub const MAX_TOKENS: u32 = 300;

pub const TEMPERATURE: f32 = 0.7;

/// Port for chat-completions services.
///
/// Implementations make exactly one outbound call per request.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Sends the request and returns the assistant's raw text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError>;
}

/// Request for one completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// System instruction, history and the new user message, in order.
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request with the default generation budget.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Shapes the message sequence for one conversational turn.
    ///
    /// Chat-completions services reject sequences that do not strictly
    /// alternate after the system message, so:
    /// - the app's welcome turn and empty turns are dropped
    /// - only the last [`HISTORY_WINDOW`] turns are considered
    /// - a leading assistant turn is skipped
    /// - a turn with the same role as the one before it is skipped
    /// - a trailing user turn is dropped in favour of the new message
    pub fn for_turn(instruction: impl Into<String>, history: &[ChatTurn], user_text: &str) -> Self {
        let eligible: Vec<&ChatTurn> = history
            .iter()
            .filter(|turn| !turn.is_welcome() && !turn.content.trim().is_empty())
            .collect();
        let window = &eligible[eligible.len().saturating_sub(HISTORY_WINDOW)..];

        let mut included: Vec<Message> = Vec::with_capacity(window.len());
        for turn in window {
            let role = MessageRole::from(turn.sender);
            let previous = included.last().map(|m| m.role);

            if previous.is_none() && role == MessageRole::Assistant {
                continue;
            }
            if previous == Some(role) {
                continue;
            }
            included.push(Message::new(role, turn.content.clone()));
        }

        if included.last().map(|m| m.role) == Some(MessageRole::User) {
            included.pop();
        }

        let mut messages = Vec::with_capacity(included.len() + 2);
        messages.push(Message::system(instruction));
        messages.extend(included);
        messages.push(Message::user(user_text));

        tracing::debug!(
            roles = ?messages.iter().map(|m| m.role).collect::<Vec<_>>(),
            "Completion request shaped"
        );

        Self::new(messages)
    }
}

/// A message in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<Sender> for MessageRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => MessageRole::User,
            Sender::Assistant => MessageRole::Assistant,
        }
    }
}

/// Completion gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Upstream {
        status: u16,
        body: String,
    },
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// HTTP status, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(_) => None,
            Self::Upstream { status, .. } => Some(*status),
        }
    }
}
