//! Completion Gateway Adapters.
//!
//! Implementations of the CompletionGateway port.
//!
//! ## Available Adapters
//!
//! - `ChatCompletionsGateway` - OpenAI-compatible chat-completions endpoint (Perplexity by default)
//! - `MockCompletionGateway` - Scriptable mock for testing

mod chat_completions_gateway;
mod mock_gateway;

pub use chat_completions_gateway::{
    ChatCompletionsConfig, ChatCompletionsGateway, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TIMEOUT,
};
pub use mock_gateway::{MockCompletionGateway, MockError, MockResponse, DEFAULT_MOCK_REPLY};
