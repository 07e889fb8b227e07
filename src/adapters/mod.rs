//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completions gateways (HTTP, mock)

pub mod ai;

pub use ai::{ChatCompletionsConfig, ChatCompletionsGateway, MockCompletionGateway};
