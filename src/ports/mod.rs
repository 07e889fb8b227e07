//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Completion Ports
//!
//! - `CompletionGateway` - One-shot call to a chat-completions service

mod completion_gateway;

pub use completion_gateway::{
    CompletionGateway, CompletionRequest, GatewayError, Message, MessageRole, HISTORY_WINDOW,
    MAX_TOKENS, TEMPERATURE,
};
