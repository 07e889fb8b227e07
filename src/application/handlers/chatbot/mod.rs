//! Chatbot Command Handlers
//!
//! ## Commands
//! - `Respond` - Classify a user message, ask the completion service, return a reply

mod respond;

pub use respond::{RespondCommand, RespondHandler};
