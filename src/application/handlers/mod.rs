//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod chatbot;

pub use chatbot::{RespondCommand, RespondHandler};
