//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `chatbot` - Intents, conversation context, prompts and reply normalization

pub mod chatbot;
