//! ADHD Companion - Supportive Chatbot Pipeline
//!
//! This crate turns one user message plus the conversation so far into a
//! short, structured, supportive reply. The reply text comes from a remote
//! chat-completions service; everything around that call (intent detection,
//! prompt shaping and repair of whatever the model says) lives here.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
