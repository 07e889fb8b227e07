//! Mock Completion Gateway for testing.
//!
//! Lets tests script what the completion service says without any network.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockCompletionGateway::new()
//!     .with_response(r#"{"reply": "You've got this!"}"#)
//!     .with_error(MockError::Network { message: "offline".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{CompletionGateway, CompletionRequest, GatewayError};

/// Text returned once the scripted queue is empty.
pub const DEFAULT_MOCK_REPLY: &str = r#"{"reply": "Mock reply"}"#;

/// Mock completion gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionGateway {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this raw text.
    Success(String),
    /// Fail the call.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate an unreachable service.
    Network { message: String },
    /// Simulate a non-success HTTP status.
    Upstream { status: u16, body: String },
}

impl From<MockError> for GatewayError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Network { message } => GatewayError::network(message),
            MockError::Upstream { status, body } => GatewayError::upstream(status, body),
        }
    }
}

impl MockCompletionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Returns the number of calls made to this gateway.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the most recent call, if any.
    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success(DEFAULT_MOCK_REPLY.to_string()))
    }
}

#[async_trait]
impl CompletionGateway for MockCompletionGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request);

        match self.next_response() {
            MockResponse::Success(content) => Ok(content),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}
