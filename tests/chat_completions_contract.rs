//! Chat-completions Gateway Contract Tests
//!
//! These tests verify the HTTP exchange with an OpenAI-compatible endpoint:
//! - Request body carries model, messages and generation budget
//! - The API key travels as a bearer token
//! - Non-success statuses and unreachable hosts map to GatewayError
//! - Assistant content is extracted from the completion envelope

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adhd_companion::adapters::ai::{ChatCompletionsConfig, ChatCompletionsGateway};
use adhd_companion::domain::chatbot::ChatTurn;
use adhd_companion::ports::{CompletionGateway, CompletionRequest, GatewayError};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ENDPOINT: &str = "/chat/completions";

fn gateway_for(server: &MockServer) -> ChatCompletionsGateway {
    let config = ChatCompletionsConfig::new("test-key")
        .with_base_url(format!("{}{}", server.uri(), ENDPOINT))
        .with_timeout(Duration::from_secs(5));
    ChatCompletionsGateway::new(config).unwrap()
}

/// A local address nothing is listening on.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn envelope(content: &str) -> serde_json::Value {
    json!({
        "id": "test",
        "model": "sonar",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

// =============================================================================
// Request Format
// =============================================================================

#[tokio::test]
async fn test_request_includes_model_messages_and_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({
            "model": "sonar",
            "max_tokens": 300,
            "messages": [
                {"role": "system", "content": "be kind"},
                {"role": "user", "content": "I'm stuck"},
                {"role": "assistant", "content": "Let's look together."},
                {"role": "user", "content": "Where do I start?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let history = vec![
        ChatTurn::welcome("Hi! I'm here to help."),
        ChatTurn::user("I'm stuck"),
        ChatTurn::assistant("Let's look together."),
    ];
    let request = CompletionRequest::for_turn("be kind", &history, "Where do I start?");

    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result, Ok("ok".to_string()));
}

#[tokio::test]
async fn test_request_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("authorized")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result.unwrap(), "authorized");
}

// =============================================================================
// Response Handling
// =============================================================================

#[tokio::test]
async fn test_returns_json_content_verbatim() {
    let mock_server = MockServer::start().await;
    let content = r#"{"reply": "Try a 5-minute sprint.", "followUpOptions": []}"#;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(content)))
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result.unwrap(), content);
}

#[tokio::test]
async fn test_missing_content_is_empty_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result.unwrap(), "");
}

#[tokio::test]
async fn test_non_envelope_body_is_returned_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("just some words"))
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result.unwrap(), "just some words");
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_server_error_maps_to_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway_for(&mock_server).complete(request).await;
    assert_eq!(result, Err(GatewayError::upstream(500, "internal error")));
}

#[tokio::test]
async fn test_auth_error_maps_to_upstream_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let err = gateway_for(&mock_server).complete(request).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_network() {
    let uri = closed_port_uri();

    let config = ChatCompletionsConfig::new("test-key")
        .with_base_url(format!("{}{}", uri, ENDPOINT))
        .with_timeout(Duration::from_secs(2));
    let gateway = ChatCompletionsGateway::new(config).unwrap();

    let request = CompletionRequest::for_turn("sys", &[], "hi");
    let result = gateway.complete(request).await;
    assert!(matches!(result, Err(GatewayError::Network(_))), "got {:?}", result);
}
