//! Backend client and chat fallback tests against a mocked HTTP server.

use chrono::NaiveTime;
use daymate_core::backend::BackendClient;
use daymate_core::chat::{ChatSession, FALLBACK_REPLY, GREETING};
use daymate_core::storage::{BackendConfig, Config};
use daymate_core::{BackendError, Responder};
use mockito::Matcher;
use serde_json::json;

fn backend_config(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        timeout_ms: 2_000,
        max_retries: 2,
        ..BackendConfig::default()
    }
}

fn remote_session(base_url: &str) -> ChatSession {
    let client = BackendClient::new(backend_config(base_url)).unwrap();
    ChatSession::remote(client, Responder::seeded(1))
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

#[tokio::test]
async fn chat_posts_message_and_history() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "message": "What is Rust?",
            "history": ["earlier"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": "A language.", "suggestions": ["Tell me more"]}"#)
        .create_async()
        .await;

    let client = BackendClient::new(backend_config(&server.url())).unwrap();
    let resp = client
        .chat("What is Rust?", &["earlier".to_string()])
        .await
        .unwrap();

    assert_eq!(resp.response, "A language.");
    assert_eq!(resp.suggestions, Some(vec!["Tell me more".to_string()]));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body(r#"{"error": "Internal server error"}"#)
        .create_async()
        .await;

    let client = BackendClient::new(backend_config(&server.url())).unwrap();
    let err = client.chat("hi", &[]).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 500 }));
}

#[tokio::test]
async fn suggestions_endpoint_returns_chips() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/suggestions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": ["What can you help me with?", "How do I stay productive?"]}"#)
        .create_async()
        .await;

    let client = BackendClient::new(backend_config(&server.url())).unwrap();
    let chips = client.suggestions().await.unwrap();
    assert_eq!(chips, vec!["What can you help me with?", "How do I stay productive?"]);
}

#[tokio::test]
async fn health_retries_until_success_budget_is_spent() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("GET", "/health")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = BackendClient::new(backend_config(&server.url())).unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 503 }));
    failing.assert_async().await;
}

#[tokio::test]
async fn health_reports_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "healthy", "model_loaded": true, "message": "running"}"#)
        .create_async()
        .await;

    let client = BackendClient::new(backend_config(&server.url())).unwrap();
    let status = client.health().await.unwrap();
    assert!(status.is_healthy());
    assert_eq!(status.model_loaded, Some(true));
}

#[tokio::test]
async fn session_uses_backend_reply() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .match_body(Matcher::PartialJson(json!({"history": [GREETING]})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": "Sure thing."}"#)
        .create_async()
        .await;

    let mut session = remote_session(&server.url());
    let reply = session.send_at("hello", noon()).await.unwrap();
    assert_eq!(reply.text, "Sure thing.");
    assert!(reply.suggestions.is_empty());
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn session_history_is_limited_to_window() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .match_body(Matcher::Regex(r#""message":"(one|two|three)""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": "ok"}"#)
        .expect(3)
        .create_async()
        .await;
    let last = server
        .mock("POST", "/chat")
        .match_body(Matcher::Json(json!({
            "message": "four",
            "history": ["ok", "two", "ok", "three", "ok"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response": "done"}"#)
        .create_async()
        .await;

    let mut session = remote_session(&server.url());
    for text in ["one", "two", "three"] {
        session.send_at(text, noon()).await.unwrap();
    }
    let reply = session.send_at("four", noon()).await.unwrap();
    assert_eq!(reply.text, "done");
    last.assert_async().await;
}

#[tokio::test]
async fn unreachable_backend_yields_fallback_reply() {
    // Nothing listens on port 1.
    let mut session = remote_session("http://127.0.0.1:1");
    let reply = session.send_at("hello", noon()).await.unwrap();
    assert_eq!(reply.text, FALLBACK_REPLY);
    assert_eq!(reply.suggestions, vec!["Try again", "Check connection", "Restart backend"]);
}

#[tokio::test]
async fn server_error_yields_fallback_reply() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(500)
        .create_async()
        .await;

    let mut session = remote_session(&server.url());
    let reply = session.send_at("hello", noon()).await.unwrap();
    assert_eq!(reply.text, FALLBACK_REPLY);
}

#[tokio::test]
async fn initial_suggestions_replace_greeting_chips() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/suggestions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"suggestions": ["A", "B"]}"#)
        .create_async()
        .await;

    let mut session = remote_session(&server.url());
    assert_eq!(session.load_initial_suggestions().await, vec!["A", "B"]);
    assert_eq!(session.messages()[0].suggestions, vec!["A", "B"]);
}

#[tokio::test]
async fn failed_initial_suggestions_keep_defaults() {
    let mut session = remote_session("http://127.0.0.1:1");
    let chips = session.load_initial_suggestions().await;
    assert_eq!(
        chips,
        vec!["Help me plan my day", "What should I focus on?", "Track my habits"]
    );
}

#[tokio::test]
async fn session_from_config_respects_use_backend() {
    let mut config = Config::default();
    config.assistant.use_backend = false;
    config.assistant.min_delay_ms = 0;
    config.assistant.max_delay_ms = 0;
    config.assistant.seed = Some(4);

    let mut session = ChatSession::from_config(&config).unwrap();
    assert!(!session.is_remote());
    let reply = session.send_at("set an alarm", noon()).await.unwrap();
    assert_eq!(
        reply.suggestions,
        vec!["Set 7 AM alarm", "Set 8 AM alarm", "Set smart alarm", "View alarms"]
    );
}
