// Gemini client tests against a mock HTTP server
// Author: kelexine (https://github.com/kelexine)

use gemconvert::config::GeminiConfig;
use gemconvert::error::ConverterError;
use gemconvert::gemini::{GeminiClient, TextGenerator};
use mockito::{Matcher, Server};

const TEST_KEY: &str = "AIzaTestKey_123";
const ENDPOINT: &str = "/models/gemini-1.5-pro:generateContent";

fn client_for(server: &Server) -> GeminiClient {
    let config = GeminiConfig {
        api_base_url: server.url(),
        api_key: Some(TEST_KEY.to_string()),
        ..GeminiConfig::default()
    };
    GeminiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_generate_returns_candidate_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("x-goog-api-key", TEST_KEY)
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "say hi" }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"```python\nprint('hi')\n```"}]},"finishReason":"STOP"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client.generate("say hi").await.unwrap();

    assert_eq!(text, "```python\nprint('hi')\n```");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_maps_to_remote_call_without_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(400)
        .with_body(r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate("say hi").await.unwrap_err();

    match err {
        ConverterError::RemoteCall(message) => {
            assert!(message.contains("400"));
            assert!(message.contains("API key not valid."));
        }
        other => panic!("expected RemoteCall, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_reported_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(503)
        .with_body("upstream overloaded")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate("say hi").await.unwrap_err();

    assert!(err.is_remote());
    assert!(err.to_string().contains("upstream overloaded"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_echoed_key_is_redacted_from_error() {
    let mut server = Server::new_async().await;
    let body = format!(
        r#"{{"error":{{"code":403,"message":"Key {} is suspended"}}}}"#,
        TEST_KEY
    );
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(403)
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate("say hi").await.unwrap_err();

    assert!(!err.to_string().contains(TEST_KEY));
    assert!(err.to_string().contains("[REDACTED_API_KEY]"));
}

#[tokio::test]
async fn test_response_without_text_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate("say hi").await.unwrap_err();

    assert!(err.is_remote());
    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn test_malformed_success_body_is_remote_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.generate("say hi").await.unwrap_err().is_remote());
}

#[tokio::test]
async fn test_blocked_prompt_reports_block_reason() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"PROHIBITED_CONTENT"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.generate("say hi").await.unwrap_err();

    assert!(err.is_remote());
    assert!(err.to_string().contains("PROHIBITED_CONTENT"));
}
