mod common;

use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::{json, Value};

use common::{assert_error, config_for, config_with_timeout, config_without_keys, Harness};

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn ai_end_to_end_returns_first_choice_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains("test-model")
                .body_contains("\"hi\"");
            then.status(200).json_body(completion("hello"));
        })
        .await;

    let harness = Harness::new(config_for(&server.base_url()));
    let request = json!({"service": "ai", "data": {"role": "user", "model": "test-model", "content": "hi"}});
    let reply = harness.send(request.clone()).await;

    assert!(!reply.is_error(), "reply: {reply:?}");
    assert_eq!(reply.service, "ai");
    assert_eq!(reply.request, request);
    assert_eq!(reply.response, json!("hello"));
    assert!(reply.time_taken.is_some());
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn ai_accepts_roll_spelling_and_system_role() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("ok"));
        })
        .await;

    let harness = Harness::new(config_for(&server.base_url()));
    let reply = harness
        .send(json!({"service": "ai", "data": {"roll": "system", "model": "test-model", "content": "be brief"}}))
        .await;

    assert_eq!(reply.response, json!("ok"));
}

#[tokio::test]
async fn ai_malformed_request_is_an_ai_error_without_upstream_call() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("unused"));
        })
        .await;

    let harness = Harness::new(config_for(&server.base_url()));
    let missing_model = harness
        .send(json!({"service": "ai", "data": {"role": "user", "content": "hi"}}))
        .await;
    assert_error(&missing_model, "ai");

    let bad_role = harness
        .send(json!({"service": "ai", "data": {"role": "narrator", "model": "m", "content": "hi"}}))
        .await;
    assert_error(&bad_role, "ai");

    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn ai_upstream_failure_is_an_ai_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).json_body(json!({
                "error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}
            }));
        })
        .await;

    let harness = Harness::new(config_for(&server.base_url()));
    let reply = harness
        .send(json!({"service": "ai", "data": {"role": "user", "model": "test-model", "content": "hi"}}))
        .await;

    assert_error(&reply, "ai");
}

#[tokio::test]
async fn ai_without_key_is_an_api_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("unused"));
        })
        .await;

    let harness = Harness::new(config_without_keys(&server.base_url()));
    let reply = harness
        .send(json!({"service": "ai", "data": {"role": "user", "model": "test-model", "content": "hi"}}))
        .await;

    assert_error(&reply, "api");
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn ai_slow_upstream_times_out_as_ai_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(completion("too late"));
        })
        .await;

    let harness = Harness::new(config_with_timeout(&server.base_url(), 1));
    let reply = harness
        .send(json!({"service": "ai", "data": {"role": "user", "model": "test-model", "content": "hi"}}))
        .await;

    assert_error(&reply, "ai");
    assert!(reply.response.as_str().unwrap().contains("timed out"), "reply: {reply:?}");
}
