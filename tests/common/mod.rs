#![allow(dead_code)]

use std::sync::Arc;

use serde_json::Value;

use service_gateway::config::{AiConfig, Config, GoogleConfig, HttpConfig, NwsConfig};
use service_gateway::domains::envelope::ReplyEnvelope;
use service_gateway::services::reply::MemoryReplyChannel;
use service_gateway::{GatewayFactory, ServiceRouter};

pub const GOOGLE_KEY: &str = "google-key";
pub const AI_KEY: &str = "ai-key";
pub const GEOCODE_PATH: &str = "/maps/api/geocode/json";
pub const AUTOCOMPLETE_PATH: &str = "/v1/places:autocomplete";

/// Points every upstream at `base_url` with both keys set.
pub fn config_for(base_url: &str) -> Config {
    Config {
        server: None,
        google: Some(GoogleConfig {
            api_key: Some(GOOGLE_KEY.to_string()),
            geocode_url: Some(format!("{base_url}{GEOCODE_PATH}")),
            autocomplete_url: Some(format!("{base_url}{AUTOCOMPLETE_PATH}")),
        }),
        nws: Some(NwsConfig {
            base_url: Some(base_url.to_string()),
        }),
        ai: Some(AiConfig {
            api_key: Some(AI_KEY.to_string()),
            base_url: Some(base_url.to_string()),
        }),
        http: Some(HttpConfig {
            timeout_seconds: Some(5),
            user_agent: None,
        }),
    }
}

pub fn config_with_timeout(base_url: &str, timeout_seconds: u64) -> Config {
    let mut config = config_for(base_url);
    if let Some(http) = config.http.as_mut() {
        http.timeout_seconds = Some(timeout_seconds);
    }
    config
}

pub fn config_without_keys(base_url: &str) -> Config {
    let mut config = config_for(base_url);
    if let Some(google) = config.google.as_mut() {
        google.api_key = None;
    }
    if let Some(ai) = config.ai.as_mut() {
        ai.api_key = None;
    }
    config
}

pub struct Harness {
    pub router: ServiceRouter,
    pub replies: Arc<MemoryReplyChannel>,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        let replies = Arc::new(MemoryReplyChannel::new());
        let router = GatewayFactory::create_from_config(&config, replies.clone()).unwrap();
        Self { router, replies }
    }

    /// Sends one raw message and returns the single reply it produced.
    pub async fn send_raw(&self, raw: &[u8]) -> ReplyEnvelope {
        self.router.handle_message(raw).await.unwrap();
        let mut replies = self.replies.take().await;
        assert_eq!(replies.len(), 1, "expected exactly one reply, got {replies:?}");
        replies.remove(0)
    }

    pub async fn send(&self, request: Value) -> ReplyEnvelope {
        self.send_raw(request.to_string().as_bytes()).await
    }
}

/// Serves `app` on an ephemeral local port and returns its base url.
pub async fn spawn_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn assert_error(reply: &ReplyEnvelope, failure_point: &str) {
    assert_eq!(reply.error.as_deref(), Some(failure_point), "reply: {reply:?}");
    assert!(reply.time_taken.is_none());
    let text = reply.response.as_str().unwrap();
    assert!(text.contains(failure_point), "response: {text}");
}
