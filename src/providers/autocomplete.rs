use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::credentials::Credentials;
use crate::domains::envelope::FailurePoint;
use crate::domains::service::CredentialTarget;
use crate::error::{GatewayError, Result};
use crate::interfaces::adapters::ServiceAdapter;
use crate::providers::{http_error, read_json};

pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";
pub const PRIMARY_TYPES: &str = "(cities)";

pub struct AutocompleteAdapter {
    http: reqwest::Client,
    endpoint: String,
    credentials: Arc<Credentials>,
}

impl AutocompleteAdapter {
    pub fn new(http: reqwest::Client, endpoint: String, credentials: Arc<Credentials>) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    fn suggestion_text(suggestion: &Value) -> Option<&str> {
        ["placePrediction", "queryPrediction"]
            .iter()
            .find_map(|kind| suggestion.get(*kind))
            .and_then(|prediction| prediction.get("text"))
            .and_then(|text| text.get("text"))
            .and_then(|text| text.as_str())
    }

    /// Ordered display texts, or `[false]` when the upstream has no suggestions.
    pub fn normalize(body: &Value) -> Result<Value> {
        let Some(suggestions) = body.get("suggestions") else {
            return Ok(json!([false]));
        };
        let suggestions = suggestions.as_array().ok_or_else(|| {
            GatewayError::Serialization("suggestions is not a list".to_string())
        })?;
        let texts = suggestions
            .iter()
            .map(|suggestion| {
                Self::suggestion_text(suggestion)
                    .map(|text| Value::String(text.to_string()))
                    .ok_or_else(|| {
                        GatewayError::Serialization(
                            "suggestion has no prediction text".to_string(),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(texts))
    }
}

#[async_trait]
impl ServiceAdapter for AutocompleteAdapter {
    type Payload = String;

    fn failure_point(&self) -> FailurePoint {
        FailurePoint::Autocomplete
    }

    async fn call(&self, query: String) -> Result<Value> {
        let key = self.credentials.get(CredentialTarget::Google).await?;
        let payload = json!({"input": query, "includedPrimaryTypes": PRIMARY_TYPES});
        debug!(endpoint = %self.endpoint, payload = %payload, "calling autocomplete api");

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, key)
            .json(&payload)
            .send()
            .await
            .map_err(http_error)?;
        let body = read_json(response).await?;
        Self::normalize(&body)
    }
}
