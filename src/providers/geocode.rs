use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::domains::envelope::FailurePoint;
use crate::domains::service::CredentialTarget;
use crate::error::{GatewayError, Result};
use crate::interfaces::adapters::ServiceAdapter;
use crate::providers::{http_error, read_json};

pub const MAX_ATTEMPTS: u32 = 4;

/// Resolves a place string to a `[lat, lng]` pair.
///
/// A non-`OK` status is retried with the same address up to `MAX_ATTEMPTS`
/// calls in total. Transport and decode failures are not retried.
pub struct GeocodeAdapter {
    http: reqwest::Client,
    endpoint: String,
    credentials: Arc<Credentials>,
}

impl GeocodeAdapter {
    pub fn new(http: reqwest::Client, endpoint: String, credentials: Arc<Credentials>) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    /// Spaces become `+`; everything else is percent-encoded.
    pub fn encode_address(address: &str) -> String {
        address
            .split(' ')
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join("+")
    }

    fn request_url(&self, address: &str, key: &str) -> String {
        format!(
            "{}?address={}&key={}",
            self.endpoint,
            Self::encode_address(address),
            urlencoding::encode(key)
        )
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await.map_err(http_error)?;
        read_json(response).await
    }

    fn extract_location(body: &Value) -> Result<Value> {
        let location = body
            .get("results")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("geometry"))
            .and_then(|v| v.get("location"))
            .ok_or_else(|| {
                GatewayError::Serialization("geocode result has no location".to_string())
            })?;
        let lat = location.get("lat").and_then(|v| v.as_f64());
        let lng = location.get("lng").and_then(|v| v.as_f64());
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(json!([lat, lng])),
            _ => Err(GatewayError::Serialization(
                "geocode location is missing lat/lng".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ServiceAdapter for GeocodeAdapter {
    type Payload = String;

    fn failure_point(&self) -> FailurePoint {
        FailurePoint::Geocoding
    }

    fn classify(&self, err: &GatewayError) -> FailurePoint {
        match err {
            GatewayError::MissingCredential(_) => FailurePoint::Api,
            GatewayError::RetriesExhausted { .. } => FailurePoint::GeocodingTimeout,
            _ => FailurePoint::Geocoding,
        }
    }

    async fn call(&self, address: String) -> Result<Value> {
        let key = self.credentials.get(CredentialTarget::Google).await?;
        let url = self.request_url(&address, &key);
        debug!(address = %address, endpoint = %self.endpoint, "calling geocoding api");

        let mut last_status = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let body = self.fetch(&url).await?;
            let status = body
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            if status == "OK" {
                return Self::extract_location(&body);
            }
            last_status = status.to_string();
            warn!(attempt, status = %last_status, "geocoding request failed, retrying");
        }

        Err(GatewayError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
            last_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_spaces_become_plus() {
        assert_eq!(
            GeocodeAdapter::encode_address("San Diego, CA, USA"),
            "San+Diego%2C+CA%2C+USA"
        );
    }

    #[test]
    fn location_is_read_from_the_first_result() {
        let body = json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 32.7157, "lng": -117.1611}}},
                {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
            ]
        });
        assert_eq!(
            GeocodeAdapter::extract_location(&body).unwrap(),
            json!([32.7157, -117.1611])
        );
    }

    #[test]
    fn ok_status_without_results_is_a_decode_error() {
        let err = GeocodeAdapter::extract_location(&json!({"status": "OK", "results": []}))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Serialization(_)));
    }
}
