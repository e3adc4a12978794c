use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::service::DecodeError;

/// Names the stage that produced an error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    Parser,
    Geocoding,
    GeocodingTimeout,
    Autocomplete,
    Nws,
    Ai,
    Api,
}

impl FailurePoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePoint::Parser => "parser",
            FailurePoint::Geocoding => "geocoding",
            FailurePoint::GeocodingTimeout => "geocoding timeout",
            FailurePoint::Autocomplete => "autocomplete",
            FailurePoint::Nws => "nws",
            FailurePoint::Ai => "ai",
            FailurePoint::Api => "api",
        }
    }
}

impl fmt::Display for FailurePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound message, decoded but not yet interpreted.
///
/// The decoded JSON is kept as received so replies can echo it verbatim.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    original: Value,
    received_at: Instant,
}

impl RequestEnvelope {
    pub fn new(original: Value) -> Self {
        Self {
            original,
            received_at: Instant::now(),
        }
    }

    pub fn decode(raw: &[u8]) -> std::result::Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_slice(raw).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        Ok(Self::new(value))
    }

    pub fn service(&self) -> Option<&str> {
        self.original.get("service").and_then(|v| v.as_str())
    }

    pub fn data(&self) -> &Value {
        self.original.get("data").unwrap_or(&Value::Null)
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub service: String,
    pub request: Value,
    pub response: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
}

impl ReplyEnvelope {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn encode(&self) -> crate::error::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::GatewayError::Serialization(e.to_string()))
    }
}

/// What a reply needs to know about the request it answers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    service: String,
    request: Value,
    received_at: Instant,
}

impl RequestContext {
    pub fn new(service: impl Into<String>, request: Value, received_at: Instant) -> Self {
        Self {
            service: service.into(),
            request,
            received_at,
        }
    }

    pub fn from_envelope(envelope: &RequestEnvelope) -> Self {
        Self::new(
            envelope.service().unwrap_or_default(),
            envelope.original().clone(),
            envelope.received_at(),
        )
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn success(&self, response: Value) -> ReplyEnvelope {
        ReplyEnvelope {
            service: self.service.clone(),
            request: self.request.clone(),
            response,
            error: None,
            time_taken: Some(self.received_at.elapsed().as_secs_f64()),
        }
    }

    pub fn failure(&self, point: FailurePoint, cause: &dyn fmt::Display) -> ReplyEnvelope {
        ReplyEnvelope {
            service: self.service.clone(),
            request: self.request.clone(),
            response: Value::String(format!("request failed at '{point}': {cause}")),
            error: Some(point.as_str().to_string()),
            time_taken: None,
        }
    }
}
