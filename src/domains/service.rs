use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domains::envelope::{FailurePoint, RequestEnvelope};

pub const GEOCODING: &str = "geocoding";
pub const AUTOCOMPLETE: &str = "autocomplete";
pub const NWS: &str = "nws";
pub const AI: &str = "ai";
pub const UPDATE_GOOGLE_API_KEY: &str = "update_google_api_key";
pub const UPDATE_AI_API_KEY: &str = "update_ai_api_key";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl<'de> Deserialize<'de> for Coordinates {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (lat, lng) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self { lat, lng })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "roll")]
    pub role: ChatRole,
    pub model: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTarget {
    Google,
    Ai,
}

/// An inbound request with its payload checked against the tag's contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    Geocoding(String),
    Autocomplete(String),
    Nws(Coordinates),
    Ai(ChatRequest),
    UpdateCredential(CredentialTarget, String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("message is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("request has no service tag")]
    MissingService,
    #[error("unrecognized service '{0}'")]
    UnknownService(String),
    #[error("malformed '{service}' payload: {reason}")]
    MalformedPayload {
        service: String,
        point: FailurePoint,
        reason: String,
    },
}

impl DecodeError {
    pub fn failure_point(&self) -> FailurePoint {
        match self {
            DecodeError::InvalidJson(_)
            | DecodeError::MissingService
            | DecodeError::UnknownService(_) => FailurePoint::Parser,
            DecodeError::MalformedPayload { point, .. } => *point,
        }
    }
}

fn payload<T>(service: &str, point: FailurePoint, data: &Value) -> Result<T, DecodeError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(data).map_err(|e| DecodeError::MalformedPayload {
        service: service.to_string(),
        point,
        reason: e.to_string(),
    })
}

fn api_key(service: &str, data: &Value) -> Result<String, DecodeError> {
    let key: String = payload(service, FailurePoint::Api, data)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(DecodeError::MalformedPayload {
            service: service.to_string(),
            point: FailurePoint::Api,
            reason: "api key is empty".to_string(),
        });
    }
    Ok(key.to_string())
}

impl TryFrom<&RequestEnvelope> for ServiceRequest {
    type Error = DecodeError;

    fn try_from(envelope: &RequestEnvelope) -> Result<Self, Self::Error> {
        let service = envelope.service().ok_or(DecodeError::MissingService)?;
        let data = envelope.data();
        match service {
            GEOCODING => Ok(Self::Geocoding(payload(service, FailurePoint::Geocoding, data)?)),
            AUTOCOMPLETE => Ok(Self::Autocomplete(payload(
                service,
                FailurePoint::Autocomplete,
                data,
            )?)),
            NWS => Ok(Self::Nws(payload(service, FailurePoint::Nws, data)?)),
            AI => Ok(Self::Ai(payload(service, FailurePoint::Ai, data)?)),
            UPDATE_GOOGLE_API_KEY => Ok(Self::UpdateCredential(
                CredentialTarget::Google,
                api_key(service, data)?,
            )),
            UPDATE_AI_API_KEY | "update_openai_api_key" | "update_anthropic_api_key" => Ok(
                Self::UpdateCredential(CredentialTarget::Ai, api_key(service, data)?),
            ),
            other => Err(DecodeError::UnknownService(other.to_string())),
        }
    }
}
