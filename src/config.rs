use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{GatewayError, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5559;
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_AUTOCOMPLETE_URL: &str = "https://places.googleapis.com/v1/places:autocomplete";
pub const DEFAULT_NWS_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_AI_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_USER_AGENT: &str = concat!("service-gateway/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub geocode_url: Option<String>,
    pub autocomplete_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NwsConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: Option<ServerConfig>,
    pub google: Option<GoogleConfig>,
    pub nws: Option<NwsConfig>,
    pub ai: Option<AiConfig>,
    pub http: Option<HttpConfig>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| GatewayError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Replaces the file's API keys with the given ones; blank values are ignored.
    pub fn with_keys(mut self, google: Option<String>, ai: Option<String>) -> Self {
        if let Some(key) = non_empty(google.as_ref()) {
            self.google.get_or_insert_with(GoogleConfig::default).api_key = Some(key);
        }
        if let Some(key) = non_empty(ai.as_ref()) {
            self.ai.get_or_insert_with(AiConfig::default).api_key = Some(key);
        }
        self
    }

    /// Fills API keys the file left out from the process environment.
    pub fn resolve_env(self) -> Self {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup_key = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| non_empty(lookup(*name).as_ref()))
        };

        let google = self.google.get_or_insert_with(GoogleConfig::default);
        if non_empty(google.api_key.as_ref()).is_none() {
            google.api_key = lookup_key(&["GOOGLE_API_KEY"]);
        }
        let ai = self.ai.get_or_insert_with(AiConfig::default);
        if non_empty(ai.api_key.as_ref()).is_none() {
            ai.api_key = lookup_key(&["AI_API_KEY", "GROQ_API_KEY"]);
        }
        self
    }

    pub fn bind_endpoint(&self) -> String {
        let server = self.server.clone().unwrap_or_default();
        let host = non_empty(server.host.as_ref()).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = server.port.unwrap_or(DEFAULT_PORT);
        format!("tcp://{host}:{port}")
    }

    pub fn google_api_key(&self) -> Option<String> {
        non_empty(self.google.as_ref().and_then(|g| g.api_key.as_ref()))
    }

    pub fn ai_api_key(&self) -> Option<String> {
        non_empty(self.ai.as_ref().and_then(|a| a.api_key.as_ref()))
    }

    pub fn geocode_url(&self) -> String {
        non_empty(self.google.as_ref().and_then(|g| g.geocode_url.as_ref()))
            .unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_string())
    }

    pub fn autocomplete_url(&self) -> String {
        non_empty(self.google.as_ref().and_then(|g| g.autocomplete_url.as_ref()))
            .unwrap_or_else(|| DEFAULT_AUTOCOMPLETE_URL.to_string())
    }

    pub fn nws_base_url(&self) -> String {
        non_empty(self.nws.as_ref().and_then(|n| n.base_url.as_ref()))
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_NWS_BASE_URL.to_string())
    }

    pub fn ai_base_url(&self) -> String {
        non_empty(self.ai.as_ref().and_then(|a| a.base_url.as_ref()))
            .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        let seconds = self
            .http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }

    pub fn user_agent(&self) -> String {
        non_empty(self.http.as_ref().and_then(|h| h.user_agent.as_ref()))
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }
}
