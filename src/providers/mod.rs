pub mod ai;
pub mod autocomplete;
pub mod geocode;
pub mod nws;

use crate::config::Config;
use crate::error::{GatewayError, Result};

pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent())
        .build()
        .map_err(|e| GatewayError::Http(e.to_string()))
}

pub(crate) fn http_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else {
        GatewayError::Http(err.to_string())
    }
}

pub(crate) async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    response
        .json()
        .await
        .map_err(|e| GatewayError::Serialization(e.to_string()))
}
