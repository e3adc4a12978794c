use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domains::envelope::FailurePoint;
use crate::domains::service::Coordinates;
use crate::error::Result;
use crate::interfaces::adapters::ServiceAdapter;
use crate::providers::{http_error, read_json};

/// Forwards the weather service's `/points/{lat},{lng}` document untouched.
pub struct NwsAdapter {
    http: reqwest::Client,
    base_url: String,
}

impl NwsAdapter {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    pub fn points_url(&self, coordinates: Coordinates) -> String {
        format!("{}/points/{coordinates}", self.base_url)
    }
}

#[async_trait]
impl ServiceAdapter for NwsAdapter {
    type Payload = Coordinates;

    fn failure_point(&self) -> FailurePoint {
        FailurePoint::Nws
    }

    async fn call(&self, coordinates: Coordinates) -> Result<Value> {
        let url = self.points_url(coordinates);
        debug!(url = %url, "calling nws points api");
        let response = self.http.get(&url).send().await.map_err(http_error)?;
        read_json(response).await
    }
}
