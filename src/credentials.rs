use tokio::sync::RwLock;

use crate::config::Config;
use crate::domains::service::CredentialTarget;
use crate::error::{GatewayError, Result};

/// API keys shared by the adapters; replaceable at runtime.
#[derive(Default)]
pub struct Credentials {
    google: RwLock<Option<String>>,
    ai: RwLock<Option<String>>,
}

impl Credentials {
    pub fn new(google: Option<String>, ai: Option<String>) -> Self {
        Self {
            google: RwLock::new(google),
            ai: RwLock::new(ai),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.google_api_key(), config.ai_api_key())
    }

    fn slot(&self, target: CredentialTarget) -> &RwLock<Option<String>> {
        match target {
            CredentialTarget::Google => &self.google,
            CredentialTarget::Ai => &self.ai,
        }
    }

    pub async fn get(&self, target: CredentialTarget) -> Result<String> {
        self.slot(target)
            .read()
            .await
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GatewayError::MissingCredential(
                    match target {
                        CredentialTarget::Google => "google api key",
                        CredentialTarget::Ai => "ai api key",
                    }
                    .to_string(),
                )
            })
    }

    pub async fn set(&self, target: CredentialTarget, key: String) {
        *self.slot(target).write().await = Some(key);
    }
}
