use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::interfaces::reply::ReplyChannel;
use crate::providers::ai::AiAdapter;
use crate::providers::autocomplete::AutocompleteAdapter;
use crate::providers::build_http_client;
use crate::providers::geocode::GeocodeAdapter;
use crate::providers::nws::NwsAdapter;
use crate::services::router::ServiceRouter;

pub struct GatewayFactory;

impl GatewayFactory {
    /// Wires every adapter from `config` and routes their replies to `reply`.
    pub fn create_from_config(config: &Config, reply: Arc<dyn ReplyChannel>) -> Result<ServiceRouter> {
        let credentials = Arc::new(Credentials::from_config(config));
        if config.google_api_key().is_none() {
            warn!("no google api key configured; geocoding and autocomplete will fail until one is set");
        }
        if config.ai_api_key().is_none() {
            warn!("no ai api key configured; ai requests will fail until one is set");
        }

        let http = build_http_client(config)?;
        let geocode = GeocodeAdapter::new(
            http.clone(),
            config.geocode_url(),
            Arc::clone(&credentials),
        );
        let autocomplete = AutocompleteAdapter::new(
            http.clone(),
            config.autocomplete_url(),
            Arc::clone(&credentials),
        );
        let nws = NwsAdapter::new(http, config.nws_base_url());
        let ai = AiAdapter::new(config.ai_base_url(), config.timeout(), Arc::clone(&credentials));

        Ok(ServiceRouter::new(
            geocode,
            autocomplete,
            nws,
            ai,
            credentials,
            reply,
        ))
    }
}
