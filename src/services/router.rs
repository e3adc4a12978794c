use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use crate::credentials::Credentials;
use crate::domains::envelope::{RequestContext, RequestEnvelope};
use crate::domains::service::{DecodeError, ServiceRequest};
use crate::error::Result;
use crate::interfaces::adapters::ServiceAdapter;
use crate::interfaces::reply::ReplyChannel;
use crate::providers::ai::AiAdapter;
use crate::providers::autocomplete::AutocompleteAdapter;
use crate::providers::geocode::GeocodeAdapter;
use crate::providers::nws::NwsAdapter;

/// Sends every request to exactly one adapter, or answers it with an error.
pub struct ServiceRouter {
    geocode: GeocodeAdapter,
    autocomplete: AutocompleteAdapter,
    nws: NwsAdapter,
    ai: AiAdapter,
    credentials: Arc<Credentials>,
    reply: Arc<dyn ReplyChannel>,
}

impl ServiceRouter {
    pub fn new(
        geocode: GeocodeAdapter,
        autocomplete: AutocompleteAdapter,
        nws: NwsAdapter,
        ai: AiAdapter,
        credentials: Arc<Credentials>,
        reply: Arc<dyn ReplyChannel>,
    ) -> Self {
        Self {
            geocode,
            autocomplete,
            nws,
            ai,
            credentials,
            reply,
        }
    }

    /// Decodes one raw message and dispatches it.
    pub async fn handle_message(&self, raw: &[u8]) -> Result<()> {
        match RequestEnvelope::decode(raw) {
            Ok(envelope) => self.dispatch(envelope).await,
            Err(err) => {
                let request = Value::String(String::from_utf8_lossy(raw).into_owned());
                let ctx = RequestContext::new("", request, Instant::now());
                warn!("rejecting undecodable message: {err}");
                self.reply
                    .send(ctx.failure(err.failure_point(), &err))
                    .await
            }
        }
    }

    pub async fn dispatch(&self, envelope: RequestEnvelope) -> Result<()> {
        let ctx = RequestContext::from_envelope(&envelope);
        let request = match ServiceRequest::try_from(&envelope) {
            Ok(request) => request,
            Err(err) => return self.reject(&ctx, err).await,
        };
        drop(envelope);
        info!(service = ctx.service(), "dispatching request");

        let reply = self.reply.as_ref();
        match request {
            ServiceRequest::Geocoding(address) => self.geocode.handle(&ctx, address, reply).await,
            ServiceRequest::Autocomplete(query) => {
                self.autocomplete.handle(&ctx, query, reply).await
            }
            ServiceRequest::Nws(coordinates) => self.nws.handle(&ctx, coordinates, reply).await,
            ServiceRequest::Ai(chat) => self.ai.handle(&ctx, chat, reply).await,
            ServiceRequest::UpdateCredential(target, key) => {
                self.credentials.set(target, key).await;
                info!(credential = ?target, "api key updated");
                reply.send(ctx.success(Value::Bool(true))).await
            }
        }
    }

    async fn reject(&self, ctx: &RequestContext, err: DecodeError) -> Result<()> {
        let point = err.failure_point();
        warn!(service = ctx.service(), failure_point = %point, "rejecting request: {err}");
        self.reply.send(ctx.failure(point, &err)).await
    }
}
