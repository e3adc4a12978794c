use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domains::envelope::{FailurePoint, RequestContext};
use crate::error::{GatewayError, Result};
use crate::interfaces::reply::ReplyChannel;

/// One external API behind the router.
///
/// `call` talks to the upstream and returns the normalized `response` value;
/// `handle` turns that outcome into exactly one reply.
#[async_trait]
pub trait ServiceAdapter: Send + Sync {
    type Payload: Send + 'static;

    fn failure_point(&self) -> FailurePoint;

    fn classify(&self, err: &GatewayError) -> FailurePoint {
        match err {
            GatewayError::MissingCredential(_) => FailurePoint::Api,
            _ => self.failure_point(),
        }
    }

    async fn call(&self, payload: Self::Payload) -> Result<Value>;

    async fn handle(
        &self,
        ctx: &RequestContext,
        payload: Self::Payload,
        reply: &dyn ReplyChannel,
    ) -> Result<()> {
        let envelope = match self.call(payload).await {
            Ok(response) => ctx.success(response),
            Err(err) => {
                let point = self.classify(&err);
                warn!(service = ctx.service(), failure_point = %point, "adapter failed: {err}");
                ctx.failure(point, &err)
            }
        };
        reply.send(envelope).await
    }
}
