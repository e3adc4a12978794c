use async_trait::async_trait;

use crate::domains::envelope::ReplyEnvelope;
use crate::error::Result;

/// Sends the single reply owed to the caller of the current request.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    async fn send(&self, reply: ReplyEnvelope) -> Result<()>;
}
