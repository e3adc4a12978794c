use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domains::envelope::ReplyEnvelope;
use crate::error::Result;
use crate::interfaces::reply::ReplyChannel;

/// Keeps every reply in memory, in send order.
#[derive(Debug, Default)]
pub struct MemoryReplyChannel {
    replies: Mutex<Vec<ReplyEnvelope>>,
}

impl MemoryReplyChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn take(&self) -> Vec<ReplyEnvelope> {
        std::mem::take(&mut *self.replies.lock().await)
    }
}

#[async_trait]
impl ReplyChannel for MemoryReplyChannel {
    async fn send(&self, reply: ReplyEnvelope) -> Result<()> {
        self.replies.lock().await.push(reply);
        Ok(())
    }
}
