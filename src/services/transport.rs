use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::domains::envelope::ReplyEnvelope;
use crate::error::Result;
use crate::interfaces::reply::ReplyChannel;
use crate::services::router::ServiceRouter;

/// Writes replies to the REP socket the current request arrived on.
pub struct ZmqReplyChannel {
    socket: Arc<Mutex<RepSocket>>,
}

#[async_trait]
impl ReplyChannel for ZmqReplyChannel {
    async fn send(&self, reply: ReplyEnvelope) -> Result<()> {
        let payload = reply.encode()?;
        let mut socket = self.socket.lock().await;
        socket.send(ZmqMessage::from(payload)).await?;
        Ok(())
    }
}

/// REP socket loop: one message in, one reply out, strictly in turn.
pub struct ZmqTransport {
    socket: Arc<Mutex<RepSocket>>,
    endpoint: String,
}

impl ZmqTransport {
    pub async fn bind(endpoint: &str) -> Result<Self> {
        let mut socket = RepSocket::new();
        let bound = socket.bind(endpoint).await?;
        info!("listening on {bound}");
        Ok(Self {
            socket: Arc::new(Mutex::new(socket)),
            endpoint: bound.to_string(),
        })
    }

    /// The resolved endpoint, with the real port when bound to port 0.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn reply_channel(&self) -> Arc<dyn ReplyChannel> {
        Arc::new(ZmqReplyChannel {
            socket: Arc::clone(&self.socket),
        })
    }

    /// Runs until `shutdown` resolves. A request is fully answered before the
    /// next one is received.
    pub async fn serve<F>(&self, router: &ServiceRouter, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let received = {
                let mut socket = self.socket.lock().await;
                tokio::select! {
                    _ = &mut shutdown => {
                        info!("transport loop stopping");
                        return Ok(());
                    }
                    received = socket.recv() => received,
                }
            };

            let message = match received {
                Ok(message) => message,
                Err(err) => {
                    error!("receive failed: {err}");
                    continue;
                }
            };

            let mut raw = Vec::new();
            for frame in message.into_vec() {
                raw.extend_from_slice(&frame);
            }
            debug!(bytes = raw.len(), "received request");

            if let Err(err) = router.handle_message(&raw).await {
                error!("failed to send reply: {err}");
            }
        }
    }
}
