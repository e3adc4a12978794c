use std::time::Duration;

use serde_json::{json, Value};
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::domains::envelope::ReplyEnvelope;
use crate::error::{GatewayError, Result};

/// REQ-side counterpart of the gateway, one request in flight at a time.
pub struct GatewayClient {
    socket: ReqSocket,
    timeout: Duration,
}

impl GatewayClient {
    pub async fn connect(endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut socket = ReqSocket::new();
        socket.connect(endpoint).await?;
        Ok(Self { socket, timeout })
    }

    pub async fn request(&mut self, service: &str, data: Value) -> Result<ReplyEnvelope> {
        let payload = json!({"service": service, "data": data}).to_string();
        self.send_raw(payload).await
    }

    pub async fn send_raw(&mut self, payload: String) -> Result<ReplyEnvelope> {
        self.socket.send(ZmqMessage::from(payload)).await?;
        let message = tokio::time::timeout(self.timeout, self.socket.recv())
            .await
            .map_err(|_| GatewayError::Timeout(format!("{:?}", self.timeout)))??;

        let mut raw = Vec::new();
        for frame in message.into_vec() {
            raw.extend_from_slice(&frame);
        }
        serde_json::from_slice(&raw).map_err(|e| GatewayError::Serialization(e.to_string()))
    }
}
