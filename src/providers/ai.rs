use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};

use crate::credentials::Credentials;
use crate::domains::envelope::FailurePoint;
use crate::domains::service::{ChatRequest, ChatRole, CredentialTarget};
use crate::error::{GatewayError, Result};
use crate::interfaces::adapters::ServiceAdapter;

/// Single-message chat completion against an OpenAI-compatible provider.
pub struct AiAdapter {
    base_url: String,
    timeout: Duration,
    credentials: Arc<Credentials>,
}

impl AiAdapter {
    pub fn new(base_url: String, timeout: Duration, credentials: Arc<Credentials>) -> Self {
        Self {
            base_url,
            timeout,
            credentials,
        }
    }

    fn client(&self, api_key: String) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(self.base_url.clone());
        Client::with_config(config)
    }

    fn build_message(request: &ChatRequest) -> Result<ChatCompletionRequestMessage> {
        let content = request.content.as_str();
        let message = match request.role {
            ChatRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(content)
                    .build()
                    .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?,
            ),
            ChatRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Text(
                        content.to_string(),
                    ))
                    .build()
                    .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?,
            ),
            ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content)
                    .build()
                    .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?,
            ),
        };
        Ok(message)
    }

    fn extract_text_from_response(response: &CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .first()
            .ok_or_else(|| GatewayError::Serialization("No choices returned".to_string()))?
            .message
            .content
            .clone()
            .unwrap_or_default();
        Ok(message)
    }
}

#[async_trait]
impl ServiceAdapter for AiAdapter {
    type Payload = ChatRequest;

    fn failure_point(&self) -> FailurePoint {
        FailurePoint::Ai
    }

    async fn call(&self, request: ChatRequest) -> Result<Value> {
        let api_key = self.credentials.get(CredentialTarget::Ai).await?;
        if request.model.trim().is_empty() {
            return Err(GatewayError::InvalidPayload("model is empty".to_string()));
        }

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(request.model.clone());
        builder.messages(vec![Self::build_message(&request)?]);
        let completion = builder
            .build()
            .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;

        debug!(model = %request.model, role = ?request.role, "calling chat completion api");
        let client = self.client(api_key);
        let response = tokio::time::timeout(self.timeout, client.chat().create(completion))
            .await
            .map_err(|_| GatewayError::Timeout(format!("{:?}", self.timeout)))?
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Value::String(Self::extract_text_from_response(&response)?))
    }
}
