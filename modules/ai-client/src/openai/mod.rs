mod client;
pub(crate) mod schema;
mod sse;
pub(crate) mod types;

pub use schema::StructuredOutput;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{ChatModel, Message, TokenStream};

use client::OpenAiClient;

/// Default ceiling on generated tokens per request.
const DEFAULT_MAX_TOKENS: u32 = 4096;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub(crate) fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn request(&self, messages: &[Message]) -> types::ChatRequest {
        types::ChatRequest::new(&self.model)
            .messages(messages)
            .token_limit(DEFAULT_MAX_TOKENS)
    }
}

// =============================================================================
// ChatModel Implementation
// =============================================================================

#[async_trait]
impl ChatModel for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        let response = self.client().chat(&self.request(&messages)).await?;
        response
            .into_content()
            .ok_or_else(|| AiError::EmptyResponse.into())
    }

    async fn stream(&self, messages: Vec<Message>) -> Result<TokenStream> {
        let request = self.request(&messages).streaming();
        self.client().chat_stream(&request).await
    }

    async fn complete_json(
        &self,
        messages: Vec<Message>,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let request = types::StructuredRequest::new(&self.model, &messages, schema_name, schema);
        self.client().structured_output(&request).await
    }
}
