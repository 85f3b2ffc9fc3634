use anyhow::Result;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::AiError;
use crate::traits::TokenStream;

use super::sse::{parse_sse_line, SseDecoder, SseEvent};
use super::types::*;

pub(crate) const OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub(crate) struct OpenAiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn post<T: serde::Serialize>(&self, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(AiError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body }.into());
        }

        Ok(response)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, messages = request.messages.len(), "OpenAI chat request");

        let response = self.post(request).await?;
        Ok(response.json().await.map_err(AiError::from)?)
    }

    /// Send a streaming request and yield content deltas as they arrive.
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<TokenStream> {
        debug!(model = %request.model, messages = request.messages.len(), "OpenAI streaming request");

        let response = self.post(request).await?;
        let mut body = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::default();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(anyhow::Error::from(AiError::from(e)));
                        return;
                    }
                };
                for line in decoder.push(&chunk) {
                    match parse_sse_line(&line) {
                        Ok(SseEvent::Delta(text)) => yield Ok(text),
                        Ok(SseEvent::Done) => return,
                        Ok(SseEvent::Skip) => {}
                        Err(e) => {
                            yield Err(anyhow::Error::from(e));
                            return;
                        }
                    }
                }
            }
            if let Some(line) = decoder.finish() {
                if let Ok(SseEvent::Delta(text)) = parse_sse_line(&line) {
                    yield Ok(text);
                }
            }
        };

        Ok(Box::pin(stream))
    }

    pub async fn structured_output(&self, request: &StructuredRequest) -> Result<String> {
        debug!(
            model = %request.model,
            schema = %request.response_format.json_schema.name,
            "OpenAI structured output request"
        );

        let response = self.post(request).await?;
        let chat_response: ChatResponse = response.json().await.map_err(AiError::from)?;

        chat_response
            .into_content()
            .ok_or_else(|| AiError::EmptyResponse.into())
    }
}
