use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

/// Stream of content deltas, in arrival order.
pub type TokenStream = BoxStream<'static, Result<String>>;

/// A chat-completions backend. Implemented by [`crate::OpenAi`] and
/// [`crate::MockChatModel`].
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Single-shot completion over the full message list.
    async fn complete(&self, messages: Vec<Message>) -> Result<String>;

    /// Token-by-token completion.
    async fn stream(&self, messages: Vec<Message>) -> Result<TokenStream>;

    /// Completion constrained to a strict JSON schema. Returns the raw JSON text.
    async fn complete_json(
        &self,
        messages: Vec<Message>,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<String>;
}
