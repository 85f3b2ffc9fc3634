//! Scripted [`ChatModel`] for tests. Replies are served in FIFO order and
//! every request is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::traits::{ChatModel, Message, TokenStream};

#[derive(Default)]
pub struct MockChatModel {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply. Consumed by the next `complete`, `stream` or `complete_json` call.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .expect("mock lock poisoned")
            .push_back(text.into());
        self
    }

    /// Message lists received so far, one entry per call.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    fn next_reply(&self, messages: Vec<Message>) -> Result<String> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(messages);
        self.replies
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
            .ok_or_else(|| anyhow!("MockChatModel has no scripted reply left"))
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: Vec<Message>) -> Result<String> {
        self.next_reply(messages)
    }

    async fn stream(&self, messages: Vec<Message>) -> Result<TokenStream> {
        let reply = self.next_reply(messages)?;
        let tokens: Vec<Result<String>> = reply
            .split_inclusive(' ')
            .map(|t| Ok(t.to_string()))
            .collect();
        Ok(Box::pin(futures::stream::iter(tokens)))
    }

    async fn complete_json(
        &self,
        messages: Vec<Message>,
        _schema_name: &str,
        _schema: serde_json::Value,
    ) -> Result<String> {
        self.next_reply(messages)
    }
}
