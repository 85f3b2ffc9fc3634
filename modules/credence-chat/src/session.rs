use std::io::Write;
use std::sync::Arc;

use ai_client::{ChatModel, Message, MessageRole};
use anyhow::{Context, Result};
use credence_search::{SearchContext, SearchSettings, SearchSummarizer};
use futures::StreamExt;
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::prompt::build_messages;

/// What the input loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ChatSession {
    model: Arc<dyn ChatModel>,
    summarizer: SearchSummarizer,
    history: Vec<Message>,
    settings: SearchSettings,
}

impl ChatSession {
    pub fn new(model: Arc<dyn ChatModel>, summarizer: SearchSummarizer) -> Self {
        Self {
            model,
            summarizer,
            history: Vec::new(),
            settings: SearchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    pub fn settings_banner(&self) -> String {
        let search = if self.settings.enable_search {
            "enabled"
        } else {
            "disabled"
        };
        let force = if self.settings.force_search {
            "every message"
        } else {
            "only when the question needs it"
        };
        format!(
            "Web search: {search} ({})\nSearching: {force}",
            self.summarizer.searcher_name()
        )
    }

    /// Handle one line of user input: a command or a chat turn.
    pub async fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match Command::parse(line) {
            Some(cmd) => self.apply(cmd, out),
            None => {
                self.turn(line, out).await?;
                Ok(Flow::Continue)
            }
        }
    }

    fn apply(&mut self, cmd: Command, out: &mut impl Write) -> Result<Flow> {
        match cmd {
            Command::Search(on) => {
                self.settings.enable_search = on;
                writeln!(out, "{}", self.settings_banner())?;
            }
            Command::Force(on) => {
                self.settings.force_search = on;
                writeln!(out, "{}", self.settings_banner())?;
            }
            Command::History => {
                if self.history.is_empty() {
                    writeln!(out, "(no messages yet)")?;
                }
                for msg in &self.history {
                    writeln!(out, "{}: {}", speaker(msg.role), msg.content)?;
                }
            }
            Command::Clear => {
                self.history.clear();
                writeln!(out, "Conversation cleared.")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(text) => writeln!(out, "Unknown command: {text}. Type /help.")?,
        }
        Ok(Flow::Continue)
    }

    /// One chat turn. The reply is streamed to `out` and appended to history.
    /// A failed turn leaves history as it was.
    pub async fn turn(&mut self, prompt: &str, out: &mut impl Write) -> Result<String> {
        self.history.push(Message::user(prompt));

        match self.reply(prompt, out).await {
            Ok(reply) => {
                self.history.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    async fn reply(&self, prompt: &str, out: &mut impl Write) -> Result<String> {
        let context = self.search_context(prompt, out).await?;
        let messages = build_messages(&self.history, prompt, context.as_ref());
        info!(
            model = self.model.model(),
            messages = messages.len(),
            grounded = context.is_some(),
            "Requesting completion"
        );

        let mut stream = self.model.stream(messages).await?;
        let mut reply = String::new();
        write!(out, "Assistant: ")?;
        while let Some(token) = stream.next().await {
            let token = token.context("Completion stream failed")?;
            write!(out, "{token}")?;
            out.flush()?;
            reply.push_str(&token);
        }
        writeln!(out)?;

        Ok(reply)
    }

    async fn search_context(
        &self,
        prompt: &str,
        out: &mut impl Write,
    ) -> Result<Option<SearchContext>> {
        if !self.settings.should_search(prompt) {
            return Ok(None);
        }

        writeln!(out, "🔍 Searching...")?;
        match self.summarizer.summarize(prompt).await {
            Ok(context) => Ok(context),
            Err(e) => {
                warn!(error = %e, "Search failed");
                writeln!(out, "⚠️ Search failed: {e}")?;
                Ok(None)
            }
        }
    }
}

fn speaker(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "You",
        MessageRole::Assistant => "Assistant",
    }
}
