use std::sync::Arc;

use ai_client::{ChatModel, Message, MessageRole, MockChatModel};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use credence_common::SearchResult;
use credence_scoring::{CredibilityScorer, PageFetcher};
use credence_search::{SearchSettings, SearchSummarizer, WebSearcher};

use credence_chat::{ChatSession, Flow};

struct OfflineFetcher;

#[async_trait]
impl PageFetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(anyhow!("offline: {url}"))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Returns one canned hit and counts how often it was asked.
struct CannedSearcher {
    fail: bool,
    calls: std::sync::atomic::AtomicUsize,
}

impl CannedSearcher {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            calls: Default::default(),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearcher for CannedSearcher {
    async fn search(&self, _query: &str, _max: usize) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("search backend down"));
        }
        Ok(vec![SearchResult {
            url: "https://weather.example.gov/nyc".to_string(),
            title: "NYC Forecast".to_string(),
            snippet: "Sunny, 21C.".to_string(),
        }])
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn session(
    model: Arc<MockChatModel>,
    searcher: Arc<CannedSearcher>,
    settings: SearchSettings,
) -> ChatSession {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(OfflineFetcher);
    let summarizer =
        SearchSummarizer::new(searcher, CredibilityScorer::new(fetcher.clone()), fetcher, 3);
    ChatSession::new(model as Arc<dyn ChatModel>, summarizer).with_settings(settings)
}

const AUTO: SearchSettings = SearchSettings {
    enable_search: true,
    force_search: false,
};

#[tokio::test]
async fn grounded_turn_sends_system_prompt_and_latest_question_only() {
    let model = Arc::new(MockChatModel::new().reply("Hi!").reply("It is **sunny**."));
    let searcher = CannedSearcher::new(false);
    let mut chat = session(model.clone(), searcher.clone(), AUTO);
    let mut out = Vec::new();

    chat.turn("hello there", &mut out).await.unwrap();
    let reply = chat.turn("weather in nyc", &mut out).await.unwrap();
    assert_eq!(reply, "It is **sunny**.");
    assert_eq!(searcher.calls(), 1, "only the keyword prompt searches");

    let requests = model.requests();
    assert_eq!(requests[0], vec![Message::user("hello there")]);

    let grounded = &requests[1];
    assert_eq!(grounded.len(), 2);
    assert_eq!(grounded[0].role, MessageRole::System);
    assert!(grounded[0].content.contains("[Source 1] NYC Forecast"));
    assert!(grounded[0].content.contains("Credibility: "));
    assert_eq!(grounded[1], Message::user("weather in nyc"));

    // History keeps user and assistant turns only.
    assert_eq!(chat.history().len(), 4);
    assert!(chat.history().iter().all(|m| m.role != MessageRole::System));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("🔍 Searching..."));
    assert!(printed.contains("Assistant: It is **sunny**.\n"));
}

#[tokio::test]
async fn failed_search_warns_and_falls_back_to_history() {
    let model = Arc::new(MockChatModel::new().reply("From memory."));
    let mut chat = session(model.clone(), CannedSearcher::new(true), SearchSettings::default());
    let mut out = Vec::new();

    chat.turn("anything", &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("⚠️ Search failed: search backend down"));
    assert_eq!(model.requests()[0], vec![Message::user("anything")]);
}

#[tokio::test]
async fn commands_toggle_settings_and_manage_history() {
    let model = Arc::new(MockChatModel::new().reply("ok"));
    let searcher = CannedSearcher::new(false);
    let mut chat = session(model, searcher.clone(), SearchSettings::default());
    let mut out = Vec::new();

    assert_eq!(chat.handle_line("/search off", &mut out).await.unwrap(), Flow::Continue);
    assert!(!chat.settings().enable_search);

    chat.handle_line("latest news?", &mut out).await.unwrap();
    assert_eq!(searcher.calls(), 0);

    chat.handle_line("/history", &mut out).await.unwrap();
    chat.handle_line("/clear", &mut out).await.unwrap();
    assert!(chat.history().is_empty());

    assert_eq!(chat.handle_line("exit", &mut out).await.unwrap(), Flow::Quit);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Web search: disabled"));
    assert!(printed.contains("You: latest news?\nAssistant: ok\n"));
    assert!(printed.contains("Conversation cleared."));
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    let model = Arc::new(MockChatModel::new());
    let mut chat = session(model.clone(), CannedSearcher::new(false), AUTO);
    let mut out = Vec::new();
    assert_eq!(chat.handle_line("   ", &mut out).await.unwrap(), Flow::Continue);
    assert!(model.requests().is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn failed_reply_leaves_history_untouched() {
    // One scripted reply: the second turn's stream fails.
    let model = Arc::new(MockChatModel::new().reply("Hello."));
    let mut chat = session(model.clone(), CannedSearcher::new(false), AUTO);
    let mut out = Vec::new();

    chat.turn("hi", &mut out).await.unwrap();
    assert!(chat.turn("write a poem", &mut out).await.is_err());
    assert_eq!(
        chat.history(),
        [Message::user("hi"), Message::assistant("Hello.")]
    );
}
