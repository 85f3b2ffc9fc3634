//! Decides whether a chat turn should be grounded with a web search.

/// Phrases that suggest the user wants current or external information.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "latest",
    "current",
    "news",
    "today",
    "recent",
    "2024",
    "2025",
    "what is happening",
    "what's happening",
    "what is",
    "what's",
    "search",
    "find",
    "look up",
    "weather",
    "temperature",
    "forecast",
    "stock",
    "price",
    "score",
    "update",
    "now",
    "right now",
    "this week",
    "this month",
    "this year",
    "recently",
    "tell me about",
    "information about",
    "nyc",
    "new york",
];

/// The two user-facing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub enable_search: bool,
    pub force_search: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enable_search: true,
            force_search: true,
        }
    }
}

impl SearchSettings {
    pub fn should_search(&self, prompt: &str) -> bool {
        self.enable_search && (self.force_search || needs_web_search(prompt))
    }
}

/// Keyword match (case-insensitive substring) or any question mark.
pub fn needs_web_search(prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    SEARCH_KEYWORDS.iter().any(|k| lowered.contains(k)) || prompt.contains('?')
}
