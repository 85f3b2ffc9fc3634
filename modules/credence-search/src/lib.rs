//! credence-search: web search grounding for chat turns.

pub mod content;
pub mod searcher;
pub mod summary;
pub mod trigger;

pub use content::{extract_article_text, fetch_article_content, MAX_CONTENT_CHARS};
pub use searcher::{
    parse_duckduckgo_html, searcher_from_config, DuckDuckGoSearcher, SerperSearcher, WebSearcher,
};
pub use summary::{SearchContext, SearchSummarizer, SourceReport};
pub use trigger::{needs_web_search, SearchSettings, SEARCH_KEYWORDS};
