//! Search parsing and summary rendering against fixtures, no network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use credence_common::SearchResult;
use credence_scoring::{CredibilityScorer, PageFetcher};
use credence_search::{parse_duckduckgo_html, SearchSummarizer, WebSearcher};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

struct FixtureFetcher {
    pages: HashMap<String, String>,
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {url}"))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

struct StaticSearcher {
    results: Vec<SearchResult>,
}

#[async_trait]
impl WebSearcher for StaticSearcher {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        Ok(self.results.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

struct FailingSearcher;

#[async_trait]
impl WebSearcher for FailingSearcher {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
        Err(anyhow!("rate limited"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

const ARTICLE_URL: &str = "https://news.metroledger.example/transit";
const DOWN_URL: &str = "https://down.example.com/story";

fn summarizer(searcher: Arc<dyn WebSearcher>) -> SearchSummarizer {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(FixtureFetcher {
        pages: HashMap::from([(ARTICLE_URL.to_string(), fixture("article.html"))]),
    });
    SearchSummarizer::new(searcher, CredibilityScorer::new(fetcher.clone()), fetcher, 3)
}

fn hit(url: &str, title: &str, snippet: &str) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: title.to_string(),
        snippet: snippet.to_string(),
    }
}

#[test]
fn duckduckgo_page_yields_organic_results_in_order() {
    let results = parse_duckduckgo_html(&fixture("ddg_results.html"), 10);

    assert_eq!(results.len(), 3, "ad must be skipped: {results:?}");
    assert_eq!(
        results[0].url,
        "https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html"
    );
    assert_eq!(results[0].title, "Announcing Rust 1.85.0 and Rust 2024");
    assert_eq!(
        results[0].snippet,
        "The Rust team is happy to announce a new version, stabilizing the 2024 edition."
    );
    assert_eq!(
        results[1].url,
        "https://doc.rust-lang.org/edition-guide/rust-2024/index.html"
    );
    assert_eq!(results[2].url, "https://www.reddit.com/r/rust/comments/abc/rust_2024/");
    assert_eq!(results[2].snippet, "");
}

#[test]
fn duckduckgo_results_respect_limit() {
    let results = parse_duckduckgo_html(&fixture("ddg_results.html"), 2);
    assert_eq!(results.len(), 2);
    assert!(parse_duckduckgo_html("<html><body>No results.</body></html>", 3).is_empty());
}

#[tokio::test]
async fn summary_includes_rating_and_content_per_source() {
    let searcher = Arc::new(StaticSearcher {
        results: vec![
            hit(ARTICLE_URL, "Transit budget approved", "Council votes 7-2."),
            hit(DOWN_URL, "Unreachable story", "Cached snippet."),
        ],
    });

    let context = summarizer(searcher)
        .summarize("transit budget news")
        .await
        .unwrap()
        .expect("results");

    assert_eq!(context.sources.len(), 2);
    let first = &context.sources[0];
    assert!(first.credibility.is_some());
    assert_eq!(
        first.content.as_deref(),
        Some(
            "City Council Approves Transit Budget\n\
             The council voted 7-2 on Thursday to fund two new bus lines.\n\
             Figures come from the\n\
             transit authority\n\
             ."
        )
    );

    let rendered = context.render();
    assert!(rendered.starts_with(
        "[Source 1] Transit budget approved\nSummary: Council votes 7-2.\nURL: https://news.metroledger.example/transit\nCredibility: "
    ));
    assert!(rendered.contains("Full Content:\nCity Council Approves Transit Budget\n"));

    // The unreachable page still gets a URL-only rating but no content.
    assert!(rendered.ends_with(
        "[Source 2] Unreachable story\n\
         Summary: Cached snippet.\n\
         URL: https://down.example.com/story\n\
         Credibility: 40.4/100 ⭐⭐\n\
         Quality Breakdown: Domain=0.5, Evidence=0.0, Transparency=0.3, Quality=0.7\n\n"
    ));
}

#[tokio::test]
async fn non_web_result_has_no_rating_line() {
    let searcher = Arc::new(StaticSearcher {
        results: vec![hit("ftp://files.example.com/a.txt", "A file", "Plain text.")],
    });

    let context = summarizer(searcher).summarize("file").await.unwrap().expect("results");
    assert_eq!(
        context.render(),
        "[Source 1] A file\nSummary: Plain text.\nURL: ftp://files.example.com/a.txt\n\n"
    );
}

#[tokio::test]
async fn empty_search_yields_no_context() {
    let searcher = Arc::new(StaticSearcher { results: vec![] });
    assert!(summarizer(searcher).summarize("anything").await.unwrap().is_none());
}

#[tokio::test]
async fn search_failure_is_returned() {
    let err = summarizer(Arc::new(FailingSearcher))
        .summarize("anything")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("rate limited"));
}

#[tokio::test]
async fn results_are_capped_at_max() {
    let searcher = Arc::new(StaticSearcher {
        results: (0..5)
            .map(|i| hit(&format!("https://s{i}.example.com/"), "t", "s"))
            .collect(),
    });
    let context = summarizer(searcher).summarize("q").await.unwrap().expect("results");
    assert_eq!(context.sources.len(), 3);
}
