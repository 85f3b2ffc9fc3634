use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use credence_common::SearchResult;
use credence_scoring::{CredibilityScore, CredibilityScorer, PageFetcher};
use tracing::info;

use crate::content::fetch_article_content;
use crate::searcher::WebSearcher;

/// One search hit with whatever could be learned about it.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub result: SearchResult,
    pub credibility: Option<CredibilityScore>,
    pub content: Option<String>,
}

/// The grounding material for a single chat turn.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub query: String,
    pub sources: Vec<SourceReport>,
}

impl SearchContext {
    /// Plain-text block handed to the model, one `[Source i]` section per hit.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, source) in self.sources.iter().enumerate() {
            let r = &source.result;
            let _ = writeln!(out, "[Source {}] {}", i + 1, r.title);
            let _ = writeln!(out, "Summary: {}", r.snippet);
            let _ = writeln!(out, "URL: {}", r.url);

            if let Some(score) = &source.credibility {
                let b = &score.breakdown;
                let _ = writeln!(
                    out,
                    "Credibility: {:?}/100 {}",
                    score.display_score(),
                    score.star_glyphs()
                );
                let _ = writeln!(
                    out,
                    "Quality Breakdown: Domain={:?}, Evidence={:?}, Transparency={:?}, Quality={:?}",
                    b.domain, b.evidence, b.transparency, b.quality
                );
            }

            if let Some(text) = &source.content {
                let _ = writeln!(out, "Full Content:\n{text}");
            }

            out.push('\n');
        }
        out
    }
}

/// Search, then rate and read every hit in turn.
pub struct SearchSummarizer {
    searcher: Arc<dyn WebSearcher>,
    scorer: CredibilityScorer,
    content_fetcher: Arc<dyn PageFetcher>,
    max_results: usize,
}

impl SearchSummarizer {
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        scorer: CredibilityScorer,
        content_fetcher: Arc<dyn PageFetcher>,
        max_results: usize,
    ) -> Self {
        Self {
            searcher,
            scorer,
            content_fetcher,
            max_results,
        }
    }

    pub fn searcher_name(&self) -> &str {
        self.searcher.name()
    }

    /// `Ok(None)` when the search came back empty. Search failures are returned
    /// to the caller; per-page failures only drop that page's extras.
    pub async fn summarize(&self, query: &str) -> Result<Option<SearchContext>> {
        let results = self.searcher.search(query, self.max_results).await?;
        if results.is_empty() {
            info!(query, searcher = self.searcher.name(), "No search results");
            return Ok(None);
        }

        let mut sources = Vec::with_capacity(results.len());
        for result in results.into_iter().take(self.max_results) {
            let credibility = self.scorer.score_url(&result.url).await;
            let content = fetch_article_content(self.content_fetcher.as_ref(), &result.url).await;
            sources.push(SourceReport {
                result,
                credibility,
                content,
            });
        }

        info!(
            query,
            sources = sources.len(),
            scored = sources.iter().filter(|s| s.credibility.is_some()).count(),
            with_content = sources.iter().filter(|s| s.content.is_some()).count(),
            "Search summary ready"
        );

        Ok(Some(SearchContext {
            query: query.to_string(),
            sources,
        }))
    }
}
