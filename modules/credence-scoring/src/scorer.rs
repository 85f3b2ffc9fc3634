use std::sync::Arc;

use tracing::{info, warn};

use crate::features::{extract_features, ArticleFeatures};
use crate::fetch::PageFetcher;
use crate::score::{score_article_with, CredibilityScore, ScoringWeights};

/// Fetches a URL and scores it. Failures never propagate: an unreachable page
/// is scored from its URL alone.
pub struct CredibilityScorer {
    fetcher: Arc<dyn PageFetcher>,
    weights: ScoringWeights,
}

impl CredibilityScorer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            weights: ScoringWeights::default(),
        }
    }

    /// Fetch and extract features, falling back to the minimal record.
    pub async fn features_for(&self, url: &str) -> ArticleFeatures {
        match self.fetcher.fetch(url).await {
            Ok(html) => extract_features(&html, url),
            Err(e) => {
                warn!(url, fetcher = self.fetcher.name(), error = %e, "Feature fetch failed, using minimal record");
                ArticleFeatures::minimal(url)
            }
        }
    }

    /// Score a URL. `None` when the URL is not a fetchable web address.
    pub async fn score_url(&self, url: &str) -> Option<CredibilityScore> {
        match url::Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => {}
            _ => {
                warn!(url, "Skipping credibility for non-web URL");
                return None;
            }
        }

        let features = self.features_for(url).await;
        let score = score_article_with(&features, &self.weights);
        info!(
            url,
            score = score.display_score(),
            stars = score.display_stars(),
            "Scored article"
        );
        Some(score)
    }
}
