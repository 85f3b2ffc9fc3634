//! credence-scoring: heuristic credibility rating for web articles.
//!
//! `extract_features` reads signals out of a page, `score_article` turns them
//! into a 0–100 score and a 0–5 star rating, and `CredibilityScorer` ties both
//! to a [`PageFetcher`].

pub mod features;
pub mod fetch;
pub mod score;
pub mod scorer;

pub use features::{extract_features, ArticleFeatures, OutletType};
pub use fetch::{HttpFetcher, PageFetcher, BROWSER_USER_AGENT, FETCH_TIMEOUT, SCORING_USER_AGENT};
pub use score::{
    score_article, score_article_with, score_articles, Breakdown, CredibilityScore,
    ScoringWeights, SubScores, OBJECTIVITY_PLACEHOLDER, RECENCY_PLACEHOLDER,
};
pub use scorer::CredibilityScorer;
