//! The credibility heuristic: six category sub-scores combined with fixed
//! weights, minus a clickbait penalty.

use serde::{Deserialize, Serialize};

use crate::features::{ArticleFeatures, OutletType};

const TRUSTED_TLDS: &[&str] = &[".gov", ".edu"];
const SUSPECT_TLDS: &[&str] = &[".zip", ".top", ".click"];

const DOMAIN_BASE: f64 = 0.5;
const DOMAIN_TRUSTED: f64 = 0.85;
const DOMAIN_SUSPECT: f64 = 0.35;
const DOMAIN_INSTITUTIONAL_FLOOR: f64 = 0.9;

/// Recency is not measured yet; every article gets the neutral value.
pub const RECENCY_PLACEHOLDER: f64 = 0.5;
/// Objectivity is not measured yet; every article gets this constant.
pub const OBJECTIVITY_PLACEHOLDER: f64 = 0.7;

const MAX_PENALTY: f64 = 0.5;

/// Relative weight of each category in the combined score. The defaults sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub domain: f64,
    pub evidence: f64,
    pub transparency: f64,
    pub quality: f64,
    pub recency: f64,
    pub objectivity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            domain: 0.23,
            evidence: 0.22,
            transparency: 0.18,
            quality: 0.15,
            recency: 0.12,
            objectivity: 0.10,
        }
    }
}

/// Per-category scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub domain: f64,
    pub evidence: f64,
    pub transparency: f64,
    pub quality: f64,
    pub recency: f64,
    pub objectivity: f64,
}

/// The four sub-scores shown to users, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub domain: f64,
    pub evidence: f64,
    pub transparency: f64,
    pub quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityScore {
    pub title: String,
    pub url: String,
    pub sub_scores: SubScores,
    pub penalty: f64,
    /// Combined score in [0, 100].
    pub score_0_100: f64,
    /// Star rating in [0, 5]; always `score_0_100 / 20`.
    pub stars_0_5: f64,
    pub breakdown: Breakdown,
}

impl CredibilityScore {
    /// Score rounded to one decimal, as displayed.
    pub fn display_score(&self) -> f64 {
        round_to(self.score_0_100, 1)
    }

    /// Stars rounded to one decimal, as displayed.
    pub fn display_stars(&self) -> f64 {
        round_to(self.stars_0_5, 1)
    }

    /// One star glyph per whole displayed star.
    pub fn star_glyphs(&self) -> String {
        "⭐".repeat(self.display_stars().trunc() as usize)
    }
}

pub fn score_article(article: &ArticleFeatures) -> CredibilityScore {
    score_article_with(article, &ScoringWeights::default())
}

pub fn score_articles(articles: &[ArticleFeatures]) -> Vec<CredibilityScore> {
    articles.iter().map(score_article).collect()
}

pub fn score_article_with(article: &ArticleFeatures, weights: &ScoringWeights) -> CredibilityScore {
    let sub = SubScores {
        domain: domain_score(article).clamp(0.0, 1.0),
        evidence: evidence_score(article).clamp(0.0, 1.0),
        transparency: transparency_score(article).clamp(0.0, 1.0),
        quality: quality_score(article).clamp(0.0, 1.0),
        recency: RECENCY_PLACEHOLDER,
        objectivity: OBJECTIVITY_PLACEHOLDER,
    };

    let penalty = (article.clickbait_score.max(0.0) * 0.15).min(MAX_PENALTY);

    let weighted = weights.domain * sub.domain
        + weights.evidence * sub.evidence
        + weights.transparency * sub.transparency
        + weights.quality * sub.quality
        + weights.recency * sub.recency
        + weights.objectivity * sub.objectivity;
    let combined = (weighted - penalty).clamp(0.0, 1.0);

    CredibilityScore {
        title: article.title.clone(),
        url: article.url.clone(),
        sub_scores: sub,
        penalty,
        score_0_100: combined * 100.0,
        stars_0_5: combined * 5.0,
        breakdown: Breakdown {
            domain: round_to(sub.domain, 2),
            evidence: round_to(sub.evidence, 2),
            transparency: round_to(sub.transparency, 2),
            quality: round_to(sub.quality, 2),
        },
    }
}

fn domain_score(article: &ArticleFeatures) -> f64 {
    let domain = article.domain.to_ascii_lowercase();
    let mut score = DOMAIN_BASE;
    if TRUSTED_TLDS.iter().any(|t| domain.ends_with(t)) {
        score = DOMAIN_TRUSTED;
    }
    if SUSPECT_TLDS.iter().any(|t| domain.ends_with(t)) {
        score = DOMAIN_SUSPECT;
    }
    // Records built by hand may leave the outlet unset; fall back to the domain.
    let outlet = article.outlet_type.or_else(|| OutletType::classify(&domain));
    if outlet.is_some() {
        score = score.max(DOMAIN_INSTITUTIONAL_FLOOR);
    }
    score
}

fn evidence_score(article: &ArticleFeatures) -> f64 {
    let cites = f64::from(article.cites_sources_count);
    let primary = f64::from(article.links_to_primary_sources);
    (1.0 - (-cites / 4.0).exp()) * 0.6 + (1.0 - (-primary / 2.0).exp()) * 0.4
}

fn transparency_score(article: &ArticleFeatures) -> f64 {
    let mut score: f64 = 0.3;
    if article.has_byline {
        score += 0.25;
    }
    if article.has_about_page {
        score += 0.2;
    }
    if article.has_contact_info {
        score += 0.15;
    }
    score.min(1.0)
}

fn quality_score(article: &ArticleFeatures) -> f64 {
    let ads = article.advertising_density.max(0.0);
    (0.7 - (ads * 0.6).min(0.5)).max(0.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
