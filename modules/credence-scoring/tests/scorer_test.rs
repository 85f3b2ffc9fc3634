//! End-to-end scoring over HTML fixtures, with an in-memory fetcher standing
//! in for the network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use credence_scoring::{CredibilityScorer, OutletType, PageFetcher};

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

const GOV_URL: &str = "https://health.example.gov/reports/flu";
const BAIT_URL: &str = "https://viral.example.top/wow";

fn scorer() -> CredibilityScorer {
    let pages = HashMap::from([
        (GOV_URL.to_string(), fixture("gov_report.html")),
        (BAIT_URL.to_string(), fixture("clickbait.html")),
    ]);
    CredibilityScorer::new(Arc::new(FixtureFetcher { pages }))
}

#[tokio::test]
async fn well_sourced_government_report_rates_high() {
    let scorer = scorer();

    let features = scorer.features_for(GOV_URL).await;
    assert_eq!(features.title, "Seasonal Influenza Surveillance Report | Health Agency");
    assert_eq!(features.outlet_type, Some(OutletType::Government));
    assert_eq!(features.published_at.as_deref(), Some("2024-11-02T09:30:00Z"));
    assert_eq!(features.cites_sources_count, 5);
    assert_eq!(features.links_to_primary_sources, 3);
    assert!(features.has_byline && features.has_about_page && features.has_contact_info);

    let score = scorer.score_url(GOV_URL).await.expect("scored");
    assert!(score.score_0_100 > 70.0, "got {}", score.score_0_100);
    assert_eq!(score.breakdown.domain, 0.9);
    assert_eq!(score.breakdown.transparency, 0.9);
    assert!(score.stars_0_5 > 3.5);
}

#[tokio::test]
async fn clickbait_ad_page_rates_low() {
    let score = scorer().score_url(BAIT_URL).await.expect("scored");
    assert!(score.score_0_100 < 30.0, "got {}", score.score_0_100);
    assert!(score.penalty > 0.1);
    assert_eq!(score.breakdown.domain, 0.35);
    assert_eq!(score.breakdown.quality, 0.34);
}

#[tokio::test]
async fn unreachable_page_is_scored_from_url_alone() {
    let scorer = scorer();
    let url = "https://down.example.com/story";

    let features = scorer.features_for(url).await;
    assert_eq!(features.title, url);
    assert_eq!(features.domain, "down.example.com");

    let score = scorer.score_url(url).await.expect("minimal record still scores");
    assert_eq!(score.breakdown.evidence, 0.0);
    assert!((score.score_0_100 - 40.4).abs() < 1e-9);
}

#[tokio::test]
async fn non_web_urls_have_no_score() {
    let scorer = scorer();
    assert!(scorer.score_url("mailto:desk@example.com").await.is_none());
    assert!(scorer.score_url("not a url").await.is_none());
}
