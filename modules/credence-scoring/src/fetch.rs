use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use credence_common::CredenceError;
use tracing::{info, warn};

/// Per-request timeout for page fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent when fetching pages for feature extraction.
pub const SCORING_USER_AGENT: &str = "Mozilla/5.0";

/// User agent sent when fetching article text.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// --- PageFetcher trait ---

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Return the raw HTML served at `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

// --- Plain HTTP fetcher ---

/// Single GET with a fixed user agent and timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: &'static str,
}

impl HttpFetcher {
    pub fn new(user_agent: &'static str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, user_agent })
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).map_err(|e| CredenceError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CredenceError::Fetch {
                url: url.to_string(),
                reason: format!("only http/https URLs are allowed, got {}", parsed.scheme()),
            }
            .into());
        }

        info!(url, fetcher = "http", "Fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| CredenceError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // Error pages still carry a body worth scoring.
            warn!(url, status = status.as_u16(), "Non-success status");
        }

        let body = response.text().await.map_err(|e| CredenceError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!(url, fetcher = "http", bytes = body.len(), "Fetched successfully");
        Ok(body)
    }

    fn name(&self) -> &str {
        "http"
    }
}
