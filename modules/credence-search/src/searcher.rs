use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use credence_common::{Config, CredenceError, SearchProvider, SearchResult};
use scraper::{Html, Selector};
use tracing::info;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const SERPER_URL: &str = "https://google.serper.dev/search";

// --- WebSearcher trait ---

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
    fn name(&self) -> &str;
}

/// Pick the backend named in the configuration.
pub fn searcher_from_config(config: &Config) -> Result<Arc<dyn WebSearcher>> {
    match config.search_provider {
        SearchProvider::DuckDuckGo => Ok(Arc::new(DuckDuckGoSearcher::new()?)),
        SearchProvider::Serper => {
            let key = config.serper_api_key.as_deref().ok_or_else(|| {
                CredenceError::Config("SERPER_API_KEY is required for serper".to_string())
            })?;
            Ok(Arc::new(SerperSearcher::new(key)?))
        }
    }
}

// --- DuckDuckGo (HTML endpoint, no key) ---

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result").expect("valid selector"));
static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));
static RESULT_SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("valid selector"));

pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
}

impl DuckDuckGoSearcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(SEARCH_TIMEOUT)
                .user_agent(credence_scoring::BROWSER_USER_AGENT)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        info!(query, max_results, "DuckDuckGo search");

        let url = url::Url::parse_with_params(DUCKDUCKGO_HTML_URL, &[("q", query)])
            .context("Failed to build DuckDuckGo URL")?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CredenceError::Search(format!("DuckDuckGo request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(CredenceError::Search(format!(
                "DuckDuckGo returned status {}",
                resp.status()
            ))
            .into());
        }

        let html = resp
            .text()
            .await
            .context("Failed to read DuckDuckGo response")?;

        let results = parse_duckduckgo_html(&html, max_results);
        info!(query, count = results.len(), "DuckDuckGo search complete");
        Ok(results)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Parse organic results out of DuckDuckGo's HTML results page. Ads are skipped
/// and redirect links are unwrapped to their target.
pub fn parse_duckduckgo_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT)
        .filter(|r| !r.value().classes().any(|c| c == "result--ad"))
        .filter_map(|r| {
            let link = r.select(&RESULT_LINK).next()?;
            let url = unwrap_redirect(link.value().attr("href")?)?;
            let title = collapse_whitespace(&link.text().collect::<String>());
            let snippet = r
                .select(&RESULT_SNIPPET)
                .next()
                .map(|s| collapse_whitespace(&s.text().collect::<String>()))
                .unwrap_or_default();
            Some(SearchResult {
                url,
                title,
                snippet,
            })
        })
        .take(max_results)
        .collect()
}

/// `//duckduckgo.com/l/?uddg=<encoded target>` → target. Direct links pass through.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_string(),
    };
    let parsed = url::Url::parse(&absolute).ok()?;

    if parsed.host_str().is_some_and(|h| h.ends_with("duckduckgo.com")) && parsed.path() == "/l/" {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }

    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// --- Serper (Google Search) ---

#[derive(Debug, serde::Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperSearcher {
    api_key: String,
    client: reqwest::Client,
}

impl SerperSearcher {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(SEARCH_TIMEOUT)
                .build()
                .context("Failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl WebSearcher for SerperSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        info!(query, max_results, "Serper search");

        let body = serde_json::json!({
            "q": query,
            "num": max_results,
        });

        let resp = self
            .client
            .post(SERPER_URL)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CredenceError::Search(format!("Serper API request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("Failed to read Serper response")?;

        let results = parse_serper_response(status, &body, max_results)?;
        info!(query, count = results.len(), "Serper search complete");
        Ok(results)
    }

    fn name(&self) -> &str {
        "serper"
    }
}

/// Turn a Serper reply into results. A non-success status is a search error
/// even when the body is valid JSON.
fn parse_serper_response(
    status: reqwest::StatusCode,
    body: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    if !status.is_success() {
        return Err(CredenceError::Search(format!(
            "Serper returned status {status}: {}",
            body.trim()
        ))
        .into());
    }

    let data: SerperResponse =
        serde_json::from_str(body).context("Failed to parse Serper response")?;

    Ok(data
        .organic
        .into_iter()
        .filter(|r| !r.link.is_empty())
        .take(max_results)
        .map(|r| SearchResult {
            url: r.link,
            title: r.title,
            snippet: r.snippet,
        })
        .collect())
}
