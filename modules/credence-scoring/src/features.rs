//! Feature extraction: turns a fetched HTML page into the signals the
//! credibility heuristic consumes. Pure and infallible; anything the page
//! does not expose is left at its zero value.

use std::sync::LazyLock;

use credence_common::domain_of;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static DATE_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta, time").expect("valid selector"));
static ANCHOR_WITH_HREF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static BYLINE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[name="author"], meta[property="article:author"]"#)
        .expect("valid selector")
});
static IFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe").expect("valid selector"));

/// Hrefs containing any of these count as links to primary sources.
const PRIMARY_SOURCE_MARKERS: &[&str] = &[".gov", ".edu", "doi.org", "pubmed"];
const CLICKBAIT_PHRASES: &[&str] = &["shocking", "you won", "what happened"];
const CONTACT_MARKERS: &[&str] = &["contact", "email"];

/// Outlet classification derived from the domain suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutletType {
    Government,
    Academic,
}

impl OutletType {
    pub fn classify(domain: &str) -> Option<Self> {
        let domain = domain.to_ascii_lowercase();
        if domain.ends_with(".gov") {
            Some(OutletType::Government)
        } else if domain.ends_with(".edu") {
            Some(OutletType::Academic)
        } else {
            None
        }
    }
}

/// Signals extracted once from a fetched article page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFeatures {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub outlet_type: Option<OutletType>,
    pub published_at: Option<String>,
    pub has_byline: bool,
    pub has_about_page: bool,
    pub has_contact_info: bool,
    pub cites_sources_count: u32,
    pub links_to_primary_sources: u32,
    pub advertising_density: f64,
    pub clickbait_score: f64,
}

impl ArticleFeatures {
    /// Record used when the page could not be fetched or parsed.
    pub fn minimal(url: &str) -> Self {
        Self {
            title: url.to_string(),
            url: url.to_string(),
            domain: domain_of(url),
            ..Default::default()
        }
    }
}

/// Extract credibility features from raw HTML served at `url`.
pub fn extract_features(html: &str, url: &str) -> ArticleFeatures {
    let document = Html::parse_document(html);
    let domain = domain_of(url);

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    let (cites_sources_count, links_to_primary_sources) = count_outbound_links(&document, &domain);

    let page_text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let has_about_page = document.select(&ANCHOR).any(|a| {
        a.text()
            .collect::<String>()
            .to_lowercase()
            .contains("about")
    });

    let iframes = document.select(&IFRAME).count();

    ArticleFeatures {
        outlet_type: OutletType::classify(&domain),
        published_at: find_publication_date(&document),
        has_byline: document.select(&BYLINE).next().is_some(),
        has_about_page,
        has_contact_info: CONTACT_MARKERS.iter().any(|m| page_text.contains(m)),
        cites_sources_count,
        links_to_primary_sources,
        advertising_density: (iframes as f64 / 10.0).min(1.0),
        clickbait_score: clickbait_score(&title),
        title,
        url: url.to_string(),
        domain,
    }
}

/// First `<meta>`/`<time>` attribute value that looks like a date.
fn find_publication_date(document: &Html) -> Option<String> {
    document.select(&DATE_CANDIDATES).find_map(|tag| {
        ["content", "datetime"].iter().find_map(|attr| {
            tag.value()
                .attr(attr)
                .filter(|v| !v.is_empty() && (v.contains("20") || v.contains('T')))
                .map(str::to_string)
        })
    })
}

/// Count links leaving the page's domain, and the subset pointing at primary sources.
fn count_outbound_links(document: &Html, domain: &str) -> (u32, u32) {
    let mut cites = 0;
    let mut primary = 0;

    for anchor in document.select(&ANCHOR_WITH_HREF) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let host = link_host(href.trim());
        if host.is_empty() || host.contains(domain) {
            continue;
        }
        cites += 1;
        let lowered = href.to_lowercase();
        if PRIMARY_SOURCE_MARKERS.iter().any(|m| lowered.contains(m)) {
            primary += 1;
        }
    }

    (cites, primary)
}

/// Host of an absolute or protocol-relative href. Relative links have none.
fn link_host(href: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        return domain_of(&format!("https://{rest}"));
    }
    domain_of(href)
}

fn clickbait_score(title: &str) -> f64 {
    let lowered = title.to_lowercase();
    let mut score = if CLICKBAIT_PHRASES.iter().any(|p| lowered.contains(p)) {
        0.5
    } else {
        0.0
    };
    let exclamations = title.matches('!').count() as f64;
    score += (exclamations * 0.1).min(0.5);
    score
}
