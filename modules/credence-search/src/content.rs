use std::sync::LazyLock;

use ai_client::util::truncate_chars;
use credence_scoring::PageFetcher;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{info, warn};

/// Upper bound on article text handed to the model, in characters.
pub const MAX_CONTENT_CHARS: usize = 3000;

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

static MAIN_CANDIDATES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", r#"div[class*="content"]"#, r#"div[class*="article"]"#]
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

/// Pull readable text out of an article page: the first `article`, `main` or
/// content-like `div`, else the whole document. Chrome elements are dropped,
/// text nodes are trimmed and joined one per line.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let container = MAIN_CANDIDATES
        .iter()
        .find_map(|sel| document.select(sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    collect_text(container, &mut lines);
    truncate_chars(&lines.join("\n"), MAX_CONTENT_CHARS).to_string()
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(el, out);
                }
            }
            _ => {}
        }
    }
}

/// Fetch a page and extract its text. `None` on any failure or an empty page.
pub async fn fetch_article_content(fetcher: &dyn PageFetcher, url: &str) -> Option<String> {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(url, error = %e, "Content fetch failed");
            return None;
        }
    };

    let text = extract_article_text(&html);
    if text.is_empty() {
        warn!(url, "No readable content");
        return None;
    }
    info!(url, chars = text.chars().count(), "Extracted article content");
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_article_element() {
        let html = r#"<html><body>
            <header>Site Header</header>
            <div>Sidebar promo</div>
            <article><h1>Headline</h1><p> First paragraph. </p><script>track()</script><p>Second.</p></article>
            <footer>Copyright</footer>
        </body></html>"#;
        assert_eq!(extract_article_text(html), "Headline\nFirst paragraph.\nSecond.");
    }

    #[test]
    fn falls_back_to_content_div() {
        let html = r#"<html><body>
            <nav>Home | About</nav>
            <div class="post-content"><p>Body text</p></div>
        </body></html>"#;
        assert_eq!(extract_article_text(html), "Body text");
    }

    #[test]
    fn falls_back_to_whole_document_without_chrome() {
        let html = r#"<html><head><title>T</title><style>p{}</style></head><body>
            <nav>menu</nav><p>Only text</p><footer>bye</footer>
        </body></html>"#;
        assert_eq!(extract_article_text(html), "T\nOnly text");
    }

    #[test]
    fn long_text_is_truncated_by_characters() {
        let body = "é".repeat(MAX_CONTENT_CHARS + 50);
        let html = format!("<article><p>{body}</p></article>");
        let text = extract_article_text(&html);
        assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
    }
}
