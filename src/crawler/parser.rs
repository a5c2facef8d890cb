//! HTML parser for extracting links and page content
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags, in document order)
//! - Page title
//! - Visible body text
//!
//! Only the links feed the crawl; title and text are exposed for callers that
//! want them.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// All crawlable links found on the page (absolute http/https URLs)
    pub links: Vec<String>,

    /// The page title (from the first `<title>` tag)
    pub title: Option<String>,

    /// Whitespace-collapsed text of `<body>`
    pub text: String,
}

/// Turns a fetched page into the links it points at
pub trait LinkExtractor: Send + Sync {
    /// Returns absolute http/https URLs in document order
    ///
    /// Undecodable or unparseable input yields no links rather than an error.
    fn extract(&self, body: &[u8], page_url: &Url) -> Vec<String>;
}

/// [`LinkExtractor`] backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &[u8], page_url: &Url) -> Vec<String> {
        let html = String::from_utf8_lossy(body);
        parse_html(&html, page_url).links
    }
}

/// Returns true if a Content-Type header value denotes HTML
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// - Every `<a href="...">` is resolved against `base_url`
/// - References that fail to parse are skipped
/// - References resolving to anything but http/https are skipped
///   (`javascript:`, `mailto:`, `tel:`, `data:`, ...)
/// - Duplicates are kept; deduplication belongs to the visited set
///
/// # Example
///
/// ```
/// use hostcrawl::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_links(&document, base_url),
        title: extract_title(&document),
        text: extract_text(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all crawlable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Extracts the body text with runs of whitespace collapsed to one space
fn extract_text(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    document
        .select(&body_selector)
        .flat_map(|body| body.text())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
