//! HTML parser for turning response bodies into documents and links
//!
//! This module handles:
//! - Parsing a response body into a `scraper::Html` document
//! - Extracting the in-scope links to follow from `<a href>` elements
//! - Small selector helpers shared by the classifier and extractor

use crate::url::{check_crawl_url, CrawlScope};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Parses a response body into a document
///
/// The HTML5 parser recovers from any markup, so the only body rejected here is
/// one with no content at all.
pub fn parse_document(body: &str) -> Result<Html, String> {
    if body.trim().is_empty() {
        return Err("Empty response body".to_string());
    }

    Ok(Html::parse_document(body))
}

/// Extracts all in-scope links from the document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Non-HTTP(S) URLs after resolution
/// - URLs outside the crawl scope
///
/// Fragments are stripped from the resolved URLs. The result holds each URL once,
/// in the order it first appears in the document.
///
/// # Example
///
/// ```
/// use paper_trail::crawler::{extract_links, parse_document};
/// use paper_trail::url::CrawlScope;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/toi/index").unwrap();
/// let scope = CrawlScope::from_start_url(&Url::parse("http://example.com/toi").unwrap()).unwrap();
/// let html = r#"<a href="/toi/a">A</a><a href="http://other.com/x">X</a>"#;
///
/// let document = parse_document(html).unwrap();
/// let links = extract_links(&document, &base, &scope);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "http://example.com/toi/a");
/// ```
pub fn extract_links(document: &Html, base_url: &Url, scope: &CrawlScope) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for element in select_all(document, "a[href]") {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_link(href, base_url) else {
            continue;
        };

        if !scope.contains(&absolute_url) {
            tracing::trace!("Out of scope: {}", absolute_url);
            continue;
        }

        if seen.insert(absolute_url.as_str().to_string()) {
            links.push(absolute_url);
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    check_crawl_url(absolute_url).ok()
}

/// Selects all elements matching a CSS selector
///
/// An invalid selector matches nothing.
pub(crate) fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Selects all descendants of an element matching a CSS selector
pub(crate) fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text nodes of an element, each trimmed, blank ones dropped, joined by a space
///
/// Whitespace inside a text node is kept as is.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full text content of an element with only the ends trimmed
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
