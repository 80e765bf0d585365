//! Content extraction for article pages

use crate::crawler::parser::{element_text, select_all, select_within, trimmed_text};
use scraper::Html;

/// Title used when a page has neither a heading nor a `<title>`
pub const UNTITLED: &str = "untitled";

/// Title and body text of an article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub text: String,
}

/// Extracts the title and paragraph text of an article page
///
/// - Title: the first `<h1>` if it has text, else `<title>`, else `"untitled"`.
///   Only the ends are trimmed.
/// - Text: the `<p>` elements of the first `<article>` when there is one,
///   otherwise every `<p>` in the document. Each paragraph's text nodes are
///   trimmed and joined by a space. Empty paragraphs are dropped and the rest
///   joined with `\n`. A page with no paragraphs yields empty text.
///
/// # Example
///
/// ```
/// use paper_trail::crawler::{extract_article, parse_document};
///
/// let html = "<html><head><title>Bar</title></head><body><h1>Foo</h1><p>One</p><p>Two</p></body></html>";
/// let content = extract_article(&parse_document(html).unwrap());
/// assert_eq!(content.title, "Foo");
/// assert_eq!(content.text, "One\nTwo");
/// ```
pub fn extract_article(document: &Html) -> ExtractedContent {
    ExtractedContent {
        title: extract_title(document),
        text: extract_text(document),
    }
}

fn extract_title(document: &Html) -> String {
    let first_text = |css: &str| {
        select_all(document, css)
            .into_iter()
            .next()
            .map(trimmed_text)
            .filter(|s| !s.is_empty())
    };

    first_text("h1")
        .or_else(|| first_text("title"))
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn extract_text(document: &Html) -> String {
    let paragraphs = match select_all(document, "article").into_iter().next() {
        Some(article) => select_within(article, "p"),
        None => select_all(document, "p"),
    };

    paragraphs
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
