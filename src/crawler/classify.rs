//! Article classifier
//!
//! Decides whether a fetched page is an article or an index page with a fixed,
//! ordered list of checks:
//!
//! 1. the document has an `<article>` element;
//! 2. otherwise, it has at least [`MIN_ARTICLE_PARAGRAPHS`] `<p>` elements with
//!    non-whitespace text;
//! 3. otherwise it is an index page, used only as a link source.

use crate::crawler::parser::select_all;
use scraper::Html;

/// Paragraph count at which a page without `<article>` counts as an article
pub const MIN_ARTICLE_PARAGRAPHS: usize = 5;

/// The check that marked a page as an article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSignal {
    /// Page has an `<article>` element
    ArticleElement,

    /// Page has this many non-empty paragraphs
    Paragraphs(usize),
}

/// Returns which check, if any, classifies the document as an article
pub fn article_signal(document: &Html) -> Option<ArticleSignal> {
    if !select_all(document, "article").is_empty() {
        return Some(ArticleSignal::ArticleElement);
    }

    let paragraphs = count_text_paragraphs(document);
    if paragraphs >= MIN_ARTICLE_PARAGRAPHS {
        return Some(ArticleSignal::Paragraphs(paragraphs));
    }

    None
}

/// Returns true if the document looks like an article
pub fn is_article(document: &Html) -> bool {
    article_signal(document).is_some()
}

/// Counts `<p>` elements containing any non-whitespace text
pub fn count_text_paragraphs(document: &Html) -> usize {
    select_all(document, "p")
        .into_iter()
        .filter(|p| p.text().any(|t| !t.trim().is_empty()))
        .count()
}
