//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link extraction
//! - Article classification and content extraction
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination, entered through [`run_crawl`]

mod classify;
mod coordinator;
mod extract;
mod fetcher;
mod frontier;
mod parser;

pub use classify::{
    article_signal, count_text_paragraphs, is_article, ArticleSignal, MIN_ARTICLE_PARAGRAPHS,
};
pub use coordinator::{run_crawl, Coordinator};
pub use extract::{extract_article, ExtractedContent, UNTITLED};
pub use fetcher::{build_http_client, fetch_url, is_html_content_type, FetchResult};
pub use frontier::Frontier;
pub use parser::{extract_links, parse_document};

