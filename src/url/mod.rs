//! URL handling module for Paper-Trail
//!
//! This module validates crawl URLs and decides which discovered links belong to
//! the collection being crawled.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{check_crawl_url, is_http_scheme, parse_crawl_url};
pub use scope::CrawlScope;
