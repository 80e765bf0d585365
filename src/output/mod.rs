//! Output module for article records and run statistics
//!
//! This module handles:
//! - The `ArticleRecord` written for every article page
//! - Appending records to a JSON Lines file
//! - Counting and reporting what a run did

mod jsonl;
mod record;
pub mod stats;
mod traits;

pub use jsonl::JsonlSink;
pub use record::ArticleRecord;
pub use stats::{print_statistics, CrawlStats};
pub use traits::{ArticleSink, SinkResult};
