//! Output sink trait
//!
//! This module defines the trait interface the crawl loop uses to persist
//! article records.

use crate::output::ArticleRecord;
use crate::SinkError;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for extracted article records
///
/// Implementations must have made the record durable (or at least handed it to
/// the OS) before `write` returns. A returned error is fatal for the run.
pub trait ArticleSink {
    /// Persists one record
    fn write(&mut self, record: &ArticleRecord) -> SinkResult<()>;

    /// Number of records written so far
    fn records_written(&self) -> u64;
}

