//! Run statistics
//!
//! Counters kept by the crawl loop and the end-of-run report printed by the
//! command-line tool.

use crate::state::{PageOutcome, StopReason};
use std::time::Duration;

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStats {
    /// Fetch attempts made; bounded by the page budget
    pub pages_fetched: u64,

    /// Article records written to the sink
    pub articles_written: u64,

    /// Pages fetched and used only as link sources
    pub index_pages: u64,

    /// Fetch attempts that failed (network, status, content type)
    pub fetch_failures: u64,

    /// Bodies that could not be parsed into a document
    pub parse_failures: u64,

    /// Dequeued URLs dropped because they had already been visited
    pub duplicates_skipped: u64,

    /// URLs appended to the frontier, seed included
    pub links_enqueued: u64,

    /// Why the run stopped, once it has
    pub stop_reason: Option<StopReason>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Counts one page outcome
    pub fn record(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Article => self.articles_written += 1,
            PageOutcome::Index => self.index_pages += 1,
            PageOutcome::FetchFailed(_) => self.fetch_failures += 1,
            PageOutcome::ParseFailed(_) => self.parse_failures += 1,
        }
    }

    /// Pages that were fetched and parsed successfully
    pub fn pages_succeeded(&self) -> u64 {
        self.articles_written + self.index_pages
    }

    /// Percentage of fetch attempts that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            0.0
        } else {
            (self.pages_succeeded() as f64 / self.pages_fetched as f64) * 100.0
        }
    }

    /// Pages per second over the whole run
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_fetched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Articles written: {}", stats.articles_written);
    println!("  Index pages: {}", stats.index_pages);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  Duplicates skipped: {}", stats.duplicates_skipped);
    println!();

    if stats.fetch_failures + stats.parse_failures > 0 {
        println!("Error Summary:");
        println!("  Fetch failures: {}", stats.fetch_failures);
        println!("  Parse failures: {}", stats.parse_failures);
        println!();
    }

    if let Some(reason) = stats.stop_reason {
        println!("Stopped: {}", reason);
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed in {:.1}s)",
        stats.success_rate(),
        stats.pages_succeeded(),
        stats.pages_fetched,
        stats.elapsed.as_secs_f64()
    );
    println!("Throughput: {:.2} pages/sec", stats.rate());
}
