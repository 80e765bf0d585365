//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the run-level state machine (`Running` / `Done`)
//! - `PageOutcome`: what happened to each fetched page

mod crawl_state;
mod page_outcome;

// Re-export main types
pub use crawl_state::{CrawlState, StopReason};
pub use page_outcome::PageOutcome;
