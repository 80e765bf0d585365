//! Configuration module for Paper-Trail
//!
//! A run is configured either from command-line flags or from a TOML file whose
//! values the flags may override. Either way the result is validated before the
//! crawl loop starts.
//!
//! # Example
//!
//! ```no_run
//! use paper_trail::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_user_agent, Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_DELAY_SECS,
    DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
