use crate::url::{parse_crawl_url, CrawlScope};
use crate::UrlError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default page budget for a run
pub const DEFAULT_MAX_PAGES: u32 = 200;

/// Default politeness delay between pages (seconds)
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;

/// Main configuration structure for Paper-Trail
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawl behaviour configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; also defines the collection host and path prefix
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of fetch attempts in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Fixed pause after every page (seconds)
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Overrides the path prefix derived from the start URL
    #[serde(rename = "scope-prefix", default)]
    pub scope_prefix: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON Lines file
    pub path: String,

    /// Truncate the file at start instead of appending to it
    #[serde(default)]
    pub overwrite: bool,
}

impl Config {
    /// Builds a configuration with default tuning for the given seed and output file
    pub fn new(start_url: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                start_url: start_url.into(),
                max_pages: DEFAULT_MAX_PAGES,
                delay: DEFAULT_DELAY_SECS,
                scope_prefix: None,
            },
            http: HttpConfig::default(),
            output: OutputConfig {
                path: output_path.into(),
                overwrite: false,
            },
        }
    }

    /// The parsed seed URL
    pub fn start_url(&self) -> Result<Url, UrlError> {
        parse_crawl_url(&self.crawler.start_url)
    }

    /// The collection the crawl is restricted to
    pub fn scope(&self) -> Result<CrawlScope, UrlError> {
        let start_url = self.start_url()?;
        match &self.crawler.scope_prefix {
            Some(prefix) => CrawlScope::with_prefix(&start_url, prefix),
            None => CrawlScope::from_start_url(&start_url),
        }
    }

    /// Politeness delay as a `Duration`
    ///
    /// `validate` rejects values that do not fit; unvalidated ones map to no delay.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.crawler.delay).unwrap_or(Duration::ZERO)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        self.http.timeout()
    }

    /// Output file path
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }
}

impl HttpConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout)
            .unwrap_or(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

/// Format: CrawlerName/Version (+ContactURL)
pub fn default_user_agent() -> String {
    format!(
        "paper-trail/{} (+https://github.com/)",
        env!("CARGO_PKG_VERSION")
    )
}
