//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Managing the frontier queue and visited set
//! - Coordinating fetching, classification, extraction and link extraction
//! - Writing article records to the sink
//! - Enforcing the page budget and the politeness delay
//! - Handling interrupts

use crate::config::{validate, Config};
use crate::crawler::classify::article_signal;
use crate::crawler::extract::extract_article;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_links, parse_document};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{ArticleRecord, ArticleSink, CrawlStats, JsonlSink};
use crate::state::{CrawlState, PageOutcome, StopReason};
use crate::url::CrawlScope;
use crate::{ConfigError, CrawlError};
use reqwest::Client;
use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// How often (in pages) progress is logged
const PROGRESS_INTERVAL: u64 = 10;

/// What one fetched page contributed to the crawl
#[derive(Debug)]
struct AnalyzedPage {
    /// Record to write, if the page is an article
    record: Option<ArticleRecord>,

    /// In-scope links, in document order
    links: Vec<Url>,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ArticleSink = JsonlSink<File>> {
    config: Config,
    scope: CrawlScope,
    client: Client,
    frontier: Frontier,
    sink: S,
    state: CrawlState,
    stats: CrawlStats,
    delay: Duration,
    stop_requested: Arc<AtomicBool>,
}

impl Coordinator<JsonlSink<File>> {
    /// Creates a coordinator writing to the configured output file
    ///
    /// The configuration is validated and the output file opened here, so a bad
    /// start URL or an unwritable output path fails before anything is fetched.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration or unwritable output
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;

        let path = config.output_path();
        let sink = JsonlSink::open(&path, config.output.overwrite)
            .map_err(|source| ConfigError::OutputPath { path, source })?;

        Self::build(config, sink)
    }
}

impl<S: ArticleSink> Coordinator<S> {
    /// Creates a coordinator writing to the given sink
    pub fn with_sink(config: Config, sink: S) -> Result<Self, CrawlError> {
        validate(&config)?;
        Self::build(config, sink)
    }

    fn build(config: Config, sink: S) -> Result<Self, CrawlError> {
        let start_url = config.start_url()?;
        let scope = config.scope()?;
        let client = build_http_client(&config.http)?;
        let delay = config.delay();

        let mut stats = CrawlStats::default();
        let frontier = Frontier::new(start_url);
        stats.links_enqueued = frontier.len() as u64;

        Ok(Self {
            config,
            scope,
            client,
            frontier,
            sink,
            state: CrawlState::Running,
            stats,
            delay,
            stop_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that stops the run before the next page when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_requested)
    }

    /// Runs the main crawl loop until the run is `Done`
    ///
    /// Each iteration:
    /// 1. Stops if the frontier is empty or the page budget is spent
    /// 2. Pops the oldest URL, skipping it if already visited
    /// 3. Marks it visited and fetches it (the attempt counts toward the budget)
    /// 4. Writes a record if the page is an article
    /// 5. Queues the page's unseen in-scope links
    /// 6. Sleeps for the politeness delay
    ///
    /// Fetch and parse failures are logged and skipped. Only a sink failure
    /// aborts the run.
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlError> {
        let max_pages = u64::from(self.config.crawler.max_pages);
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl at {} (scope: {}{}, max pages: {}, delay: {:?})",
            self.config.crawler.start_url,
            self.scope.host(),
            self.scope.path_prefix(),
            max_pages,
            self.delay
        );

        while self.state.is_running() {
            if self.stop_requested.load(Ordering::SeqCst) {
                self.state.finish(StopReason::Interrupted);
                break;
            }

            if self.frontier.is_empty() {
                self.state.finish(StopReason::FrontierExhausted);
                break;
            }

            if self.stats.pages_fetched >= max_pages {
                self.state.finish(StopReason::BudgetReached);
                break;
            }

            let Some(url) = self.frontier.pop() else {
                continue;
            };

            if !self.frontier.mark_visited(&url) {
                tracing::debug!("Skipping already visited URL: {}", url);
                self.stats.duplicates_skipped += 1;
                continue;
            }

            self.stats.pages_fetched += 1;
            tracing::debug!("Processing URL: {}", url);

            let outcome = self.process_url(&url).await?;
            if outcome.is_failure() {
                tracing::warn!("Skipping {} ({})", url, outcome);
            } else {
                tracing::debug!("{} -> {}", url, outcome);
            }
            self.stats.record(&outcome);

            if self.stats.pages_fetched % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = self.stats.pages_fetched as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages fetched, {} articles, {} in frontier, {:.2} pages/sec",
                    self.stats.pages_fetched,
                    self.stats.articles_written,
                    self.frontier.len(),
                    rate
                );
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.stats.stop_reason = self.state.stop_reason();
        self.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished ({}): {} pages fetched, {} articles written, {} still in frontier, took {:?}",
            self.state
                .stop_reason()
                .map(|r| r.to_string())
                .unwrap_or_default(),
            self.stats.pages_fetched,
            self.stats.articles_written,
            self.frontier.len(),
            self.stats.elapsed
        );

        Ok(self.stats.clone())
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page
    /// 2. Parses, classifies and extracts it
    /// 3. Writes the article record, if any
    /// 4. Queues discovered links
    ///
    /// A redirect is a fetch failure whose target, when in scope, is queued
    /// like a discovered link.
    async fn process_url(&mut self, url: &Url) -> Result<PageOutcome, CrawlError> {
        let body = match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                if let FetchResult::Redirect {
                    location: Some(target),
                    ..
                } = &failure
                {
                    self.enqueue_redirect(url, target.clone());
                }
                return Ok(PageOutcome::FetchFailed(failure.to_string()));
            }
        };

        let analyzed = match analyze_page(url, &body, &self.scope) {
            Ok(page) => page,
            Err(reason) => return Ok(PageOutcome::ParseFailed(reason)),
        };

        let outcome = match analyzed.record {
            Some(record) => {
                self.sink.write(&record)?;
                PageOutcome::Article
            }
            None => PageOutcome::Index,
        };

        let mut queued = 0;
        for link in analyzed.links {
            if self.frontier.push(link) {
                queued += 1;
            }
        }
        self.stats.links_enqueued += queued;
        tracing::trace!("Queued {} new links from {}", queued, url);

        Ok(outcome)
    }

    fn enqueue_redirect(&mut self, from: &Url, target: Url) {
        if !self.scope.contains(&target) {
            tracing::debug!("Redirect from {} leaves the collection: {}", from, target);
            return;
        }

        if self.frontier.push(target) {
            self.stats.links_enqueued += 1;
        }
    }

    /// Current run state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Pending and visited URLs
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// The collection this run is restricted to
    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Borrows the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the coordinator, releasing everything but the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Parses a fetched body and derives the record and links from it
///
/// The parsed document never leaves this function.
fn analyze_page(
    url: &Url,
    body: &str,
    scope: &CrawlScope,
) -> Result<AnalyzedPage, String> {
    let document = parse_document(body)?;

    let record = article_signal(&document).map(|signal| {
        tracing::debug!("{} classified as article ({:?})", url, signal);
        let content = extract_article(&document);
        ArticleRecord::new(url.as_str(), content.title, content.text)
    });

    let links = extract_links(&document, url, scope);

    Ok(AnalyzedPage { record, links })
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use paper_trail::config::Config;
/// use paper_trail::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::new("http://www.ndl.gov.in/nw_document/toi", "toi.jsonl");
/// let stats = run_crawl(config).await?;
/// println!("{} articles", stats.articles_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStats, CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
