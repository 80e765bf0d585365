//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use paper_trail::config::Config;
use paper_trail::crawler::Coordinator;
use paper_trail::output::{ArticleRecord, ArticleSink, JsonlSink, SinkResult};
use paper_trail::state::{CrawlState, StopReason};
use paper_trail::{CrawlError, SinkError};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page with the given number of paragraphs and links
fn html_page(title: &str, paragraphs: usize, links: &[&str]) -> String {
    let paragraphs: String = (1..=paragraphs)
        .map(|i| format!("<p>{} paragraph {}.</p>\n", title, i))
        .collect();
    let links: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a>\n", href, href))
        .collect();

    format!(
        "<html><head><title>{}</title></head><body>\n{}{}</body></html>",
        title, paragraphs, links
    )
}

/// Mounts an HTML page that must be fetched exactly `times` times
async fn mount_page(server: &MockServer, page_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

/// Creates a test configuration seeded at `{server}/toi` with no delay
fn create_test_config(server: &MockServer, output: &Path, max_pages: u32) -> Config {
    let mut config = Config::new(
        format!("{}/toi", server.uri()),
        output.to_string_lossy().to_string(),
    );
    config.crawler.max_pages = max_pages;
    config.crawler.delay = 0.0;
    config.http.timeout = 5.0;
    config
}

fn read_records(output: &Path) -> Vec<Value> {
    std::fs::read_to_string(output)
        .expect("Failed to read output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Output line is not valid JSON"))
        .collect()
}

#[tokio::test]
async fn test_budget_stops_crawl_in_fifo_order() {
    let server = MockServer::start().await;

    // A: article by paragraph count, links to B and C
    mount_page(
        &server,
        "/toi",
        html_page("A", 6, &["/toi/b", "/toi/c"]),
        1,
    )
    .await;
    // B: two paragraphs, links back to A and on to D
    mount_page(&server, "/toi/b", html_page("B", 2, &["/toi", "/toi/d"]), 1).await;
    // C and D stay in the frontier
    mount_page(&server, "/toi/c", html_page("C", 6, &[]), 0).await;
    mount_page(&server, "/toi/d", html_page("D", 6, &[]), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 2);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.articles_written, 1);
    assert_eq!(stats.index_pages, 1);
    assert_eq!(stats.stop_reason, Some(StopReason::BudgetReached));
    assert_eq!(
        coordinator.state(),
        CrawlState::Done(StopReason::BudgetReached)
    );

    let base = server.uri();
    let pending: Vec<String> = coordinator
        .frontier()
        .pending_urls()
        .map(|u| u.to_string())
        .collect();
    assert_eq!(pending, vec![format!("{}/toi/c", base), format!("{}/toi/d", base)]);
    assert!(coordinator.frontier().is_visited(&format!("{}/toi", base)));
    assert!(coordinator.frontier().is_visited(&format!("{}/toi/b", base)));
    assert!(!coordinator.frontier().is_visited(&format!("{}/toi/c", base)));

    drop(coordinator);

    let records = read_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["url"], format!("{}/toi", base));
    assert_eq!(records[0]["title"], "A");
    assert_eq!(
        records[0]["text"],
        "A paragraph 1.\nA paragraph 2.\nA paragraph 3.\nA paragraph 4.\nA paragraph 5.\nA paragraph 6."
    );
}

#[tokio::test]
async fn test_crawl_until_frontier_exhausted() {
    let server = MockServer::start().await;

    // Every page links to every other page; each must still be fetched once
    let all = ["/toi", "/toi/1", "/toi/2", "/toi/3"];
    mount_page(&server, "/toi", html_page("Index", 1, &all), 1).await;
    for (i, page) in all.iter().skip(1).enumerate() {
        let title = format!("Story {}", i + 1);
        mount_page(&server, page, html_page(&title, 5, &all), 1).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 100);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 4);
    assert_eq!(stats.articles_written, 3);
    assert_eq!(stats.links_enqueued, 4);
    assert_eq!(stats.stop_reason, Some(StopReason::FrontierExhausted));
    assert!(coordinator.frontier().is_empty());
    assert_eq!(coordinator.frontier().visited_count(), 4);

    drop(coordinator);

    let records = read_records(&output);
    let titles: Vec<&str> = records
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Story 1", "Story 2", "Story 3"]);
}

#[tokio::test]
async fn test_failures_are_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/toi",
        html_page(
            "Index",
            0,
            &["/toi/missing", "/toi/broken", "/toi/scan.pdf", "/toi/blank", "/toi/good"],
        ),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/toi/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/toi/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/toi/scan.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "/toi/blank", "   ".to_string(), 1).await;

    mount_page(
        &server,
        "/toi/good",
        "<html><body><article><h1>Good</h1><p>Body</p></article></body></html>".to_string(),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 50);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl must survive page failures");

    assert_eq!(stats.pages_fetched, 6);
    assert_eq!(stats.fetch_failures, 3);
    assert_eq!(stats.parse_failures, 1);
    assert_eq!(stats.articles_written, 1);
    assert_eq!(stats.index_pages, 1);

    drop(coordinator);

    let records = read_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Good");
    assert_eq!(records[0]["text"], "Body");
}

#[tokio::test]
async fn test_failed_fetches_count_toward_budget() {
    let server = MockServer::start().await;

    let dead_links: Vec<String> = (1..=5).map(|i| format!("/toi/dead/{}", i)).collect();
    let hrefs: Vec<&str> = dead_links.iter().map(String::as_str).collect();
    mount_page(&server, "/toi", html_page("Index", 0, &hrefs), 1).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 3);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.fetch_failures, 2);

    let requests = server.received_requests().await.expect("Request recording disabled");
    assert_eq!(requests.len(), 3);
    assert_eq!(coordinator.frontier().len(), 3);
}

#[tokio::test]
async fn test_out_of_scope_links_not_followed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/toi",
        html_page(
            "Index",
            0,
            &[
                "/about",
                "/toilet",
                "http://other.example.com/toi/x",
                "mailto:desk@example.com",
                "#top",
                "/toi/in",
            ],
        ),
        1,
    )
    .await;
    mount_page(&server, "/toi/in", html_page("In", 1, &[]), 1).await;
    mount_page(&server, "/about", html_page("About", 9, &[]), 0).await;
    mount_page(&server, "/toilet", html_page("Toilet", 9, &[]), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 50);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.articles_written, 0);
}

#[tokio::test]
async fn test_scope_prefix_override() {
    let server = MockServer::start().await;

    mount_page(&server, "/toi/index.html", html_page("Index", 0, &["/toi/1950/a"]), 1).await;
    mount_page(&server, "/toi/1950/a", html_page("A", 5, &[]), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let mut config = create_test_config(&server, &output, 10);
    config.crawler.start_url = format!("{}/toi/index.html", server.uri());
    config.crawler.scope_prefix = Some("/toi".to_string());

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.articles_written, 1);
}

#[tokio::test]
async fn test_redirect_target_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/toi"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/toi/"))
        .expect(1)
        .mount(&server)
        .await;
    // Links back to itself and to the pre-redirect URL
    mount_page(&server, "/toi/", html_page("Landing", 6, &["./", "/toi"]), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 10);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.articles_written, 1);
    assert_eq!(stats.stop_reason, Some(StopReason::FrontierExhausted));

    let records = read_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["url"], format!("{}/toi/", server.uri()));
}

#[tokio::test]
async fn test_redirect_out_of_scope_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/toi"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/about"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/about", html_page("About", 9, &[]), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 10);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(stats.articles_written, 0);
    assert!(coordinator.frontier().is_empty());
    assert!(std::fs::read_to_string(&output).unwrap().is_empty());
}

#[tokio::test]
async fn test_output_lines_well_formed_and_appended() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/toi",
        r#"<html><head><title>"Quoted" title</title></head><body>
            <article><p>Line with "quotes" and \ backslash</p><p>आज़ादी</p></article>
        </body></html>"#
            .to_string(),
        2,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    // Two separate runs append to the same file
    for _ in 0..2 {
        let config = create_test_config(&server, &output, 5);
        let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
        coordinator.run().await.expect("Crawl failed");
    }

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(!content.starts_with('\u{feff}'));
    assert!(content.ends_with('\n'));

    let records = read_records(&output);
    assert_eq!(records.len(), 2);
    for record in &records {
        let object = record.as_object().expect("Line is not a JSON object");
        assert_eq!(object.len(), 3);
        for key in ["url", "title", "text"] {
            assert!(object[key].is_string(), "{} must be a string", key);
        }
        assert_eq!(object["title"], "\"Quoted\" title");
        assert_eq!(object["text"], "Line with \"quotes\" and \\ backslash\nआज़ादी");
    }
}

#[tokio::test]
async fn test_overwrite_truncates_previous_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/toi", html_page("A", 5, &[]), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    std::fs::write(&output, "old line\n").unwrap();

    let mut config = create_test_config(&server, &output, 5);
    config.output.overwrite = true;
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");
    drop(coordinator);

    let records = read_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "A");
}

/// Sink that fails every write, as a full disk would
struct FailingSink;

impl ArticleSink for FailingSink {
    fn write(&mut self, _record: &ArticleRecord) -> SinkResult<()> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "No space left on device",
        )))
    }

    fn records_written(&self) -> u64 {
        0
    }
}

#[tokio::test]
async fn test_sink_failure_aborts_run() {
    let server = MockServer::start().await;

    mount_page(&server, "/toi", html_page("A", 6, &["/toi/b"]), 1).await;
    mount_page(&server, "/toi/b", html_page("B", 6, &[]), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, &dir.path().join("unused.jsonl"), 10);

    let mut coordinator =
        Coordinator::with_sink(config, FailingSink).expect("Failed to create coordinator");
    let result = coordinator.run().await;

    assert!(matches!(result, Err(CrawlError::Sink(_))));
}

#[tokio::test]
async fn test_in_memory_sink() {
    let server = MockServer::start().await;
    mount_page(&server, "/toi", html_page("A", 5, &[]), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, &dir.path().join("unused.jsonl"), 10);

    let mut coordinator = Coordinator::with_sink(config, JsonlSink::new(Vec::new()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    let sink = coordinator.into_sink();
    assert_eq!(sink.records_written(), 1);
    let bytes = sink.into_inner();
    let record: ArticleRecord =
        serde_json::from_slice(bytes.strip_suffix(b"\n").unwrap()).unwrap();
    assert_eq!(record.title, "A");
    assert_eq!(record.url, format!("{}/toi", server.uri()));
}

#[tokio::test]
async fn test_stop_handle_interrupts_run() {
    let server = MockServer::start().await;
    mount_page(&server, "/toi", html_page("A", 5, &[]), 0).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let config = create_test_config(&server, &output, 10);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.stop_handle().store(true, Ordering::SeqCst);
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 0);
    assert_eq!(stats.stop_reason, Some(StopReason::Interrupted));
    assert_eq!(coordinator.frontier().len(), 1);
}

#[tokio::test]
async fn test_politeness_delay_between_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/toi", html_page("Index", 0, &["/toi/a"]), 1).await;
    mount_page(&server, "/toi/a", html_page("A", 5, &[]), 1).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");
    let mut config = create_test_config(&server, &output, 10);
    config.crawler.delay = 0.2;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert!(
        stats.elapsed >= Duration::from_millis(400),
        "Expected at least two delays, run took {:?}",
        stats.elapsed
    );
}

#[test]
fn test_unwritable_output_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing-dir").join("out.jsonl");
    let config = Config::new("http://127.0.0.1:9/toi", output.to_string_lossy().to_string());

    let result = Coordinator::new(config);
    assert!(matches!(result, Err(CrawlError::Config(_))));
}
