//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Redirect reporting
//! - Error classification
//!
//! There are no retries. Every outcome other than `Success` is a fetch failure
//! that the crawl loop logs and moves past. Redirects are not followed here; the
//! crawl loop queues the target like any other discovered link, so the visited
//! set and the scope check apply to it.

use crate::config::HttpConfig;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Upper bound for establishing a connection, independent of the total timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a 3xx status
    Redirect {
        /// The HTTP status code
        status_code: u16,
        /// Resolved `Location` target, if the header was present and valid
        location: Option<Url>,
    },

    /// Server answered with a non-2xx, non-3xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status_code, .. } => write!(f, "HTTP {}", status_code),
            Self::ContentMismatch { content_type } => {
                write!(f, "Expected HTML, got {}", content_type)
            }
            Self::Redirect {
                status_code,
                location: Some(location),
            } => write!(f, "HTTP {} redirect to {}", status_code, location),
            Self::Redirect {
                status_code,
                location: None,
            } => write!(f, "HTTP {} redirect without a usable Location", status_code),
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::NetworkError { error } => write!(f, "{}", error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration (user agent and timeout)
///
/// # Example
///
/// ```no_run
/// use paper_trail::config::HttpConfig;
/// use paper_trail::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.timeout();

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .redirect(Policy::none()) // Redirect targets go back through the frontier
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx, HTML or missing Content-Type | Success |
/// | 2xx, other Content-Type | ContentMismatch |
/// | 3xx | Redirect |
/// | Other status | HttpError |
/// | Timeout / connection error / body error | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_request_error(&e),
    };

    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|target| response.url().join(target.trim()).ok())
            .map(|mut target| {
                target.set_fragment(None);
                target
            });

        return FetchResult::Redirect {
            status_code: status.as_u16(),
            location,
        };
    }

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_request_error(&e),
    }
}

fn classify_request_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

/// Returns true for HTML content types
///
/// A missing header is given the benefit of the doubt.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.is_empty()
        || content_type.starts_with("text/html")
        || content_type.starts_with("application/xhtml+xml")
}
