//! Collection scope
//!
//! Decides whether a discovered link stays on the start URL's host and under its
//! collection path.

use crate::url::normalize::{check_crawl_url, is_http_scheme};
use crate::UrlError;
use url::Url;

/// The part of a site a crawl is allowed to visit
///
/// A URL is in scope when it uses http(s), has the same host and explicit port
/// as the start URL, and its path lies under the collection path prefix.
/// The scheme itself is not compared, so `http` and `https` links to the same
/// collection are both followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
    port: Option<u16>,
    path_prefix: String,
}

impl CrawlScope {
    /// Derives the scope from the start URL: its host and its full path
    ///
    /// # Examples
    ///
    /// ```
    /// use paper_trail::url::CrawlScope;
    /// use url::Url;
    ///
    /// let start = Url::parse("http://www.ndl.gov.in/nw_document/toi/").unwrap();
    /// let scope = CrawlScope::from_start_url(&start).unwrap();
    /// assert_eq!(scope.path_prefix(), "/nw_document/toi");
    ///
    /// let inside = Url::parse("http://www.ndl.gov.in/nw_document/toi/1947/08/15").unwrap();
    /// let outside = Url::parse("http://www.ndl.gov.in/about").unwrap();
    /// assert!(scope.contains(&inside));
    /// assert!(!scope.contains(&outside));
    /// ```
    pub fn from_start_url(start_url: &Url) -> Result<Self, UrlError> {
        Self::with_prefix(start_url, start_url.path())
    }

    /// Builds a scope on the start URL's host with an explicit path prefix
    pub fn with_prefix(start_url: &Url, prefix: &str) -> Result<Self, UrlError> {
        let start_url = check_crawl_url(start_url.clone())?;
        let host = start_url
            .host_str()
            .map(|h| h.to_lowercase())
            .ok_or(UrlError::MissingHost)?;

        Ok(Self {
            host,
            port: start_url.port(),
            path_prefix: normalize_prefix(prefix),
        })
    }

    /// The host every in-scope URL must have
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The collection path prefix, without a trailing slash
    ///
    /// An empty prefix means the whole host is in scope.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Checks whether a URL belongs to the crawled collection
    pub fn contains(&self, url: &Url) -> bool {
        if !is_http_scheme(url) {
            return false;
        }

        let same_host = url
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.host));
        if !same_host || url.port() != self.port {
            return false;
        }

        path_under_prefix(&self.path_prefix, url.path())
    }
}

/// Trims the trailing slash and makes sure the prefix is rooted
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Segment-aware prefix match: `/toi` covers `/toi` and `/toi/x`, not `/toilet`
fn path_under_prefix(prefix: &str, path: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
