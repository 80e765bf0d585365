//! Crawl URL parsing

use crate::UrlError;
use url::Url;

/// Parses an absolute crawl URL
///
/// # Rules
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Only `http` and `https` schemes are accepted
/// 3. The URL must carry a host
/// 4. The fragment is dropped, since it never changes what the server returns
///
/// # Examples
///
/// ```
/// use paper_trail::url::parse_crawl_url;
///
/// let url = parse_crawl_url("http://www.ndl.gov.in/nw_document/toi#top").unwrap();
/// assert_eq!(url.as_str(), "http://www.ndl.gov.in/nw_document/toi");
/// assert!(parse_crawl_url("ftp://example.com/file").is_err());
/// ```
pub fn parse_crawl_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_crawl_url(url)
}

/// Applies the scheme/host checks of [`parse_crawl_url`] to an already parsed URL
pub fn check_crawl_url(mut url: Url) -> Result<Url, UrlError> {
    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns true for `http` and `https` URLs
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
