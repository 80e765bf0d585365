//! Page outcome definitions for one crawl iteration
//!
//! Every fetched URL ends in exactly one of these outcomes. None of them stop the
//! crawl; they only drive logging and the run counters.

use std::fmt;

/// What happened to a single page during the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was classified as an article and a record was written
    Article,

    /// Page was used purely as a link source
    Index,

    /// Network error, timeout, non-2xx status or non-HTML content
    FetchFailed(String),

    /// Body was fetched but could not be turned into a document
    ParseFailed(String),
}

impl PageOutcome {
    /// Returns true if the page was dropped because of a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_) | Self::ParseFailed(_))
    }

    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Index => "index",
            Self::FetchFailed(_) => "fetch_failed",
            Self::ParseFailed(_) => "parse_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(reason) | Self::ParseFailed(reason) => {
                write!(f, "{}: {}", self.label(), reason)
            }
            _ => write!(f, "{}", self.label()),
        }
    }
}
