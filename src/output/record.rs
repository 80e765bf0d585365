use serde::{Deserialize, Serialize};

/// One extracted article, as written to the output file
///
/// Serialises to exactly `{"url": ..., "title": ..., "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// URL the article was fetched from
    pub url: String,

    /// Headline, or `"untitled"`
    pub title: String,

    /// Paragraph text joined with newlines; may be empty
    pub text: String,
}

impl ArticleRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}
