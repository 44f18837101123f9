//! Search result types

use serde::{Deserialize, Serialize};

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }

    /// One-line summary used in prompts
    pub fn summary(&self) -> String {
        format!("[{}]({}) {}", self.title, self.url, self.snippet)
    }
}
