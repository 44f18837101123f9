//! Web search and page reading collaborators for the research workflow

pub mod reader;
pub mod searxng;
pub mod types;

pub use reader::LlmPageReader;
pub use searxng::SearxngClient;
pub use types::SearchHit;

use crate::error::PonderResult;
use async_trait::async_trait;

/// A web search backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Up to `limit` hits for the query; an empty list is a valid answer
    async fn search(&self, query: &str, limit: usize) -> PonderResult<Vec<SearchHit>>;
}

/// Turns a web page into text relevant to a hint (usually the page title)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageReader: Send + Sync {
    async fn read_page(&self, url: &str, hint: &str) -> PonderResult<String>;
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
