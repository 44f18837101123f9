//! SearXNG search backend

use super::SearchProvider;
use super::types::SearchHit;
use crate::config::SearchConfig;
use crate::error::{PonderError, PonderResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for a SearXNG instance with the JSON output format enabled
#[derive(Debug, Clone)]
pub struct SearxngClient {
    base_url: String,
    http_client: Client,
}

impl SearxngClient {
    pub fn new(config: &SearchConfig) -> PonderResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ponder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PonderError::search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Extract hits from a SearXNG JSON response, skipping entries without a URL
pub(crate) fn parse_results(json: &Value, limit: usize) -> Vec<SearchHit> {
    json["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| {
                    let url = r["url"].as_str().filter(|u| !u.is_empty())?;
                    Some(SearchHit::new(
                        url,
                        r["title"].as_str().unwrap_or_default(),
                        r["content"].as_str().unwrap_or_default(),
                    ))
                })
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl SearchProvider for SearxngClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn search(&self, query: &str, limit: usize) -> PonderResult<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| PonderError::search(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PonderError::search(format!(
                "search backend returned status {}",
                status.as_u16()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| PonderError::search(format!("invalid search response: {}", e)))?;

        let hits = parse_results(&json, limit);
        debug!(hits = hits.len(), "search completed");
        Ok(hits)
    }
}
