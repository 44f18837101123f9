//! Page reader that summarizes fetched pages with a language model

use super::{PageReader, truncate_chars};
use crate::agent::Responder;
use crate::config::SearchConfig;
use crate::error::{PonderError, PonderResult};
use crate::llm::LlmMessage;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const EXTRACT_SYSTEM_PROMPT: &str =
    "你是一個網頁內容擷取助手。只根據提供的網頁內容回答，不要加入外部知識。";

/// Fetches a page, converts it to Markdown and asks a responder to extract
/// the parts relevant to the hint
pub struct LlmPageReader {
    http_client: Client,
    responder: Arc<dyn Responder>,
    char_limit: usize,
}

impl LlmPageReader {
    pub fn new(config: &SearchConfig, responder: Arc<dyn Responder>) -> PonderResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ponder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PonderError::search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            responder,
            char_limit: config.page_char_limit,
        })
    }

    async fn fetch(&self, url: &str) -> PonderResult<String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PonderError::search(format!("failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PonderError::http_with_status(
                format!("fetching {} returned status {}", url, status.as_u16()),
                status.as_u16(),
            )
            .with_context(url.to_string()));
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|ct| ct.contains("html"));

        let body = response
            .text()
            .await
            .map_err(|e| PonderError::search(format!("failed to read {}: {}", url, e)))?;

        Ok(page_text(&body, is_html))
    }
}

/// Markdown for HTML bodies, the body itself otherwise
pub(crate) fn page_text(body: &str, is_html: bool) -> String {
    if is_html {
        html2md::parse_html(body)
    } else {
        body.to_string()
    }
}

pub(crate) fn extraction_prompt(hint: &str, page: &str) -> Vec<LlmMessage> {
    vec![
        LlmMessage::system(EXTRACT_SYSTEM_PROMPT),
        LlmMessage::user(format!(
            "標題: {}\n\n網頁內容:\n{}\n\n請擷取與標題相關的重點內容，條列整理。",
            hint, page
        )),
    ]
}

#[async_trait]
impl PageReader for LlmPageReader {
    #[instrument(skip(self))]
    async fn read_page(&self, url: &str, hint: &str) -> PonderResult<String> {
        let text = self.fetch(url).await?;
        let page = truncate_chars(text.trim(), self.char_limit);
        debug!(chars = page.chars().count(), "page fetched");

        if page.is_empty() {
            return Ok(String::new());
        }

        self.responder.ask(&extraction_prompt(hint, page)).await
    }
}
