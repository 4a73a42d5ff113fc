use crate::parser::{ParseError, extract_all};
use crate::types::{LanguageStat, StatTable};

use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("No stats found for language '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    /// Scraper for the index page served under another origin.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn index_url(&self) -> String {
        format!("{}{}", self.base_url, crate::INDEX_PATH)
    }

    /// Fetches the index page and parses every row of the top 20 table.
    pub async fn fetch_table(&self) -> Result<StatTable, ScraperError> {
        let url = self.index_url();
        log::info!("Fetching TIOBE index from {}...", url);
        let html = self.get_html(&url).await?;
        Ok(extract_all(&html).await?)
    }

    /// Looks up one language by name, ignoring case.
    pub async fn find_language(&self, name: &str) -> Result<LanguageStat, ScraperError> {
        let table = self.fetch_table().await?;
        table
            .find(name)
            .cloned()
            .ok_or_else(|| ScraperError::NotFound(name.to_string()))
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Unexpected status from {}: {}", url, status);
            return Err(ScraperError::UnexpectedStatus(status));
        }

        Ok(response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
