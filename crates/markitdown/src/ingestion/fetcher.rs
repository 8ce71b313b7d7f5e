//! Web page fetching

use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{Error, Result};

use super::html::html_to_text;

/// Fetches web pages and reduces them to readable text
pub struct UrlFetcher {
    client: Client,
}

impl UrlFetcher {
    /// Create a fetcher with the configured timeout and user agent
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// GET the page and return its cleaned text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let html = self.fetch_html(url).await?;
        Ok(html_to_text(&html))
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::fetch(url, format!("failed to read body: {}", e)))
    }
}
