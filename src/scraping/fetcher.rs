//! Single-shot page fetching
//!
//! One HTTP GET per call: fixed user agent, fixed timeout, default redirect
//! handling, no retry. Every failure mode is folded into `FetchError` so the
//! caller decides what a failed fetch means; nothing propagates past this
//! boundary as a panic.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ScrapingConfig;

/// Errors from a page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// HTTP page fetcher with a fixed request policy.
pub struct PageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Build the fetcher's HTTP client from configuration.
    pub fn new(config: &ScrapingConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Fetch a page body. Single attempt; any non-2xx status or transport
    /// failure is an error value.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(error.to_string())
        }
    }
}
