//! Solana Tracker API Client
//!
//! All-time-high market cap lookups from the Solana Tracker data API.
//! Authenticated with a server-side `x-api-key` that must never reach a
//! browser, so the key is kept out of `Debug` output.

use std::fmt;
use std::time::Duration;
use reqwest::Client;

use crate::adapters::upstream_url::mint_endpoint;
use crate::ports::UpstreamError;

pub const DEFAULT_SOLANA_TRACKER_URL: &str = "https://data.solanatracker.io";

#[derive(Clone)]
pub struct SolanaTrackerConfig {
    /// Base URL for the data API
    pub api_base_url: String,
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SolanaTrackerConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_SOLANA_TRACKER_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl fmt::Debug for SolanaTrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaTrackerConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SolanaTrackerClient {
    config: SolanaTrackerConfig,
    http: Client,
}

impl SolanaTrackerClient {
    pub fn with_config(config: SolanaTrackerConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// ATH payload for a mint, passed through as returned by the API
    pub async fn get_ath(&self, mint: &str) -> Result<serde_json::Value, UpstreamError> {
        let url = mint_endpoint(&self.config.api_base_url, mint, &["tokens", "{mint}", "ath"])?;

        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(UpstreamError::EmptyBody);
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::ParseError(e.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }
}
