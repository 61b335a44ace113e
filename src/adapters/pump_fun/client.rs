//! Pump.fun API Client
//!
//! Fetches coin metadata from the pump.fun frontend API. The API rejects
//! requests without a browser-like User-Agent.

use std::time::Duration;
use reqwest::Client;

use crate::adapters::upstream_url::mint_endpoint;
use crate::ports::{MetadataQuote, UpstreamError};
use super::types::PumpFunCoin;

pub const DEFAULT_PUMP_FUN_URL: &str = "https://frontend-api-v3.pump.fun";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct PumpFunConfig {
    /// Base URL for the pump.fun frontend API
    pub api_base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PumpFunConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_PUMP_FUN_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PumpFunClient {
    config: PumpFunConfig,
    http: Client,
}

impl PumpFunClient {
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_config(PumpFunConfig::default())
    }

    pub fn with_config(config: PumpFunConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self { config, http })
    }

    /// Full coin record for a mint
    pub async fn get_coin(&self, mint: &str) -> Result<PumpFunCoin, UpstreamError> {
        let url = mint_endpoint(&self.config.api_base_url, mint, &["coins", "{mint}"])?;

        let response = self.http.get(url).send().await?;
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

    /// Image, market cap and description for a mint
    pub async fn get_metadata(&self, mint: &str) -> Result<MetadataQuote, UpstreamError> {
        Ok(self.get_coin(mint).await?.into_quote())
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }
}
