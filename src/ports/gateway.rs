//! Gateway Port
//!
//! The two upstream lookups the explorer needs, keyed by mint:
//! - coin metadata (image + current market cap) from pump.fun
//! - all-time-high market cap from Solana Tracker
//!
//! Implemented by the HTTP gateway client (talks to our proxy) and by
//! `UpstreamApis` (talks to the third-party APIs directly).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Failed to parse upstream response: {0}")]
    ParseError(String),

    #[error("Upstream returned an empty body")]
    EmptyBody,

    #[error("Not a mint address: {0:?}")]
    InvalidMint(String),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// The subset of coin metadata the explorer shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataQuote {
    pub image: Option<String>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    /// Only populated when talking to pump.fun directly; the proxy strips it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[async_trait]
pub trait GatewayPort: Send + Sync {
    /// Image and current market cap for a mint
    async fn coin_metadata(&self, mint: &str) -> Result<MetadataQuote, UpstreamError>;

    /// Raw all-time-high payload for a mint
    async fn all_time_high(&self, mint: &str) -> Result<serde_json::Value, UpstreamError>;
}
