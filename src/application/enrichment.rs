//! Enrichment Fetcher
//!
//! Looks up supplementary fields for a mint through the gateway port.
//! Every failure (transport, non-success status, empty or malformed body)
//! is logged and turned into `None`: a missing image or market cap must
//! never abort a page load or a hover.

use std::sync::Arc;

use crate::ports::{GatewayPort, MetadataQuote};

/// Field of the Solana Tracker ATH payload holding the market cap
const ATH_FIELD: &str = "highest_market_cap";

#[derive(Clone)]
pub struct EnrichmentFetcher {
    gateway: Arc<dyn GatewayPort>,
}

impl EnrichmentFetcher {
    pub fn new(gateway: Arc<dyn GatewayPort>) -> Self {
        Self { gateway }
    }

    /// Image, current market cap and (direct mode only) description
    pub async fn fetch_metadata(&self, mint: &str) -> Option<MetadataQuote> {
        if mint.trim().is_empty() {
            return None;
        }

        match self.gateway.coin_metadata(mint).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!("Error fetching pump data for {}: {}", mint, e);
                None
            }
        }
    }

    /// All-time-high market cap in USD
    pub async fn fetch_all_time_high(&self, mint: &str) -> Option<f64> {
        if mint.trim().is_empty() {
            return None;
        }

        match self.gateway.all_time_high(mint).await {
            Ok(payload) => {
                let ath = payload.get(ATH_FIELD).and_then(serde_json::Value::as_f64);
                if ath.is_none() {
                    tracing::warn!("ATH payload for {} has no numeric {}", mint, ATH_FIELD);
                }
                ath
            }
            Err(e) => {
                tracing::warn!("Error fetching Solana Tracker data for {}: {}", mint, e);
                None
            }
        }
    }
}
