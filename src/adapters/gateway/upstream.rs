//! Direct upstream access
//!
//! `GatewayPort` implemented by calling pump.fun and Solana Tracker
//! straight away. This is what the proxy server runs on, and what the CLI
//! uses when no proxy URL is configured.

use async_trait::async_trait;

use crate::adapters::pump_fun::PumpFunClient;
use crate::adapters::solana_tracker::SolanaTrackerClient;
use crate::ports::{GatewayPort, MetadataQuote, UpstreamError};

#[derive(Debug, Clone)]
pub struct UpstreamApis {
    pump_fun: PumpFunClient,
    solana_tracker: SolanaTrackerClient,
}

impl UpstreamApis {
    pub fn new(pump_fun: PumpFunClient, solana_tracker: SolanaTrackerClient) -> Self {
        Self {
            pump_fun,
            solana_tracker,
        }
    }
}

#[async_trait]
impl GatewayPort for UpstreamApis {
    async fn coin_metadata(&self, mint: &str) -> Result<MetadataQuote, UpstreamError> {
        self.pump_fun.get_metadata(mint).await
    }

    async fn all_time_high(&self, mint: &str) -> Result<serde_json::Value, UpstreamError> {
        self.solana_tracker.get_ath(mint).await
    }
}
