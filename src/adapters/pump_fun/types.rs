//! Pump.fun Types
//!
//! Response shape of the pump.fun frontend API `GET /coins/{mint}`.
//! Only the fields the explorer reads are modelled; the rest is ignored.

use serde::{Deserialize, Serialize};

use crate::ports::MetadataQuote;

/// Coin information from pump.fun
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PumpFunCoin {
    /// Token mint address
    #[serde(default)]
    pub mint: Option<String>,
    /// Token name
    #[serde(default)]
    pub name: Option<String>,
    /// Token symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Token description (from metadata)
    #[serde(default)]
    pub description: Option<String>,
    /// Token image (usually IPFS)
    #[serde(default)]
    pub image_uri: Option<String>,
    /// Current market cap in USD
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
    /// Whether the bonding curve has completed
    #[serde(default)]
    pub complete: Option<bool>,
}

impl PumpFunCoin {
    /// Reduce to the fields the explorer displays
    pub fn into_quote(self) -> MetadataQuote {
        MetadataQuote {
            image: self.image_uri,
            market_cap: self.usd_market_cap,
            description: self.description,
        }
    }
}
