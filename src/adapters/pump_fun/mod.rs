//! Pump.fun Adapter
//!
//! Coin metadata (image, USD market cap, description) from the pump.fun
//! frontend API at `https://frontend-api-v3.pump.fun/coins/{mint}`.
//!
//! # Example
//!
//! ```ignore
//! use mint_explorer::adapters::pump_fun::PumpFunClient;
//!
//! let client = PumpFunClient::new()?;
//! let quote = client.get_metadata("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU").await?;
//! println!("image: {:?}, mcap: {:?}", quote.image, quote.market_cap);
//! ```

mod client;
mod types;

pub use client::{PumpFunClient, PumpFunConfig, DEFAULT_PUMP_FUN_URL};
pub use types::PumpFunCoin;
