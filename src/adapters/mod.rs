//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Supabase: hosted token table (`TokenStore`)
//! - Pump.fun: coin metadata upstream
//! - Solana Tracker: all-time-high upstream
//! - Gateway: proxy server and its HTTP client (`GatewayPort`)
//! - CLI: Command-line interface handlers

pub mod supabase;
pub mod pump_fun;
pub mod solana_tracker;
pub mod gateway;
pub mod cli;

mod upstream_url;

pub use supabase::SupabaseTokenStore;
pub use pump_fun::PumpFunClient;
pub use solana_tracker::SolanaTrackerClient;
pub use gateway::{GatewayClient, UpstreamApis};
pub use cli::CliApp;
