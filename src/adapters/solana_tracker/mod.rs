//! Solana Tracker Adapter
//!
//! All-time-high market cap from `https://data.solanatracker.io/tokens/{mint}/ath`.

mod client;

pub use client::{SolanaTrackerClient, SolanaTrackerConfig, DEFAULT_SOLANA_TRACKER_URL};
