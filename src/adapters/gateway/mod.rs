//! Upstream Gateway
//!
//! - `server`: axum proxy exposing `/proxy/metadata` and `/proxy/all-time-high`
//! - `client`: HTTP client for those endpoints (implements `GatewayPort`)
//! - `upstream`: direct pump.fun + Solana Tracker access (implements `GatewayPort`)

mod client;
mod error;
mod server;
mod upstream;

pub use client::GatewayClient;
pub use error::{ErrorBody, GatewayError};
pub use server::{router, serve, GatewayState, MintParams};
pub use upstream::UpstreamApis;
