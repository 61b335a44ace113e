//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - The token store (exact counts and ordered, windowed pages)
//! - The upstream gateway (coin metadata and all-time-high lookups)

pub mod token_store;
pub mod gateway;
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod mocks;

pub use token_store::{TokenStore, PageQuery, StoreError};
pub use gateway::{GatewayPort, MetadataQuote, UpstreamError};
