//! Mint Explorer Library
//!
//! Pages through recently created tokens, filters them by creation date and
//! all-time-high market cap, and enriches rows on demand through an upstream
//! gateway.
//!
//! # Modules
//!
//! - `domain`: Core types (TokenRecord, TokenRow, FilterState, PageCursor)
//! - `ports`: Trait abstractions (TokenStore, GatewayPort)
//! - `adapters`: External implementations (Supabase, pump.fun, Solana Tracker, gateway, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Explorer state machine and enrichment fetcher

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
