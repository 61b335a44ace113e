//! Configuration Module
//!
//! Loads and validates configuration from TOML files plus environment secrets.

pub mod loader;

pub use loader::{
    Config, ConfigError, load_config, load_config_or_default,
};
