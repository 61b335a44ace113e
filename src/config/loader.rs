//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.
//! Secrets are not meant to live in the file: `SUPABASE_URL`,
//! `SUPABASE_ANON_KEY` and `SOLANA_TRACKER_API_KEY` from the environment
//! (or `.env`) take precedence over whatever the file holds.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::pump_fun::{PumpFunConfig, DEFAULT_PUMP_FUN_URL};
use crate::adapters::solana_tracker::{SolanaTrackerConfig, DEFAULT_SOLANA_TRACKER_URL};
use crate::adapters::supabase::SupabaseConfig;
use crate::application::{
    ExplorerConfig, DEFAULT_ATH_WINDOW_MULTIPLIER, DEFAULT_ENRICHMENT_DELAY_MS, DEFAULT_PAGE_SIZE,
};

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const SOLANA_TRACKER_API_KEY_ENV: &str = "SOLANA_TRACKER_API_KEY";

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub gateway: GatewaySection,
    #[serde(default)]
    pub explorer: ExplorerSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Token store (Supabase) section
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Project URL, overridden by SUPABASE_URL
    #[serde(default)]
    pub url: String,
    /// Public anon key, overridden by SUPABASE_ANON_KEY
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Table holding token rows
    #[serde(default = "default_table")]
    pub table: String,
    /// Request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: None,
            table: default_table(),
            timeout_secs: default_store_timeout(),
        }
    }
}

/// Third-party API section
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_pump_fun_url")]
    pub pump_fun_url: String,
    #[serde(default = "default_solana_tracker_url")]
    pub solana_tracker_url: String,
    /// Overridden by SOLANA_TRACKER_API_KEY
    #[serde(default)]
    pub solana_tracker_api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            pump_fun_url: default_pump_fun_url(),
            solana_tracker_url: default_solana_tracker_url(),
            solana_tracker_api_key: None,
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// Proxy server section
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    /// Listen address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// Pagination & enrichment section
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerSection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Window widening factor when an ATH floor is active
    #[serde(default = "default_ath_window_multiplier")]
    pub ath_window_multiplier: usize,
    /// Pause between sequential ATH lookups
    #[serde(default = "default_enrichment_delay_ms")]
    pub enrichment_delay_ms: u64,
    /// Proxy to enrich through; upstream APIs are called directly when unset
    #[serde(default)]
    pub gateway_url: Option<String>,
}

impl Default for ExplorerSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            ath_window_multiplier: default_ath_window_multiplier(),
            enrichment_delay_ms: default_enrichment_delay_ms(),
            gateway_url: None,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_table() -> String {
    "tokens".to_string()
}

fn default_store_timeout() -> u64 {
    30
}

fn default_pump_fun_url() -> String {
    DEFAULT_PUMP_FUN_URL.to_string()
}

fn default_solana_tracker_url() -> String {
    DEFAULT_SOLANA_TRACKER_URL.to_string()
}

fn default_upstream_timeout() -> u64 {
    15
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_ath_window_multiplier() -> usize {
    DEFAULT_ATH_WINDOW_MULTIPLIER
}

fn default_enrichment_delay_ms() -> u64 {
    DEFAULT_ENRICHMENT_DELAY_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Missing secret: set {0} in the environment or config file")]
    MissingSecret(&'static str),
}

/// Load configuration from a TOML file, then apply environment overrides
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Like `load_config`, but a missing file means defaults + environment
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    if path.as_ref().exists() {
        return load_config(path);
    }
    tracing::debug!("No config file at {}, using defaults", path.as_ref().display());
    let mut config = Config::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl Config {
    /// Environment secrets win over file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value(SUPABASE_URL_ENV) {
            self.store.url = url;
        }
        if let Some(key) = env_value(SUPABASE_ANON_KEY_ENV) {
            self.store.anon_key = Some(key);
        }
        if let Some(key) = env_value(SOLANA_TRACKER_API_KEY_ENV) {
            self.upstream.solana_tracker_api_key = Some(key);
        }
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.explorer.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be > 0".to_string(),
            ));
        }

        if self.explorer.ath_window_multiplier == 0 {
            return Err(ConfigError::ValidationError(
                "ath_window_multiplier must be > 0".to_string(),
            ));
        }

        if self.store.table.is_empty() {
            return Err(ConfigError::ValidationError(
                "store table cannot be empty".to_string(),
            ));
        }

        if self.upstream.pump_fun_url.is_empty() || self.upstream.solana_tracker_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "upstream URLs cannot be empty".to_string(),
            ));
        }

        self.gateway.bind.parse::<SocketAddr>().map_err(|e| {
            ConfigError::ValidationError(format!("invalid gateway bind '{}': {}", self.gateway.bind, e))
        })?;

        Ok(())
    }

    /// Store settings; fails if the URL or anon key is missing
    pub fn supabase_config(&self) -> Result<SupabaseConfig, ConfigError> {
        if self.store.url.trim().is_empty() {
            return Err(ConfigError::MissingSecret(SUPABASE_URL_ENV));
        }
        let anon_key =
            non_empty(&self.store.anon_key).ok_or(ConfigError::MissingSecret(SUPABASE_ANON_KEY_ENV))?;

        let mut config = SupabaseConfig::new(self.store.url.clone(), anon_key)
            .with_table(self.store.table.clone());
        config.timeout = Duration::from_secs(self.store.timeout_secs);
        Ok(config)
    }

    pub fn pump_fun_config(&self) -> PumpFunConfig {
        PumpFunConfig {
            api_base_url: self.upstream.pump_fun_url.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
        }
    }

    /// Solana Tracker settings; fails if the API key is missing
    pub fn solana_tracker_config(&self) -> Result<SolanaTrackerConfig, ConfigError> {
        let api_key = non_empty(&self.upstream.solana_tracker_api_key)
            .ok_or(ConfigError::MissingSecret(SOLANA_TRACKER_API_KEY_ENV))?;

        let mut config = SolanaTrackerConfig::with_api_key(api_key);
        config.api_base_url = self.upstream.solana_tracker_url.clone();
        config.timeout = Duration::from_secs(self.upstream.timeout_secs);
        Ok(config)
    }

    pub fn gateway_bind(&self) -> Result<SocketAddr, ConfigError> {
        self.gateway.bind.parse().map_err(|e| {
            ConfigError::ValidationError(format!("invalid gateway bind '{}': {}", self.gateway.bind, e))
        })
    }
}

impl From<&Config> for ExplorerConfig {
    fn from(config: &Config) -> Self {
        ExplorerConfig {
            page_size: config.explorer.page_size,
            ath_window_multiplier: config.explorer.ath_window_multiplier,
            enrichment_delay: Duration::from_millis(config.explorer.enrichment_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[store]
url = "https://example.supabase.co"
anon_key = "anon-from-file"
table = "tokens"

[upstream]
pump_fun_url = "https://frontend-api-v3.pump.fun"
solana_tracker_url = "https://data.solanatracker.io"
solana_tracker_api_key = "tracker-from-file"
timeout_secs = 10

[gateway]
bind = "0.0.0.0:8080"

[explorer]
page_size = 25
ath_window_multiplier = 4
enrichment_delay_ms = 250
gateway_url = "http://localhost:8080"

[logging]
level = "debug"
"#
        .to_string()
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.explorer.page_size, 25);
        assert_eq!(config.explorer.ath_window_multiplier, 4);
        assert_eq!(config.explorer.gateway_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.gateway_bind().unwrap().port(), 8080);

        let explorer = ExplorerConfig::from(&config);
        assert_eq!(explorer.enrichment_delay, Duration::from_millis(250));
        assert_eq!(explorer.window(Some(1.0)), 100);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.explorer.page_size, 30);
        assert_eq!(config.explorer.ath_window_multiplier, 3);
        assert_eq!(config.explorer.enrichment_delay_ms, 100);
        assert_eq!(config.store.table, "tokens");
        assert_eq!(config.upstream.pump_fun_url, DEFAULT_PUMP_FUN_URL);
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_invalid_page_size() {
        let file = write_config("[explorer]\npage_size = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_bind() {
        let file = write_config("[gateway]\nbind = \"not-an-address\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[explorer\npage_size = ");
        assert!(matches!(load_config(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_secrets_are_reported() {
        let config = Config::default();
        assert!(matches!(
            config.supabase_config(),
            Err(ConfigError::MissingSecret(SUPABASE_URL_ENV))
        ));

        let mut config = Config::default();
        config.store.url = "https://example.supabase.co".into();
        config.store.anon_key = Some("   ".into());
        assert!(matches!(
            config.supabase_config(),
            Err(ConfigError::MissingSecret(SUPABASE_ANON_KEY_ENV))
        ));

        assert!(matches!(
            config.solana_tracker_config(),
            Err(ConfigError::MissingSecret(SOLANA_TRACKER_API_KEY_ENV))
        ));
    }

    #[test]
    fn test_adapter_configs_from_file_values() {
        let config: Config = toml::from_str(&create_valid_config()).unwrap();

        let supabase = config.supabase_config().unwrap();
        assert_eq!(supabase.url, "https://example.supabase.co");
        assert_eq!(supabase.table, "tokens");

        let tracker = config.solana_tracker_config().unwrap();
        assert_eq!(tracker.api_key, "tracker-from-file");
        assert_eq!(tracker.timeout, Duration::from_secs(10));

        assert_eq!(config.pump_fun_config().api_base_url, DEFAULT_PUMP_FUN_URL);
    }
}
