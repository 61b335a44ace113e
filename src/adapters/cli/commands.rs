//! CLI Command Handlers
//!
//! Implementation of the `serve`, `browse` and `lookup` commands.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::display;
use crate::adapters::gateway::{self, GatewayClient, GatewayState, UpstreamApis};
use crate::adapters::pump_fun::PumpFunClient;
use crate::adapters::solana_tracker::SolanaTrackerClient;
use crate::adapters::supabase::SupabaseTokenStore;
use crate::application::{EnrichmentFetcher, ExplorerConfig, LoadOutcome, TokenExplorer};
use crate::config::{load_config_or_default, Config};
use crate::domain::{FilterState, SortOrder};
use crate::ports::GatewayPort;

/// Mint Explorer - browse recently created tokens with market enrichment
#[derive(Parser, Debug)]
#[command(
    name = "mint-explorer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse recently created tokens with market enrichment",
    long_about = "Mint Explorer pages through a hosted token table, filters by creation date \
                  and all-time-high market cap, and proxies the upstream market APIs."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the upstream gateway HTTP server
    Serve(ServeCmd),

    /// Page through the token list in the terminal
    Browse(BrowseCmd),

    /// Look up metadata and all-time high for a single mint
    Lookup(LookupCmd),
}

impl Command {
    fn config_path(&self) -> &Path {
        match self {
            Command::Serve(cmd) => &cmd.config,
            Command::Browse(cmd) => &cmd.config,
            Command::Lookup(cmd) => &cmd.config,
        }
    }
}

/// Run the gateway server
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the bind address (e.g. 0.0.0.0:3000)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Browse the token list
#[derive(Parser, Debug)]
pub struct BrowseCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Earliest creation date, inclusive (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Latest creation date, inclusive (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Minimum all-time-high market cap in USD
    #[arg(long, value_name = "USD")]
    pub min_ath: Option<f64>,

    /// Sort order: newest or oldest
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Fetch metadata for every listed token
    #[arg(long)]
    pub enrich: bool,
}

/// Look up a single mint
#[derive(Parser, Debug)]
pub struct LookupCmd {
    /// Token mint address
    pub mint: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = resolve_config(app.command.config_path())?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Serve(cmd) => serve_command(cmd, &config).await,
        Command::Browse(cmd) => browse_command(cmd, &config).await,
        Command::Lookup(cmd) => lookup_command(cmd, &config).await,
    }
}

fn init_logging(verbose: bool, debug: bool, configured_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        configured_level
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

fn resolve_config(path: &Path) -> Result<Config> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
    load_config_or_default(&expanded)
        .with_context(|| format!("Failed to load configuration from {}", expanded))
}

/// Direct upstream access; needs the Solana Tracker key
fn direct_upstream(config: &Config) -> Result<UpstreamApis> {
    let pump_fun = PumpFunClient::with_config(config.pump_fun_config())
        .context("Failed to create pump.fun client")?;
    let tracker = SolanaTrackerClient::with_config(config.solana_tracker_config()?)
        .context("Failed to create Solana Tracker client")?;
    Ok(UpstreamApis::new(pump_fun, tracker))
}

/// A running gateway if one is configured, otherwise the upstreams directly
fn enrichment_port(config: &Config) -> Result<Arc<dyn GatewayPort>> {
    match config.explorer.gateway_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => {
            tracing::info!("Using gateway at {}", url);
            let client = GatewayClient::new(url).context("Failed to create gateway client")?;
            Ok(Arc::new(client))
        }
        None => Ok(Arc::new(direct_upstream(config)?)),
    }
}

/// Handle serve command
async fn serve_command(cmd: ServeCmd, config: &Config) -> Result<()> {
    let bind = match cmd.bind {
        Some(addr) => addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", addr))?,
        None => config.gateway_bind()?,
    };

    let upstream = direct_upstream(config)?;
    let state = Arc::new(GatewayState::new(Arc::new(upstream)));

    gateway::serve(bind, state).await.context("Gateway server failed")?;
    tracing::info!("Gateway stopped");
    Ok(())
}

/// Handle browse command
async fn browse_command(cmd: BrowseCmd, config: &Config) -> Result<()> {
    let store = SupabaseTokenStore::with_config(config.supabase_config()?)
        .context("Failed to create token store client")?;
    let fetcher = EnrichmentFetcher::new(enrichment_port(config)?);
    let explorer = TokenExplorer::new(Arc::new(store), fetcher, ExplorerConfig::from(config));

    let mut filter = FilterState::default().with_sort(cmd.sort);
    if let Some(start) = cmd.start {
        filter = filter.with_start_date(start);
    }
    if let Some(end) = cmd.end {
        filter = filter.with_end_date(end);
    }
    if let Some(min_ath) = cmd.min_ath {
        filter = filter.with_min_ath(min_ath);
    }

    explorer
        .apply_filters(filter)
        .await
        .context("Failed to load tokens")?;

    for _ in 1..cmd.pages.max(1) {
        if explorer.load_more().await.context("Failed to load more tokens")? == LoadOutcome::NothingMore {
            break;
        }
    }

    if cmd.enrich {
        let mints: Vec<String> = explorer
            .snapshot()
            .await
            .rows
            .iter()
            .map(|row| row.mint().to_string())
            .collect();
        for mint in mints {
            explorer.hover(&mint).await;
        }
    }

    println!("{}", display::render_snapshot(&explorer.snapshot().await));
    Ok(())
}

/// Handle lookup command
async fn lookup_command(cmd: LookupCmd, config: &Config) -> Result<()> {
    let fetcher = EnrichmentFetcher::new(enrichment_port(config)?);

    let (metadata, ath) = tokio::join!(
        fetcher.fetch_metadata(&cmd.mint),
        fetcher.fetch_all_time_high(&cmd.mint)
    );

    println!("Mint: {}", cmd.mint);
    match metadata {
        Some(quote) => {
            println!("Market cap: {}", display::format_market_cap(quote.market_cap));
            println!("Image: {}", quote.image.as_deref().unwrap_or("N/A"));
            if let Some(description) = quote.description {
                println!("Description: {}", description);
            }
        }
        None => println!("Metadata: unavailable"),
    }
    println!("ATH market cap: {}", display::format_market_cap(ath));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_browse_flags() {
        let app = CliApp::try_parse_from([
            "mint-explorer",
            "browse",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--min-ath",
            "50000",
            "--sort",
            "oldest",
            "--pages",
            "3",
            "--enrich",
        ])
        .unwrap();

        match app.command {
            Command::Browse(cmd) => {
                assert_eq!(cmd.start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(cmd.end, NaiveDate::from_ymd_opt(2024, 1, 31));
                assert_eq!(cmd.min_ath, Some(50_000.0));
                assert_eq!(cmd.sort, SortOrder::Oldest);
                assert_eq!(cmd.pages, 3);
                assert!(cmd.enrich);
                assert_eq!(cmd.config, PathBuf::from("config.toml"));
            }
            other => panic!("expected browse, got {:?}", other),
        }
    }

    #[test]
    fn test_browse_defaults() {
        let app = CliApp::try_parse_from(["mint-explorer", "browse"]).unwrap();
        match app.command {
            Command::Browse(cmd) => {
                assert_eq!(cmd.sort, SortOrder::Newest);
                assert_eq!(cmd.pages, 1);
                assert!(cmd.start.is_none());
                assert!(!cmd.enrich);
            }
            other => panic!("expected browse, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_date_and_sort() {
        assert!(CliApp::try_parse_from(["mint-explorer", "browse", "--start", "01/02/2024"]).is_err());
        assert!(CliApp::try_parse_from(["mint-explorer", "browse", "--sort", "sideways"]).is_err());
    }

    #[test]
    fn test_parse_lookup_with_global_flags() {
        let app = CliApp::try_parse_from(["mint-explorer", "lookup", "MintAbc", "-v", "-c", "alt.toml"]).unwrap();
        assert!(app.verbose);
        match app.command {
            Command::Lookup(cmd) => {
                assert_eq!(cmd.mint, "MintAbc");
                assert_eq!(cmd.config, PathBuf::from("alt.toml"));
            }
            other => panic!("expected lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_upstream_requires_tracker_key() {
        let mut config = Config::default();
        config.upstream.solana_tracker_api_key = None;
        assert!(direct_upstream(&config).is_err());
    }

    #[test]
    fn test_enrichment_port_prefers_gateway() {
        let mut config = Config::default();
        config.upstream.solana_tracker_api_key = None;
        config.explorer.gateway_url = Some("http://127.0.0.1:3000".to_string());
        assert!(enrichment_port(&config).is_ok());
    }
}
