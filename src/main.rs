//! Mint Explorer
//!
//! Token explorer CLI and upstream gateway server.

use anyhow::Result;
use mint_explorer::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
