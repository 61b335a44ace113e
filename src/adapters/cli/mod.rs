//! CLI Adapter
//!
//! Command-line interface for the mint explorer.
//! Uses clap derive macros for argument parsing.

mod commands;
pub mod display;

pub use commands::{CliApp, Command, ServeCmd, BrowseCmd, LookupCmd};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
