//! helmkit CLI entry point
//!
//! Parses the command line, runs the selected command and renders errors with
//! context and suggestions:
//! - `conf` - resolve `.conf` variables into a JSON document
//! - `product` - manage and instantiate chart products

use anyhow::Result;
use clap::Parser;
use helmkit::cli;
use helmkit::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
