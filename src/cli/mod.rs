//! Command-line interface for helmkit.
//!
//! The binary is a thin front end over the two library engines:
//!
//! - `conf` - resolve `${VAR}` references across `.conf` files and write the
//!   result as JSON ([`crate::confload`])
//! - `product` - manage chart products and instantiate `@{name}` charts
//!   ([`crate::product`])
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug-level logging
//! - `--quiet` / `-q` - errors only
//! - `--log-file <FILE>` - append logs to a file instead of stderr
//!
//! `RUST_LOG` overrides the level chosen by these flags.
//!
//! # Command Usage Patterns
//!
//! ```bash
//! # Resolve configuration for the dev environment
//! helmkit conf --basepath /opt/app --env dev
//!
//! # Render a product
//! helmkit product instantiate nginx-ingress ./out --set replicaCount=3
//! ```
//!
//! Engine calls do blocking file I/O and run on Tokio's blocking pool (see
//! [`common::run_blocking`]). Errors are returned as [`anyhow::Error`] and
//! turned into colored, user-facing messages by the binary.

mod conf;
pub mod common;
mod logging;
mod product;

pub use logging::init_logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Runtime configuration derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter (`debug`, `info`, `error`); `RUST_LOG` wins over it
    pub log_level: String,

    /// Where logs go instead of stderr
    pub log_file: Option<PathBuf>,
}

/// Main CLI structure for helmkit.
#[derive(Parser)]
#[command(
    name = "helmkit",
    about = "Resolve configuration variables and instantiate Helm chart products",
    version,
    long_about = "helmkit resolves ${VAR} references across .conf files into a single JSON \
                  document, and manages pre-configured Helm charts whose files use @{name} \
                  placeholders."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve `.conf` files into a single JSON document
    ///
    /// Without `--files`, discovers `install.conf` (or `install-<env>.conf`)
    /// and the `*.conf` files of `conf/` (or `conf-<env>/`) below the base path.
    Conf(conf::ConfCommand),

    /// Manage chart products and instantiate charts
    Product(product::ProductCommand),
}

impl Cli {
    /// Install logging, then run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build the [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            log_file: self.log_file.clone(),
        }
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(&config.log_level, config.log_file.as_deref())?;

        match self.command {
            Commands::Conf(cmd) => cmd.execute().await,
            Commands::Product(cmd) => cmd.execute().await,
        }
    }
}
