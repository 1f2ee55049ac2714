//! Load configuration variables and write them out as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Discover install.conf and conf/ in the current directory
//! helmkit conf
//!
//! # Environment-specific discovery: install-dev.conf and conf-dev/
//! helmkit conf --basepath /opt/app --env dev
//!
//! # Explicit files and directories, without database grouping
//! helmkit conf --files base.conf,overrides/ --dbgrouping false --output vars.json
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use super::common::run_blocking;
use crate::confload::{ConfigLoader, Options};
use crate::constants::DEFAULT_CONF_OUTPUT;
use crate::utils::platform::expand_path;

/// Command to resolve `.conf` files into a single JSON document.
#[derive(Args, Debug)]
pub struct ConfCommand {
    /// Base path for discovery and for relative `--files` entries
    ///
    /// Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    basepath: Option<String>,

    /// Environment suffix: loads `install-<env>.conf` and `conf-<env>/`
    #[arg(long, value_name = "ENV")]
    env: Option<String>,

    /// Comma-separated `.conf` files or directories to parse instead of discovery
    ///
    /// Directories contribute their `*.conf` files, non-recursively, in name order.
    #[arg(long, value_name = "PATHS", value_delimiter = ',')]
    files: Vec<String>,

    /// Group `database_<type>.conf` files under `database_configs.<type>`
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    dbgrouping: bool,

    /// Output JSON file, relative to the base path unless absolute
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONF_OUTPUT)]
    output: String,
}

impl ConfCommand {
    pub async fn execute(self) -> Result<()> {
        let base_path = match &self.basepath {
            Some(raw) if !raw.is_empty() => expand_path(raw)?,
            _ => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let custom_file_paths = self
            .files
            .iter()
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
            .map(expand_path)
            .collect::<Result<Vec<PathBuf>>>()?;

        let output = expand_path(&self.output)?;
        let output = if output.is_absolute() { output } else { base_path.join(output) };

        let options = Options {
            base_path,
            custom_file_paths,
            environment: self.env.filter(|env| !env.trim().is_empty()),
            enable_database_grouping: self.dbgrouping,
        };
        debug!("Loading configuration with {:?}, writing {}", options, output.display());

        let saved_to = output.clone();
        run_blocking("configuration loading", move || {
            let loader = ConfigLoader::local();
            let config = loader.load(&options)?;
            config.save_as_json(loader.store(), &output)
        })
        .await
        .context("Failed to load configuration")?;

        println!("{} Configuration saved to {}", "✓".green(), saved_to.display());
        Ok(())
    }
}
