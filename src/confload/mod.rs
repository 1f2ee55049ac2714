//! Variable resolution engine for `.conf` installations
//!
//! An installation keeps its settings in plain `KEY=VALUE` files:
//!
//! ```text
//! <base>/
//! ├── install.conf            # primary file (install-<env>.conf with an environment)
//! └── conf/                   # extra files, read in name order (conf-<env>/ with an environment)
//!     ├── common.conf
//!     ├── database_mysql.conf
//!     └── database_postgres.conf
//! ```
//!
//! Loading reads every source in order (later keys win), keeps
//! `database_<type>.conf` files in separate groups when grouping is enabled,
//! and resolves `${NAME}` references:
//!
//! 1. `main` is resolved against itself.
//! 2. Each database group is resolved against itself overlaid on the resolved `main`.
//!
//! Resolution is a single substitution pass (see [`resolve_value`]), so chained
//! references resolve one level per pass and self references cannot loop.
//! Unknown references are kept verbatim.
//!
//! # Output
//!
//! [`LoadedConfig::to_json`] produces:
//!
//! ```json
//! {
//!   "main": { "RDBMS_DB_CLIENT": "mysql" },
//!   "database_configs": { "mysql": { "DB_USER": "app" } },
//!   "metadata": { "source_type": "default_discovery", "parsed_files": ["..."] }
//! }
//! ```
//!
//! `database_configs` is only present when grouping produced at least one group.

pub mod discovery;
pub mod loader;
pub mod parser;
pub mod resolve;

pub use discovery::{classify_database_file, discover_default_paths};
pub use loader::{ConfigLoader, ConfigMap, LoadedConfig, Options};
pub use parser::{parse_conf_file, parse_conf_str};
pub use resolve::{resolve_config_map, resolve_value};
