//! helmkit - configuration resolution and Helm chart product templating
//!
//! The crate bundles two independent engines behind one CLI:
//!
//! # Configuration resolution ([`confload`])
//!
//! Flat `KEY=VALUE` `.conf` files are collected from a base directory
//! (`install.conf` plus `conf/*.conf`, or their `-<env>` variants) or from an
//! explicit list of files and directories. `${NAME}` references are resolved
//! in a single pass, `database_<type>.conf` files can be grouped per database
//! type, and the result is emitted as JSON:
//!
//! ```json
//! {
//!   "main": { "RDBMS_DB_CLIENT": "mysql" },
//!   "database_configs": { "mysql": { "DB_USER": "common_db_user" } },
//!   "metadata": { "source_type": "default_discovery" }
//! }
//! ```
//!
//! # Chart products ([`product`])
//!
//! A product is a Helm chart stored under a products directory whose text
//! files carry `@{name}` placeholders. The [`product::ProductManager`] lists
//! and defines products, extracts placeholders, instantiates charts under an
//! unassigned-variable policy and validates the YAML/JSON files of a chart.
//!
//! # Modules
//!
//! - [`cli`] - `clap` command-line front end
//! - [`confload`] - `.conf` discovery, parsing and `${VAR}` resolution
//! - [`constants`] - File names, default directories and tuning constants
//! - [`core`] - Error types and user-facing error rendering
//! - [`product`] - Product catalog and `@{name}` templating
//! - [`utils`] - File store abstraction and path helpers
//!
//! Both engines read and write through a [`utils::fs::FileStore`] handed to
//! them at construction, so tests can run them against an in-memory store.

pub mod cli;
pub mod confload;
pub mod constants;
pub mod core;
pub mod product;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
