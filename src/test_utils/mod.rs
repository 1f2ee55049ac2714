//! Test utilities for helmkit
//!
//! This module provides helpers shared by unit and integration tests:
//! - [`MemoryFileStore`], an in-memory [`FileStore`](crate::utils::fs::FileStore)
//!   for exercising the engines without touching the disk
//! - [`ChartFixture`] and [`ConfFixture`] for building sample chart and
//!   configuration trees
//! - [`init_test_logging`] to see engine logs while debugging a test
//!
//! # Example
//!
//! ```rust,no_run
//! use helmkit::test_utils::ChartFixture;
//!
//! let temp = tempfile::tempdir().unwrap();
//! let chart = ChartFixture::new("demo").with_subchart().write_to(&temp.path().join("demo"));
//! assert!(chart.join("Chart.yaml").is_file());
//! ```

pub mod fixtures;
pub mod memory;

pub use fixtures::{ChartFixture, ConfFixture};
pub use memory::MemoryFileStore;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. The provided level wins; otherwise
/// `RUST_LOG` is honored if set, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=helmkit=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
