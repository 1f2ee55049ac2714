//! Helpers shared by the command implementations.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Render a serializable value as JSON or YAML.
///
/// Returns `None` for [`OutputFormat::Text`], where each command prints its own layout.
pub fn render_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => Ok(Some(
            serde_json::to_string_pretty(value).context("Failed to render JSON output")?,
        )),
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value).context("Failed to render YAML output")?;
            Ok(Some(yaml.trim_end().to_string()))
        }
    }
}

/// Run a blocking engine call on the blocking thread pool.
///
/// Both engines do synchronous file I/O (including `walkdir` traversals), so
/// they are kept off the async runtime's worker threads.
pub async fn run_blocking<T, F>(what: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> crate::core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow!("Task join error during {what}: {e}"))?
        .map_err(anyhow::Error::from)
}

/// Truncate `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
