//! Path expansion for user-supplied paths.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expand `~` and `$VAR` / `${VAR}` references in a path given on the command line.
///
/// # Errors
///
/// Fails when the path references an environment variable that is not set.
///
/// # Examples
///
/// ```rust,no_run
/// use helmkit::utils::platform::expand_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let products = expand_path("~/charts/products")?;
/// let output = expand_path("$BUILD_DIR/out")?;
/// # Ok(())
/// # }
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Common issues:\n\
            - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
            - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
