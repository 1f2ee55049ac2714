//! Atomic file write operations using temp-and-rename strategy.
//!
//! A reader of the destination sees either the old content or the new
//! content, never a partial write.

use crate::core::{FileOperation, FileResultExt, Result};
use crate::utils::fs::dirs::ensure_parent_dir;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically writes bytes to a file, creating parent directories as needed.
///
/// The content goes to a sibling `<name>.tmp` file which is synced and then
/// renamed over the destination.
///
/// # Examples
///
/// ```rust,no_run
/// use helmkit::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> helmkit::core::Result<()> {
/// atomic_write(Path::new("out/all_variables.json"), b"{}")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;

    let temp_path = temp_sibling(path);

    {
        let mut file =
            fs::File::create(&temp_path).with_file_context(FileOperation::Write, &temp_path)?;
        file.write_all(content).with_file_context(FileOperation::Write, &temp_path)?;
        file.sync_all().with_file_context(FileOperation::Write, &temp_path)?;
    }

    fs::rename(&temp_path, path).with_file_context(FileOperation::Write, path)?;

    Ok(())
}

/// `values.yaml` -> `values.yaml.tmp`, so `Chart.yaml` and `Chart.json` never share a temp file.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
