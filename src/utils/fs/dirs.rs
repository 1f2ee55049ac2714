//! Directory creation helpers.

use crate::core::{FileOperation, FileResultExt, HelmkitError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails when creation fails or when the path exists but is not a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use helmkit::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> helmkit::core::Result<()> {
/// ensure_dir(Path::new("output/chart/templates"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_file_context(FileOperation::CreateDir, path)?;
    } else if !path.is_dir() {
        return Err(HelmkitError::FileSystem {
            operation: FileOperation::CreateDir,
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        });
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
