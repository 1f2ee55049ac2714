//! Structured file system error handling
//!
//! File operations capture their context (what was being done, to which path)
//! at the call site instead of leaving callers to parse I/O messages.

use std::path::PathBuf;

use super::error::HelmkitError;

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing a file
    Write,
    /// Creating a directory
    CreateDir,
    /// Listing or walking a directory
    ListDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::ListDir => write!(f, "listing"),
        }
    }
}

/// Extension trait for `io::Result` to attach file operation context
pub trait FileResultExt<T> {
    /// Convert an I/O failure into [`HelmkitError::FileSystem`] naming the path.
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl Into<PathBuf>,
    ) -> Result<T, HelmkitError>;
}

impl<T> FileResultExt<T> for std::io::Result<T> {
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl Into<PathBuf>,
    ) -> Result<T, HelmkitError> {
        self.map_err(|source| HelmkitError::FileSystem {
            operation,
            path: path.into(),
            source,
        })
    }
}
