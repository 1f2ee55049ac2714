//! File store abstraction used by both engines.
//!
//! The config loader and the product manager never touch `std::fs` directly.
//! They are handed an `Arc<dyn FileStore>` at construction time: production
//! code uses [`LocalFileStore`], tests can substitute the in-memory store from
//! `test_utils` without any per-call hooks.

use crate::core::{FileOperation, FileResultExt, HelmkitError, Result};
use crate::utils::fs::atomic::atomic_write;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Read/write access to a tree of files.
///
/// All listing operations return paths sorted lexicographically so that
/// callers produce reproducible output.
pub trait FileStore: Send + Sync + Debug {
    /// Read the complete content of a file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write (or overwrite) a file, creating parent directories as needed.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Immediate children of a directory (files and directories), sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// All regular files below `root`, recursively, sorted. Symlinks are not followed.
    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Whether `path` exists at all.
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .with_file_context(FileOperation::Read, path)
    }
}

/// [`FileStore`] backed by the local file system.
///
/// Writes go through [`atomic_write`], so an interrupted run never leaves a
/// half-written file behind (a partially populated output tree is still possible).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Create a new local store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        trace!("Reading {}", path.display());
        fs::read(path).with_file_context(FileOperation::Read, path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        trace!("Writing {} ({} bytes)", path.display(), content.len());
        atomic_write(path, content)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_file_context(FileOperation::ListDir, path)? {
            let entry = entry.with_file_context(FileOperation::ListDir, path)?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(HelmkitError::not_found("directory", root.display().to_string()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry
                .map_err(std::io::Error::from)
                .with_file_context(FileOperation::ListDir, root)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_files_sorted_and_recursive() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("templates/sub")).unwrap();
        std::fs::write(root.join("values.yaml"), "a: 1").unwrap();
        std::fs::write(root.join("Chart.yaml"), "name: x").unwrap();
        std::fs::write(root.join("templates/sub/cm.yaml"), "").unwrap();

        let store = LocalFileStore::new();
        let files = store.walk_files(root).unwrap();
        let relative: Vec<_> =
            files.iter().map(|p| p.strip_prefix(root).unwrap().to_path_buf()).collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("Chart.yaml"),
                PathBuf::from("templates/sub/cm.yaml"),
                PathBuf::from("values.yaml"),
            ]
        );
    }

    #[test]
    fn test_walk_files_missing_root_is_not_found() {
        let temp = tempdir().unwrap();
        let err = LocalFileStore::new().walk_files(&temp.path().join("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let err = LocalFileStore::new().read(&temp.path().join("nope.conf")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_to_string_rejects_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bin.dat");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = LocalFileStore::new().read_to_string(&path).unwrap_err();
        assert!(matches!(err, HelmkitError::FileSystem { .. }));
    }

    #[test]
    fn test_list_dir_sorted() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("b.conf"), "").unwrap();
        std::fs::write(temp.path().join("a.conf"), "").unwrap();
        std::fs::create_dir(temp.path().join("c")).unwrap();

        let entries = LocalFileStore::new().list_dir(temp.path()).unwrap();
        let names: Vec<_> =
            entries.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["a.conf", "b.conf", "c"]);
    }
}
