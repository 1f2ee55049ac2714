//! In-memory file store.

use crate::core::{HelmkitError, Result};
use crate::utils::fs::FileStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A [`FileStore`] holding files in a map.
///
/// Directories are implicit: a path is a directory when some stored file lives
/// below it.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        self.lock().insert(path.as_ref().to_path_buf(), content.as_ref().to_vec());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().get(path.as_ref()).cloned()
    }

    pub fn get_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.get(path).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        // A poisoned lock only means another test thread panicked
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileStore for MemoryFileStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path).ok_or_else(|| HelmkitError::not_found("file", path.display().to_string()))
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().keys().any(|file| file != path && file.starts_with(path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(HelmkitError::not_found("directory", path.display().to_string()));
        }

        let mut children: Vec<PathBuf> = self
            .lock()
            .keys()
            .filter_map(|file| file.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| path.join(first))
            .collect();
        children.sort();
        children.dedup();
        Ok(children)
    }

    fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(HelmkitError::not_found("directory", root.display().to_string()));
        }

        Ok(self.lock().keys().filter(|file| file.starts_with(root) && *file != root).cloned().collect())
    }
}
