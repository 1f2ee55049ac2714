//! Source file discovery for the config loader.

use crate::constants::{CONF_EXTENSION, DEFAULT_CONF_DIR, DEFAULT_INSTALL_FILE};
use crate::core::{HelmkitError, Result};
use crate::utils::fs::FileStore;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static DATABASE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^database_(\w+)\.conf$").expect("database file pattern is a valid regex")
});

/// Return the database type embedded in a `database_<type>.conf` file name.
///
/// Only the file name is inspected; directories in `file_name` never match.
///
/// ```rust
/// use helmkit::confload::classify_database_file;
///
/// assert_eq!(classify_database_file("database_mysql.conf").as_deref(), Some("mysql"));
/// assert_eq!(classify_database_file("common.conf"), None);
/// ```
pub fn classify_database_file(file_name: &str) -> Option<String> {
    DATABASE_FILE.captures(file_name).map(|caps| caps[1].to_string())
}

/// Primary config file and config directory used by default discovery.
///
/// Without an environment: `<base>/install.conf` and `<base>/conf`.
/// With environment `dev`: `<base>/install-dev.conf` and `<base>/conf-dev`.
/// An empty base path means the current directory.
pub fn discover_default_paths(base_path: &Path, environment: Option<&str>) -> (PathBuf, PathBuf) {
    let base = if base_path.as_os_str().is_empty() { Path::new(".") } else { base_path };

    match environment.map(str::trim).filter(|env| !env.is_empty()) {
        Some(env) => {
            let stem = DEFAULT_INSTALL_FILE.trim_end_matches(".conf");
            (
                base.join(format!("{stem}-{env}.{CONF_EXTENSION}")),
                base.join(format!("{DEFAULT_CONF_DIR}-{env}")),
            )
        }
        None => (base.join(DEFAULT_INSTALL_FILE), base.join(DEFAULT_CONF_DIR)),
    }
}

/// `*.conf` files directly inside `dir`, sorted by name. Sub-directories are ignored.
pub fn conf_files_in(store: &dyn FileStore, dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(store
        .list_dir(dir)?
        .into_iter()
        .filter(|path| {
            store.is_file(path)
                && path.extension().and_then(|ext| ext.to_str()) == Some(CONF_EXTENSION)
        })
        .collect())
}

/// Files named by default discovery, in parse order.
///
/// Missing pieces are logged and skipped: an installation without a `conf`
/// directory is perfectly valid.
pub fn default_sources(
    store: &dyn FileStore,
    primary: &Path,
    conf_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if store.is_file(primary) {
        files.push(primary.to_path_buf());
    } else {
        warn!("Primary config file not found: {}", primary.display());
    }

    if store.is_dir(conf_dir) {
        let found = conf_files_in(store, conf_dir)?;
        debug!("Found {} conf file(s) in {}", found.len(), conf_dir.display());
        files.extend(found);
    } else {
        warn!("Config directory not found: {}", conf_dir.display());
    }

    Ok(files)
}

/// Files named by explicit custom paths, in parse order.
///
/// Each entry is a file or a directory (expanded non-recursively). Relative
/// entries are taken relative to `base_path`. A missing entry is an error.
pub fn custom_sources(
    store: &dyn FileStore,
    base_path: &Path,
    custom_paths: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in custom_paths {
        let path = if entry.is_relative() && !base_path.as_os_str().is_empty() {
            base_path.join(entry)
        } else {
            entry.clone()
        };

        if store.is_dir(&path) {
            files.extend(conf_files_in(store, &path)?);
        } else if store.is_file(&path) {
            files.push(path);
        } else {
            return Err(HelmkitError::not_found("config path", path.display().to_string()));
        }
    }

    Ok(files)
}
