//! File system utilities
//!
//! # Key Features
//!
//! - **Atomic writes**: files are written to a temp sibling and renamed into place
//! - **Injectable store**: [`FileStore`] hides the file system from both engines
//! - **Deterministic listings**: directory listings and tree walks are sorted
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmkit::utils::fs::{FileStore, LocalFileStore};
//! use std::path::Path;
//!
//! # fn example() -> helmkit::core::Result<()> {
//! let store = LocalFileStore::new();
//! store.write(Path::new("out/values.yaml"), b"replicaCount: 3\n")?;
//! for file in store.walk_files(Path::new("out"))? {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod store;

pub use atomic::atomic_write;
pub use dirs::{ensure_dir, ensure_parent_dir};
pub use store::{FileStore, LocalFileStore};
