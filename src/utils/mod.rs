//! Utilities shared by the engines and the command-line front end
//!
//! # Modules
//!
//! - [`fs`] - File store abstraction, atomic writes and directory helpers
//! - [`platform`] - Expansion of `~` and environment variables in paths

pub mod fs;
pub mod platform;

pub use fs::{FileStore, LocalFileStore, atomic_write, ensure_dir};
pub use platform::expand_path;
