//! Core types shared by both engines
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`HelmkitError`] - Enumerated error types covering every engine failure mode
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to a user-friendly format
//!
//! ## `file_error` - File Operation Context
//!
//! - [`FileOperation`] - What was being done when an I/O error occurred
//! - [`FileResultExt`] - Attach that context to an `io::Result`

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, HelmkitError, Result, user_friendly_error};
pub use file_error::{FileOperation, FileResultExt};
