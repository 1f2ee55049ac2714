//! Error handling for helmkit
//!
//! This module provides the typed error taxonomy shared by both engines and the
//! user-facing error reporting used by the `helmkit` binary. The error system is
//! built around two principles:
//! 1. **Strongly-typed errors** so library callers can match on failure modes
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`HelmkitError`] - Enumerated error types for every failure the engines report
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! - **Lookup**: [`HelmkitError::NotFound`] for missing products, charts and paths
//! - **Input**: [`HelmkitError::InvalidArgument`] for empty or malformed parameters
//! - **Parsing**: [`HelmkitError::ParseError`] for manifests, metadata and values files
//! - **Templating**: [`HelmkitError::UnassignedVariables`], [`HelmkitError::ValidationFailed`]
//! - **File System**: [`HelmkitError::FileSystem`]
//!
//! Config file *lines* never produce an error: the `.conf` parser logs and skips
//! them. Everything else aborts the enclosing operation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmkit::core::{HelmkitError, user_friendly_error};
//!
//! let error = HelmkitError::UnassignedVariables {
//!     names: vec!["imageTag".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperation;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, HelmkitError>;

/// The main error type for helmkit operations
///
/// Each variant carries the identifying key of the failure (a product name, a
/// path, the list of missing placeholders) so that messages are meaningful
/// without further context.
#[derive(Error, Debug)]
pub enum HelmkitError {
    /// A requested product, chart or path does not exist
    ///
    /// # Fields
    /// - `kind`: What was looked up (e.g. "product", "chart manifest", "path")
    /// - `name`: The identifying key that was not found
    /// - `suggestions`: Close matches among the known names, best first
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What was looked up
        kind: String,
        /// The identifying key that was not found
        name: String,
        /// Close matches among the known names
        suggestions: Vec<String>,
    },

    /// A required parameter was empty or malformed
    #[error("Invalid {argument}: {reason}")]
    InvalidArgument {
        /// The parameter or flag that was rejected
        argument: String,
        /// Why it was rejected
        reason: String,
    },

    /// A manifest, metadata or values file failed to parse
    #[error("Failed to parse {file}: {reason}")]
    ParseError {
        /// The file that failed to parse
        file: String,
        /// The parser's explanation
        reason: String,
    },

    /// Placeholders had no value under the `error` unassigned policy
    ///
    /// All missing names are collected before the operation aborts, so this
    /// list is complete, sorted and free of duplicates.
    #[error("Unassigned variables: {}", names.join(", "))]
    UnassignedVariables {
        /// Every placeholder name that had no value
        names: Vec<String>,
    },

    /// One or more chart files failed syntax validation
    #[error("Validation failed for {path} ({} invalid file(s))", failures.len())]
    ValidationFailed {
        /// The chart directory that was validated
        path: String,
        /// One human-readable entry per invalid file
        failures: Vec<String>,
    },

    /// The target of a create operation already exists
    #[error("Already exists: {path}")]
    AlreadyExists {
        /// The existing path
        path: String,
    },

    /// A read or write failed on a specific path
    #[error("File system error while {operation} {path}")]
    FileSystem {
        /// The operation that failed
        operation: FileOperation,
        /// The path being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON or YAML output could not be produced
    #[error("Serialization failed: {reason}")]
    Serialization {
        /// The serializer's explanation
        reason: String,
    },

    /// Generic error for cases not covered above
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl HelmkitError {
    /// Shorthand for [`HelmkitError::NotFound`] without suggestions.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
            suggestions: Vec::new(),
        }
    }

    /// Shorthand for [`HelmkitError::InvalidArgument`].
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`HelmkitError::ParseError`].
    pub fn parse_error(file: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::ParseError {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` when the error (or its underlying I/O error) means "not found".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::FileSystem { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

impl Clone for HelmkitError {
    fn clone(&self) -> Self {
        match self {
            Self::NotFound { kind, name, suggestions } => Self::NotFound {
                kind: kind.clone(),
                name: name.clone(),
                suggestions: suggestions.clone(),
            },
            Self::InvalidArgument { argument, reason } => Self::InvalidArgument {
                argument: argument.clone(),
                reason: reason.clone(),
            },
            Self::ParseError { file, reason } => Self::ParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::UnassignedVariables { names } => Self::UnassignedVariables {
                names: names.clone(),
            },
            Self::ValidationFailed { path, failures } => Self::ValidationFailed {
                path: path.clone(),
                failures: failures.clone(),
            },
            Self::AlreadyExists { path } => Self::AlreadyExists {
                path: path.clone(),
            },
            // io::Error is not Clone, rebuild it from kind and message
            Self::FileSystem { operation, path, source } => Self::FileSystem {
                operation: *operation,
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::Serialization { reason } => Self::Serialization {
                reason: reason.clone(),
            },
            Self::Other { message } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl From<serde_json::Error> for HelmkitError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            reason: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for HelmkitError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Serialization {
            reason: error.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Displayed in three parts:
/// 1. **Error**: the main message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: HelmkitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: HelmkitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HelmkitError`] anywhere in the `anyhow` chain (commands wrap
/// library errors with `.context(..)`), then bare [`std::io::Error`]s, and
/// falls back to a generic message carrying the full cause chain.
///
/// # Examples
///
/// ```rust,no_run
/// use helmkit::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
///
/// context.display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(helmkit_error) = cause.downcast_ref::<HelmkitError>() {
            let ctx = create_error_context(helmkit_error.clone());
            // Keep the command-level context line visible above the typed error
            if !error.is::<HelmkitError>() && ctx.details.is_none() {
                return ctx.with_details(error.to_string());
            }
            return ctx;
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(HelmkitError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions on the paths involved");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(HelmkitError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HelmkitError::Other {
        message,
    })
}

/// Map each [`HelmkitError`] variant to tailored suggestions and details.
fn create_error_context(error: HelmkitError) -> ErrorContext {
    match &error {
        HelmkitError::NotFound { kind, suggestions, .. } => {
            let ctx = ErrorContext::new(error.clone());
            if !suggestions.is_empty() {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            } else if kind == "product" {
                ctx.with_suggestion("Run 'helmkit product list' to see the available products")
            } else {
                ctx.with_suggestion("Check that the path exists and is spelled correctly")
            }
        }
        HelmkitError::InvalidArgument { argument, .. } if argument == "--set" => {
            ErrorContext::new(error.clone())
                .with_suggestion("Use comma separated key=value pairs, e.g. --set image.tag=1.2,replicas=3")
        }
        HelmkitError::InvalidArgument { argument, .. } if argument == "unassigned policy" => {
            ErrorContext::new(error.clone()).with_suggestion("Use one of: error, empty, keep")
        }
        HelmkitError::ParseError { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the YAML/JSON syntax of {file}")),
        HelmkitError::UnassignedVariables { names } => ErrorContext::new(error.clone())
            .with_details(format!("{} placeholder(s) had no value", names.len()))
            .with_suggestion(
                "Supply the values with --values or --set, or use --unassigned empty|keep",
            ),
        HelmkitError::ValidationFailed { failures, .. } => {
            ErrorContext::new(error.clone()).with_details(failures.join("\n"))
        }
        HelmkitError::AlreadyExists { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Choose a different name or remove the existing directory first"),
        HelmkitError::FileSystem { source, .. } => {
            ErrorContext::new(error.clone()).with_details(source.to_string())
        }
        _ => ErrorContext::new(error),
    }
}
