//! Chart products and `@{name}` placeholder templating
//!
//! A *product* is a pre-configured Helm chart kept under a products directory:
//!
//! ```text
//! chart_products/
//! └── nginx-ingress/
//!     ├── product_meta.yaml     # name, description, chartPath, variables
//!     └── chart/
//!         ├── Chart.yaml
//!         ├── values.yaml       # replicaCount: '@{replicaCount}'
//!         ├── icon.png          # binary, copied verbatim
//!         └── templates/...
//! ```
//!
//! Chart text files mark substitutable values with `@{name}` placeholders, where
//! `name` consists of letters, digits, `.`, `_` and `-`. Helm's own `{{ }}`
//! syntax is left alone. Binary files (detected by extension, magic bytes,
//! NUL bytes or invalid UTF-8) are never scanned and are copied byte for byte.
//!
//! # Instantiation
//!
//! [`ProductManager::instantiate_product`] writes a copy of a chart with every
//! placeholder replaced. Placeholders without a value follow the
//! [`UnassignedPolicy`]:
//!
//! | Policy  | Output for `@{missing}`       |
//! |---------|-------------------------------|
//! | `error` | nothing written, error lists every missing name |
//! | `empty` | empty string                  |
//! | `keep`  | `@{missing}` verbatim         |
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmkit::product::{ProductManager, UnassignedPolicy, VariableValues};
//! use std::path::Path;
//!
//! # fn example() -> helmkit::core::Result<()> {
//! let manager = ProductManager::local("./chart_products")?;
//! let mut values = VariableValues::new();
//! values.insert("replicaCount".to_string(), "3".to_string());
//!
//! let out = manager.instantiate_product(
//!     "nginx-ingress",
//!     &values,
//!     Path::new("./out/nginx"),
//!     UnassignedPolicy::Error,
//! )?;
//! manager.validate_chart_files(&out)?;
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod manager;
pub mod placeholder;
pub mod values;

pub use binary::is_binary;
pub use manager::ProductManager;
pub use placeholder::{extract_placeholders, substitute_placeholders};
pub use values::{
    flatten_values, load_values_file, load_values_for_instantiation, load_variables, merge_values,
    parse_set_values,
};

use crate::core::HelmkitError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flattened placeholder values: dotted name to replacement text.
pub type VariableValues = BTreeMap<String, String>;

/// A placeholder known to a product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Placeholder name, dotted paths allowed (`image.tag`)
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value used when none is supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl VariableDefinition {
    /// A definition with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
        }
    }
}

/// A pre-configured chart, as stored in `product_meta.yaml` / `product_meta.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product name, also its directory name
    #[serde(default)]
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Chart directory. Stored relative to the product directory, returned resolved.
    #[serde(default)]
    pub chart_path: String,
    /// Known placeholders, sorted by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableDefinition>,
}

/// The fields of a `Chart.yaml` that helmkit reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInfo {
    /// Chart API version (`v1`, `v2`)
    #[serde(default)]
    pub api_version: String,
    /// Chart name
    pub name: String,
    /// Chart version
    pub version: String,
    /// Version of the packaged application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Chart description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What to do with a placeholder that has no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnassignedPolicy {
    /// Abort and report every missing name
    Error,
    /// Replace with an empty string
    #[default]
    Empty,
    /// Leave the `@{name}` token in place
    Keep,
}

impl UnassignedPolicy {
    /// The policy's name as used on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Empty => "empty",
            Self::Keep => "keep",
        }
    }
}

impl fmt::Display for UnassignedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnassignedPolicy {
    type Err = HelmkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "empty" => Ok(Self::Empty),
            "keep" => Ok(Self::Keep),
            other => Err(HelmkitError::invalid_argument(
                "unassigned policy",
                format!("'{other}' (expected error, empty or keep)"),
            )),
        }
    }
}
