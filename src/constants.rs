//! Global constants used throughout the helmkit codebase.
//!
//! File names, default locations and policy names shared by the engines and
//! the command-line front end live here so they stay in one place.

/// Primary config file name under default discovery (no environment).
pub const DEFAULT_INSTALL_FILE: &str = "install.conf";

/// Config directory name under default discovery (no environment).
pub const DEFAULT_CONF_DIR: &str = "conf";

/// Extension of files picked up from config directories.
pub const CONF_EXTENSION: &str = "conf";

/// Default JSON output file of the `conf` command, relative to the base path.
pub const DEFAULT_CONF_OUTPUT: &str = "all_variables.json";

/// Key in a loaded config that names the active database client.
///
/// Used by variable loading to lift `database_configs.<client>` to the top level.
pub const DB_CLIENT_KEY: &str = "RDBMS_DB_CLIENT";

/// Product metadata file, preferred format.
pub const PRODUCT_META_YAML: &str = "product_meta.yaml";

/// Product metadata file, JSON alternative.
pub const PRODUCT_META_JSON: &str = "product_meta.json";

/// Sub-directory of a product that holds its chart.
pub const DEFAULT_CHART_SUBDIR: &str = "chart";

/// Helm chart manifest file name.
pub const CHART_MANIFEST: &str = "Chart.yaml";

/// Default products directory of the `product` command.
pub const DEFAULT_PRODUCTS_DIR: &str = "./chart_products";

/// Maximum Levenshtein distance, as a percentage of the requested name's length,
/// for a known name to be offered as a "did you mean" suggestion.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of "did you mean" suggestions.
pub const MAX_SUGGESTIONS: usize = 3;
