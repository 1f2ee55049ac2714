//! Load orchestration: discover, parse, group, resolve.

use crate::confload::discovery::{
    classify_database_file, custom_sources, default_sources, discover_default_paths,
};
use crate::confload::parser::parse_conf_file;
use crate::confload::resolve::resolve_config_map;
use crate::core::Result;
use crate::utils::fs::{FileStore, LocalFileStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Flat key/value mapping.
pub type ConfigMap = BTreeMap<String, String>;

/// Inputs of a [`ConfigLoader::load`] call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory that default discovery and relative custom paths are based on.
    pub base_path: PathBuf,
    /// Explicit files or directories; when non-empty, default discovery is skipped.
    pub custom_file_paths: Vec<PathBuf>,
    /// Environment suffix for default discovery (`install-<env>.conf`, `conf-<env>`).
    pub environment: Option<String>,
    /// Keep `database_<type>.conf` files out of `main`.
    pub enable_database_grouping: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            custom_file_paths: Vec::new(),
            environment: None,
            enable_database_grouping: true,
        }
    }
}

/// The result of a load: resolved values plus provenance metadata.
///
/// Serializes to `{"main": .., "database_configs": .., "metadata": ..}`;
/// `database_configs` is omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedConfig {
    /// Resolved keys from every non-grouped source.
    pub main: ConfigMap,
    /// Resolved keys per database type, only populated with grouping enabled.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub database_configs: BTreeMap<String, ConfigMap>,
    /// Free-form provenance: source type, parsed files, timestamps, flags.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl LoadedConfig {
    /// The document as a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON (two-space indentation).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write [`to_json`](Self::to_json) output to `path`, creating parent directories.
    pub fn save_as_json(&self, store: &dyn FileStore, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        store.write(path, json.as_bytes())?;
        info!("Saved resolved configuration to {}", path.display());
        Ok(())
    }
}

/// The variable resolution engine.
///
/// # Examples
///
/// ```rust,no_run
/// use helmkit::confload::{ConfigLoader, Options};
///
/// # fn example() -> helmkit::core::Result<()> {
/// let loader = ConfigLoader::local();
/// let config = loader.load(&Options {
///     base_path: "/opt/install".into(),
///     environment: Some("dev".to_string()),
///     ..Options::default()
/// })?;
///
/// println!("{}", config.to_json()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    store: Arc<dyn FileStore>,
}

impl ConfigLoader {
    /// Create a loader reading through `store`.
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Create a loader on the local file system.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFileStore::new()))
    }

    /// The store this loader reads through.
    pub fn store(&self) -> &dyn FileStore {
        self.store.as_ref()
    }

    /// Load with default discovery.
    pub fn load_with_defaults(
        &self,
        base_path: &Path,
        environment: Option<&str>,
        enable_database_grouping: bool,
    ) -> Result<LoadedConfig> {
        self.load(&Options {
            base_path: base_path.to_path_buf(),
            custom_file_paths: Vec::new(),
            environment: environment.map(str::to_string),
            enable_database_grouping,
        })
    }

    /// Discover, parse, group and resolve.
    ///
    /// Unresolvable references never fail a load; they stay as `${NAME}` text.
    ///
    /// # Errors
    ///
    /// - [`NotFound`](crate::core::HelmkitError::NotFound) for a missing custom path
    /// - [`FileSystem`](crate::core::HelmkitError::FileSystem) when a source cannot be read
    pub fn load(&self, options: &Options) -> Result<LoadedConfig> {
        let store = self.store.as_ref();
        let mut metadata = Map::new();

        let sources = if options.custom_file_paths.is_empty() {
            let (primary, conf_dir) =
                discover_default_paths(&options.base_path, options.environment.as_deref());
            metadata.insert("source_type".into(), json!("default_discovery"));
            metadata.insert(
                "discovered_primary_config_path".into(),
                json!(primary.display().to_string()),
            );
            metadata
                .insert("discovered_conf_dir_path".into(), json!(conf_dir.display().to_string()));
            if let Some(env) = options.environment.as_deref().filter(|e| !e.trim().is_empty()) {
                metadata.insert("source_environment".into(), json!(env));
            }
            default_sources(store, &primary, &conf_dir)?
        } else {
            metadata.insert("source_type".into(), json!("custom_paths"));
            custom_sources(store, &options.base_path, &options.custom_file_paths)?
        };

        let mut raw_main = ConfigMap::new();
        let mut raw_databases: BTreeMap<String, ConfigMap> = BTreeMap::new();

        for file in &sources {
            let db_type = if options.enable_database_grouping {
                file.file_name().and_then(|name| name.to_str()).and_then(classify_database_file)
            } else {
                None
            };

            match db_type {
                Some(db_type) => {
                    debug!("Grouping {} under database type '{}'", file.display(), db_type);
                    parse_conf_file(store, file, raw_databases.entry(db_type).or_default())?;
                }
                None => {
                    parse_conf_file(store, file, &mut raw_main)?;
                }
            }
        }

        let main = resolve_config_map(&raw_main, &ConfigMap::new());
        let database_configs: BTreeMap<String, ConfigMap> = raw_databases
            .iter()
            .map(|(db_type, raw)| (db_type.clone(), resolve_config_map(raw, &main)))
            .collect();

        metadata.insert("base_path".into(), json!(options.base_path.display().to_string()));
        metadata.insert(
            "parsed_files".into(),
            json!(sources.iter().map(|p| p.display().to_string()).collect::<Vec<_>>()),
        );
        metadata.insert("database_grouping_enabled".into(), json!(options.enable_database_grouping));
        metadata.insert(
            "extraction_date".into(),
            json!(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        );

        info!(
            "Loaded {} file(s): {} main key(s), {} database group(s)",
            sources.len(),
            main.len(),
            database_configs.len()
        );

        Ok(LoadedConfig {
            main,
            database_configs,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HelmkitError;
    use crate::test_utils::ConfFixture;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn grouping_fixture(dir: &Path) {
        ConfFixture::database_grouping().write_to(dir);
    }

    #[test]
    fn test_load_with_defaults_single_env() {
        let temp = tempdir().unwrap();
        write(temp.path(), "install.conf", "MAIN_VAR=main_val\nNAMESPACE=global");
        write(temp.path(), "conf/app.conf", "APP_VAR=app_val\nNAMESPACE=app_specific");

        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();

        assert_eq!(config.main["MAIN_VAR"], "main_val");
        assert_eq!(config.main["APP_VAR"], "app_val");
        // conf dir is read after the primary file
        assert_eq!(config.main["NAMESPACE"], "app_specific");
        assert_eq!(config.metadata["source_type"], "default_discovery");
    }

    #[test]
    fn test_load_with_defaults_environment() {
        let temp = tempdir().unwrap();
        write(temp.path(), "install-dev.conf", "MODE=development\nAPI_URL=${DEV_API_URL}");
        write(temp.path(), "install.conf", "MODE=generic");
        write(temp.path(), "conf-dev/db.conf", "DEV_API_URL=http://dev.api\nDB_HOST=devdb");

        let config =
            ConfigLoader::local().load_with_defaults(temp.path(), Some("dev"), true).unwrap();

        assert_eq!(config.main["MODE"], "development");
        assert_eq!(config.main["API_URL"], "http://dev.api");
        assert_eq!(config.main["DB_HOST"], "devdb");
        assert_eq!(config.metadata["source_environment"], "dev");
        assert!(
            config.metadata["discovered_primary_config_path"]
                .as_str()
                .unwrap()
                .ends_with("install-dev.conf")
        );
    }

    #[test]
    fn test_load_missing_defaults_is_empty_not_error() {
        let temp = tempdir().unwrap();
        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();

        assert!(config.main.is_empty());
        assert!(config.database_configs.is_empty());
        assert_eq!(config.metadata["parsed_files"], json!([]));
    }

    #[test]
    fn test_load_custom_file_paths() {
        let temp = tempdir().unwrap();
        let file1 = write(temp.path(), "custom1.conf", "VAR1=val1\nSHARED=from_custom1");
        let sub = temp.path().join("subdir");
        std::fs::create_dir(&sub).unwrap();

        let config = ConfigLoader::local()
            .load(&Options {
                base_path: temp.path().to_path_buf(),
                custom_file_paths: vec![file1, sub],
                ..Options::default()
            })
            .unwrap();

        assert_eq!(config.main["VAR1"], "val1");
        assert!(!config.main.contains_key("VAR2"));
        assert_eq!(config.main["SHARED"], "from_custom1");
        assert_eq!(config.metadata["source_type"], "custom_paths");
    }

    #[test]
    fn test_load_custom_directory_order() {
        let temp = tempdir().unwrap();
        write(temp.path(), "set/b.conf", "SHARED=from_b");
        write(temp.path(), "set/a.conf", "SHARED=from_a\nONLY_A=1");

        let config = ConfigLoader::local()
            .load(&Options {
                base_path: temp.path().to_path_buf(),
                custom_file_paths: vec![PathBuf::from("set")],
                ..Options::default()
            })
            .unwrap();

        assert_eq!(config.main["SHARED"], "from_b");
        assert_eq!(config.main["ONLY_A"], "1");
    }

    #[test]
    fn test_load_missing_custom_path_fails() {
        let temp = tempdir().unwrap();
        let err = ConfigLoader::local()
            .load(&Options {
                base_path: temp.path().to_path_buf(),
                custom_file_paths: vec![PathBuf::from("missing.conf")],
                ..Options::default()
            })
            .unwrap_err();

        assert!(matches!(err, HelmkitError::NotFound { .. }));
    }

    #[test]
    fn test_database_grouping_enabled() {
        let temp = tempdir().unwrap();
        grouping_fixture(temp.path());

        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();

        assert_eq!(config.main["MAIN_SETTING"], "abc");
        assert_eq!(config.main["RDBMS_DB_CLIENT"], "mysql");
        assert_eq!(config.main["DB_COMMON_USER"], "common_db_user");
        assert!(!config.main.contains_key("MYSQL_HOST"));
        assert!(!config.main.contains_key("PG_HOST"));
        assert!(!config.main.contains_key("DB_USER"));

        let mysql = &config.database_configs["mysql"];
        assert_eq!(mysql["MYSQL_HOST"], "mysqlserver");
        assert_eq!(mysql["DB_USER"], "common_db_user");

        let postgres = &config.database_configs["postgres"];
        assert_eq!(postgres["PG_HOST"], "pgserver");
        assert_eq!(postgres["DB_USER"], "pg_user_override");
        assert!(!postgres.contains_key("MYSQL_HOST"));
    }

    #[test]
    fn test_database_grouping_disabled() {
        let temp = tempdir().unwrap();
        grouping_fixture(temp.path());

        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, false).unwrap();

        assert_eq!(config.main["MAIN_SETTING"], "abc");
        assert_eq!(config.main["MYSQL_HOST"], "mysqlserver");
        assert_eq!(config.main["PG_HOST"], "pgserver");
        // database_postgres.conf sorts after database_mysql.conf
        assert_eq!(config.main["DB_USER"], "pg_user_override");
        assert!(config.database_configs.is_empty());
        assert_eq!(config.metadata["database_grouping_enabled"], json!(false));
    }

    #[test]
    fn test_latin1_line_does_not_fail_load() {
        crate::test_utils::init_test_logging(None);
        let temp = tempdir().unwrap();
        let content = b"GOOD=1\nCOMMENT=caf\xe9\nALSO=${GOOD}2\n";
        std::fs::write(temp.path().join("install.conf"), content).unwrap();

        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();

        assert_eq!(config.main.len(), 2);
        assert_eq!(config.main["GOOD"], "1");
        assert_eq!(config.main["ALSO"], "12");
    }

    #[test]
    fn test_unresolved_references_survive() {
        let temp = tempdir().unwrap();
        write(temp.path(), "install.conf", "URL=http://${SERVER_HOST}:${SERVER_PORT}/api");

        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();
        assert_eq!(config.main["URL"], "http://${SERVER_HOST}:${SERVER_PORT}/api");
    }

    #[test]
    fn test_json_round_trip() {
        let temp = tempdir().unwrap();
        grouping_fixture(temp.path());
        let config = ConfigLoader::local().load_with_defaults(temp.path(), None, true).unwrap();

        let json = config.to_json().unwrap();
        assert!(json.contains("\n  \"main\": {"));
        let parsed: LoadedConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_omits_empty_database_configs() {
        let mut config = LoadedConfig::default();
        config.main.insert("keyM".into(), "valM".into());
        config.metadata.insert("source".into(), json!("test"));

        let value = config.to_value().unwrap();
        assert_eq!(value["main"]["keyM"], "valM");
        assert!(value.get("database_configs").is_none());
        assert_eq!(value["metadata"]["source"], "test");

        config.database_configs.insert("typeA".into(), ConfigMap::from([("keyA".into(), "valA".into())]));
        let json = config.to_json().unwrap();
        assert!(json.contains(r#""database_configs": {"#));
        assert!(json.contains(r#""keyA": "valA""#));
    }

    #[test]
    fn test_save_as_json_creates_parents() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("out/nested/all_variables.json");
        let config = LoadedConfig::default();

        config.save_as_json(&LocalFileStore::new(), &target).unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(saved["main"], json!({}));
    }
}
