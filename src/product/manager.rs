//! The product manager: catalog, extraction, instantiation and validation.

use super::binary::is_binary;
use super::placeholder::{extract_placeholders, substitute_placeholders};
use super::{ChartInfo, Product, UnassignedPolicy, VariableDefinition, VariableValues};
use crate::constants::{
    CHART_MANIFEST, DEFAULT_CHART_SUBDIR, MAX_SUGGESTIONS, PRODUCT_META_JSON, PRODUCT_META_YAML,
    SIMILARITY_THRESHOLD_PERCENT,
};
use crate::core::{HelmkitError, Result};
use crate::utils::fs::{FileStore, LocalFileStore};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use strsim::levenshtein;
use tracing::{debug, info, warn};

/// A chart file read into memory and prepared for writing.
enum PreparedFile {
    Text { relative: PathBuf, content: String },
    Binary { relative: PathBuf, content: Vec<u8> },
}

/// Manages the products under one products directory.
#[derive(Debug, Clone)]
pub struct ProductManager {
    base_products_path: PathBuf,
    store: Arc<dyn FileStore>,
}

impl ProductManager {
    /// Create a manager for `base_products_path`, reading and writing through `store`.
    ///
    /// The directory does not need to exist yet.
    ///
    /// # Errors
    ///
    /// [`HelmkitError::InvalidArgument`] when the path is empty.
    pub fn new(base_products_path: impl Into<PathBuf>, store: Arc<dyn FileStore>) -> Result<Self> {
        let base_products_path = base_products_path.into();
        if base_products_path.as_os_str().is_empty() {
            return Err(HelmkitError::invalid_argument(
                "base products path",
                "base products path cannot be empty",
            ));
        }

        Ok(Self { base_products_path, store })
    }

    /// Create a manager on the local file system.
    pub fn local(base_products_path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(base_products_path, Arc::new(LocalFileStore::new()))
    }

    /// The products directory.
    pub fn base_products_path(&self) -> &Path {
        &self.base_products_path
    }

    /// The store this manager reads and writes through.
    pub fn store(&self) -> &dyn FileStore {
        self.store.as_ref()
    }

    /// All products, sorted by name.
    ///
    /// A sub-directory counts as a product when it has a metadata file or a
    /// `chart/Chart.yaml`. Products with unreadable metadata are logged and
    /// skipped so one broken entry does not hide the rest. A missing products
    /// directory yields an empty list.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        if !self.store.is_dir(&self.base_products_path) {
            debug!("Products directory {} does not exist", self.base_products_path.display());
            return Ok(Vec::new());
        }

        let mut products = Vec::new();
        for name in self.product_dir_names()? {
            let dir = self.base_products_path.join(&name);
            let looks_like_product = self.store.is_file(&dir.join(PRODUCT_META_YAML))
                || self.store.is_file(&dir.join(PRODUCT_META_JSON))
                || self.store.is_file(&dir.join(DEFAULT_CHART_SUBDIR).join(CHART_MANIFEST));
            if !looks_like_product {
                continue;
            }

            match self.get_product(&name) {
                Ok(product) => products.push(product),
                Err(e) => warn!("Skipping product '{}': {}", name, e),
            }
        }

        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    /// Load one product.
    ///
    /// Without a metadata file the product is synthesized from its directory:
    /// chart in `chart/`, variables extracted from the chart.
    ///
    /// # Errors
    ///
    /// [`HelmkitError::NotFound`] (with close matches as suggestions) when the
    /// product directory does not exist; [`HelmkitError::ParseError`] for
    /// malformed metadata.
    pub fn get_product(&self, name: &str) -> Result<Product> {
        validate_product_name(name)?;
        let dir = self.base_products_path.join(name);

        if !self.store.is_dir(&dir) {
            return Err(HelmkitError::NotFound {
                kind: "product".to_string(),
                name: name.to_string(),
                suggestions: self.similar_product_names(name),
            });
        }

        let mut product = match self.read_product_meta(&dir)? {
            Some(product) => product,
            None => {
                let chart_dir = dir.join(DEFAULT_CHART_SUBDIR);
                let variables = if self.store.is_dir(&chart_dir) {
                    self.extract_variables_from_path(&chart_dir)?
                } else {
                    Vec::new()
                };
                Product {
                    name: name.to_string(),
                    description: None,
                    chart_path: DEFAULT_CHART_SUBDIR.to_string(),
                    variables,
                }
            }
        };

        if product.name.is_empty() {
            product.name = name.to_string();
        }
        if product.chart_path.is_empty() {
            product.chart_path = DEFAULT_CHART_SUBDIR.to_string();
        }
        product.chart_path = dir.join(&product.chart_path).display().to_string();
        product.variables.sort();

        Ok(product)
    }

    /// Parse the `Chart.yaml` of a product's chart.
    ///
    /// # Errors
    ///
    /// [`HelmkitError::NotFound`] for a missing product or manifest,
    /// [`HelmkitError::ParseError`] for a malformed manifest.
    pub fn get_chart_info(&self, product_name: &str) -> Result<ChartInfo> {
        let product = self.get_product(product_name)?;
        let manifest = Path::new(&product.chart_path).join(CHART_MANIFEST);

        if !self.store.is_file(&manifest) {
            return Err(HelmkitError::not_found("chart manifest", manifest.display().to_string()));
        }

        let text = self.store.read_to_string(&manifest)?;
        serde_yaml::from_str(&text).map_err(|e| HelmkitError::parse_error(manifest.display(), e))
    }

    /// Collect the placeholders used anywhere below `path`.
    ///
    /// Binary files are skipped. Names are distinct and sorted. When a
    /// `product_meta.*` file sits at `path` or its parent, its descriptions and
    /// defaults are attached to the matching names.
    ///
    /// # Errors
    ///
    /// [`HelmkitError::NotFound`] when `path` does not exist.
    pub fn extract_variables_from_path(&self, path: &Path) -> Result<Vec<VariableDefinition>> {
        let files = self.chart_files(path)?;
        let mut names = BTreeSet::new();

        for file in &files {
            let content = self.store.read(file)?;
            if is_binary(file, &content) {
                debug!("Skipping binary file {}", file.display());
                continue;
            }
            let text = String::from_utf8_lossy(&content);
            names.extend(extract_placeholders(&text));
        }

        let known = self.companion_definitions(path);
        debug!("Found {} variable(s) in {} file(s) under {}", names.len(), files.len(), path.display());

        Ok(names
            .into_iter()
            .map(|name| known.get(&name).cloned().unwrap_or_else(|| VariableDefinition::named(name)))
            .collect())
    }

    /// Write a copy of a chart with every placeholder substituted.
    ///
    /// `name_or_path` is used as the chart directory when it is an existing
    /// directory, otherwise it names a product. Every file is read and
    /// substituted in memory before anything is written, so under
    /// [`UnassignedPolicy::Error`] a missing value never leaves a partial
    /// output tree behind. An I/O failure while writing can still leave one.
    ///
    /// Returns the output directory.
    ///
    /// # Errors
    ///
    /// - [`HelmkitError::InvalidArgument`] for an empty output path
    /// - [`HelmkitError::NotFound`] for an unknown product or chart path
    /// - [`HelmkitError::UnassignedVariables`] listing every missing name under `Error`
    pub fn instantiate_product(
        &self,
        name_or_path: &str,
        values: &VariableValues,
        output_path: &Path,
        policy: UnassignedPolicy,
    ) -> Result<PathBuf> {
        if output_path.as_os_str().is_empty() {
            return Err(HelmkitError::invalid_argument("output path", "output path cannot be empty"));
        }

        let source = self.resolve_chart_source(name_or_path)?;
        info!(
            "Instantiating {} into {} (unassigned: {})",
            source.display(),
            output_path.display(),
            policy
        );

        let mut prepared = Vec::new();
        let mut missing = BTreeSet::new();

        for file in self.chart_files(&source)? {
            let relative = file.strip_prefix(&source).unwrap_or(&file).to_path_buf();
            let content = self.store.read(&file)?;

            if is_binary(&file, &content) {
                prepared.push(PreparedFile::Binary { relative, content });
                continue;
            }

            match String::from_utf8(content) {
                Ok(text) => {
                    let (substituted, file_missing) =
                        substitute_placeholders(&text, values, policy);
                    if !file_missing.is_empty() {
                        debug!("{}: unassigned {:?}", relative.display(), file_missing);
                    }
                    missing.extend(file_missing);
                    prepared.push(PreparedFile::Text { relative, content: substituted });
                }
                Err(e) => {
                    prepared.push(PreparedFile::Binary { relative, content: e.into_bytes() })
                }
            }
        }

        if policy == UnassignedPolicy::Error && !missing.is_empty() {
            return Err(HelmkitError::UnassignedVariables {
                names: missing.into_iter().collect(),
            });
        }
        if !missing.is_empty() {
            warn!("{} placeholder(s) had no value: {:?}", missing.len(), missing);
        }

        for file in &prepared {
            match file {
                PreparedFile::Text { relative, content } => {
                    self.store.write(&output_path.join(relative), content.as_bytes())?;
                }
                PreparedFile::Binary { relative, content } => {
                    self.store.write(&output_path.join(relative), content)?;
                }
            }
        }

        info!("Wrote {} file(s) to {}", prepared.len(), output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Check that every YAML and JSON file below `path` parses.
    ///
    /// `.yaml`/`.yml` files may hold several documents. The root `Chart.yaml`
    /// must exist and carry a non-empty `name` and `version`. Placeholders are
    /// not treated specially: validate before substitution to check the
    /// template, after it to check the result.
    ///
    /// # Errors
    ///
    /// [`HelmkitError::ValidationFailed`] listing every invalid file.
    pub fn validate_chart_files(&self, path: &Path) -> Result<()> {
        let files = self.chart_files(path)?;
        let mut failures = Vec::new();

        for file in &files {
            let extension =
                file.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
            let relative = file.strip_prefix(path).unwrap_or(file).display().to_string();

            let result = match extension.as_deref() {
                Some("yaml" | "yml") => {
                    self.store.read_to_string(file).map(|text| validate_yaml_stream(&text))
                }
                Some("json") => self.store.read_to_string(file).map(|text| {
                    serde_json::from_str::<serde_json::Value>(&text)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                }),
                _ => continue,
            };

            match result {
                Ok(Ok(())) => debug!("Valid: {}", relative),
                Ok(Err(reason)) => failures.push(format!("{relative}: {reason}")),
                Err(HelmkitError::FileSystem { ref source, .. })
                    if source.kind() == std::io::ErrorKind::InvalidData =>
                {
                    failures.push(format!("{relative}: not valid UTF-8 text"));
                }
                Err(e) => return Err(e),
            }
        }

        let manifest = path.join(CHART_MANIFEST);
        if self.store.is_file(&manifest) {
            if let Err(reason) = self.check_manifest_fields(&manifest) {
                failures.push(format!("{CHART_MANIFEST}: {reason}"));
            }
        } else {
            failures.push(format!("{CHART_MANIFEST}: missing"));
        }

        if failures.is_empty() {
            info!("Validated {} file(s) under {}", files.len(), path.display());
            Ok(())
        } else {
            Err(HelmkitError::ValidationFailed {
                path: path.display().to_string(),
                failures,
            })
        }
    }

    /// Register a new product from an existing chart directory.
    ///
    /// The chart is copied (binary-safe) to `<products>/<name>/<chart_subdir>`
    /// where `chart_subdir` comes from `meta.chart_path` (default `chart`).
    /// When `meta` lists no variables they are extracted from the chart.
    /// Metadata is written as `product_meta.yaml`.
    ///
    /// # Errors
    ///
    /// - [`HelmkitError::InvalidArgument`] for an invalid name or chart sub-directory
    /// - [`HelmkitError::NotFound`] when `base_chart_path` is not a directory
    /// - [`HelmkitError::AlreadyExists`] when the product directory exists
    pub fn define_product(
        &self,
        name: &str,
        base_chart_path: &Path,
        meta: Option<Product>,
    ) -> Result<Product> {
        validate_product_name(name)?;

        if !self.store.is_dir(base_chart_path) {
            return Err(HelmkitError::not_found("chart", base_chart_path.display().to_string()));
        }

        let product_dir = self.base_products_path.join(name);
        if self.store.exists(&product_dir) {
            return Err(HelmkitError::AlreadyExists {
                path: product_dir.display().to_string(),
            });
        }

        let mut product = meta.unwrap_or_else(|| Product {
            name: String::new(),
            description: None,
            chart_path: String::new(),
            variables: Vec::new(),
        });
        product.name = name.to_string();
        if product.chart_path.is_empty() {
            product.chart_path = DEFAULT_CHART_SUBDIR.to_string();
        }
        validate_relative_subdir(&product.chart_path)?;

        if product.variables.is_empty() {
            product.variables = self.extract_variables_from_path(base_chart_path)?;
        }
        product.variables.sort();

        let chart_dir = product_dir.join(&product.chart_path);
        let files = self.chart_files(base_chart_path)?;
        for file in &files {
            let relative = file.strip_prefix(base_chart_path).unwrap_or(file);
            let content = self.store.read(file)?;
            self.store.write(&chart_dir.join(relative), &content)?;
        }

        let yaml = serde_yaml::to_string(&product)?;
        self.store.write(&product_dir.join(PRODUCT_META_YAML), yaml.as_bytes())?;

        info!(
            "Defined product '{}' with {} file(s) and {} variable(s)",
            name,
            files.len(),
            product.variables.len()
        );

        self.get_product(name)
    }

    fn resolve_chart_source(&self, name_or_path: &str) -> Result<PathBuf> {
        let as_path = Path::new(name_or_path);
        if self.store.is_dir(as_path) {
            return Ok(as_path.to_path_buf());
        }
        // Anything that cannot be a product name was meant as a chart path
        if validate_product_name(name_or_path).is_err() {
            return Err(HelmkitError::not_found("chart", name_or_path));
        }

        let product = self.get_product(name_or_path)?;
        let chart = PathBuf::from(&product.chart_path);
        if self.store.is_dir(&chart) {
            Ok(chart)
        } else {
            Err(HelmkitError::not_found("chart", chart.display().to_string()))
        }
    }

    fn chart_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !self.store.is_dir(root) {
            return Err(HelmkitError::not_found("path", root.display().to_string()));
        }
        self.store.walk_files(root)
    }

    fn product_dir_names(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_dir(&self.base_products_path)?
            .into_iter()
            .filter(|path| self.store.is_dir(path))
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect())
    }

    fn similar_product_names(&self, target: &str) -> Vec<String> {
        let Ok(available) = self.product_dir_names() else {
            return Vec::new();
        };

        let mut scored: Vec<_> =
            available.into_iter().map(|name| (levenshtein(target, &name), name)).collect();
        scored.sort();

        scored
            .into_iter()
            .filter(|(distance, _)| *distance <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name)
            .collect()
    }

    fn read_product_meta(&self, product_dir: &Path) -> Result<Option<Product>> {
        let yaml_path = product_dir.join(PRODUCT_META_YAML);
        if self.store.is_file(&yaml_path) {
            let text = self.store.read_to_string(&yaml_path)?;
            return serde_yaml::from_str(&text)
                .map(Some)
                .map_err(|e| HelmkitError::parse_error(yaml_path.display(), e));
        }

        let json_path = product_dir.join(PRODUCT_META_JSON);
        if self.store.is_file(&json_path) {
            let text = self.store.read_to_string(&json_path)?;
            return serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| HelmkitError::parse_error(json_path.display(), e));
        }

        Ok(None)
    }

    /// Definitions from a metadata file next to (or one level above) a chart directory.
    fn companion_definitions(&self, path: &Path) -> BTreeMap<String, VariableDefinition> {
        let candidates = std::iter::once(path).chain(path.parent());

        for dir in candidates {
            match self.read_product_meta(dir) {
                Ok(Some(product)) => {
                    return product.variables.into_iter().map(|v| (v.name.clone(), v)).collect();
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Ignoring unreadable product metadata in {}: {}", dir.display(), e);
                }
            }
        }

        BTreeMap::new()
    }

    fn check_manifest_fields(&self, manifest: &Path) -> std::result::Result<(), String> {
        #[derive(Deserialize)]
        struct ManifestFields {
            name: Option<String>,
            version: Option<serde_yaml::Value>,
        }

        let text = self.store.read_to_string(manifest).map_err(|e| e.to_string())?;
        let fields: ManifestFields = serde_yaml::from_str(&text).map_err(|e| e.to_string())?;

        if fields.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err("missing 'name'".to_string());
        }
        let version_missing = match &fields.version {
            None | Some(serde_yaml::Value::Null) => true,
            Some(serde_yaml::Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if version_missing {
            return Err("missing 'version'".to_string());
        }
        Ok(())
    }
}

fn validate_yaml_stream(text: &str) -> std::result::Result<(), String> {
    for document in serde_yaml::Deserializer::from_str(text) {
        serde_yaml::Value::deserialize(document).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn validate_product_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HelmkitError::invalid_argument("product name", "product name cannot be empty"));
    }
    if trimmed != name
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
    {
        return Err(HelmkitError::invalid_argument(
            "product name",
            format!("'{name}' must be a single directory name"),
        ));
    }
    Ok(())
}

fn validate_relative_subdir(subdir: &str) -> Result<()> {
    let path = Path::new(subdir);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(HelmkitError::invalid_argument(
            "chart sub-directory",
            format!("'{subdir}' must be a relative path inside the product directory"),
        ));
    }
    Ok(())
}
