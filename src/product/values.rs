//! Values files, `--set` overrides and variable loading.
//!
//! Values are handled as nested JSON documents while they are merged and are
//! flattened to dotted names (`image.tag`) only when handed to the templating
//! engine.

use super::VariableValues;
use crate::constants::DB_CLIENT_KEY;
use crate::core::{HelmkitError, Result};
use crate::utils::fs::FileStore;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Parse `--set` syntax (`a.b=v,c=w`) into a nested document.
///
/// Values are always strings. An empty segment (e.g. a trailing comma) is ignored.
///
/// # Errors
///
/// [`HelmkitError::InvalidArgument`] for a pair without `=`, an empty key or
/// key segment, or a key that nests below a plain value set earlier.
pub fn parse_set_values(spec: &str) -> Result<Value> {
    let mut root = Value::Object(Map::new());

    for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            HelmkitError::invalid_argument("--set", format!("'{pair}' is not in key=value form"))
        })?;
        let key = key.trim();
        let segments: Vec<&str> = key.split('.').collect();

        if key.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(HelmkitError::invalid_argument("--set", format!("invalid key in '{pair}'")));
        }

        insert_path(&mut root, &segments, Value::String(value.to_string())).map_err(|()| {
            HelmkitError::invalid_argument(
                "--set",
                format!("'{key}' nests below a key that already has a plain value"),
            )
        })?;
    }

    Ok(root)
}

fn insert_path(target: &mut Value, segments: &[&str], value: Value) -> std::result::Result<(), ()> {
    let Value::Object(map) = target else {
        return Err(());
    };

    match segments {
        [] => Err(()),
        [last] => {
            map.insert((*last).to_string(), value);
            Ok(())
        }
        [first, rest @ ..] => {
            let child =
                map.entry((*first).to_string()).or_insert_with(|| Value::Object(Map::new()));
            insert_path(child, rest, value)
        }
    }
}

/// Read a values document: YAML first, JSON as a fallback.
///
/// An empty file is an empty mapping.
///
/// # Errors
///
/// [`HelmkitError::ParseError`] when the file is neither YAML nor JSON or its
/// top level is not a mapping; I/O errors propagate.
pub fn load_values_file(store: &dyn FileStore, path: &Path) -> Result<Value> {
    let text = store.read_to_string(path)?;

    let value = match serde_yaml::from_str::<serde_yaml::Value>(&text) {
        Ok(yaml) => serde_json::to_value(yaml)
            .map_err(|e| HelmkitError::parse_error(path.display(), e))?,
        Err(yaml_error) => serde_json::from_str::<Value>(&text).map_err(|json_error| {
            HelmkitError::parse_error(
                path.display(),
                format!("not valid YAML ({yaml_error}) or JSON ({json_error})"),
            )
        })?,
    };

    match value {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(value),
        _ => Err(HelmkitError::parse_error(path.display(), "top level must be a mapping")),
    }
}

/// Deep-merge `overlay` into `base`. Mappings merge key by key; anything else is replaced.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Flatten a document into dotted names.
///
/// Strings are taken verbatim, numbers and booleans via their display form,
/// `null` becomes the empty string and arrays are rendered as compact JSON.
pub fn flatten_values(value: &Value) -> VariableValues {
    let mut out = VariableValues::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut VariableValues) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let name = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                flatten_into(child, name, out);
            }
        }
        _ if prefix.is_empty() => {}
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Null => {
            out.insert(prefix, String::new());
        }
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

/// Build the placeholder values for an instantiation.
///
/// The values files are merged through [`load_variables`], then each `--set`
/// string is applied in order on top of them.
pub fn load_values_for_instantiation(
    store: &dyn FileStore,
    values_files: &[&Path],
    set_overrides: &[String],
) -> Result<VariableValues> {
    let mut merged = Value::Object(load_variables(store, values_files)?);

    for spec in set_overrides {
        merge_values(&mut merged, parse_set_values(spec)?);
    }

    Ok(flatten_values(&merged))
}

/// Merge variable files in order, then lift the active database branch.
///
/// When the merged document has a string `RDBMS_DB_CLIENT` naming an entry of
/// `database_configs`, that entry's keys are copied to the top level, except
/// for keys that are already present there.
pub fn load_variables(store: &dyn FileStore, files: &[&Path]) -> Result<Map<String, Value>> {
    let mut merged = Value::Object(Map::new());
    for path in files {
        debug!("Loading values from {}", path.display());
        merge_values(&mut merged, load_values_file(store, path)?);
    }

    let Value::Object(mut document) = merged else {
        return Ok(Map::new());
    };

    let branch = document
        .get(DB_CLIENT_KEY)
        .and_then(Value::as_str)
        .and_then(|client| document.get("database_configs")?.get(client)?.as_object())
        .cloned();

    if let Some(branch) = branch {
        debug!("Lifting {} database key(s) to the top level", branch.len());
        for (key, value) in branch {
            document.entry(key).or_insert(value);
        }
    }

    Ok(document)
}
