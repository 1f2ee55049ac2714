//! `${NAME}` reference resolution.
//!
//! Resolution is a single left-to-right pass over a fixed context snapshot:
//!
//! - `${NAME}` with `NAME` in the context is replaced by the context value verbatim.
//!   The inserted text is not scanned again, so `A -> ${B}`, `B -> ${C}` resolves
//!   `${A}` to `${B}`, and a self reference `SELF -> ${SELF}` resolves to `${SELF}`.
//! - `${NAME}` with an unknown `NAME` is left untouched, braces included.
//! - Bare `$NAME` is never substituted.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Brace-delimited reference, shortest match.
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("reference pattern is a valid regex"));

/// Substitute every `${NAME}` in `template` whose name exists in `context`.
///
/// # Examples
///
/// ```rust
/// use helmkit::confload::resolve_value;
/// use std::collections::BTreeMap;
///
/// let mut context = BTreeMap::new();
/// context.insert("HOST".to_string(), "db.local".to_string());
///
/// assert_eq!(resolve_value("jdbc://${HOST}:${PORT}", &context), "jdbc://db.local:${PORT}");
/// assert_eq!(resolve_value("$HOST", &context), "$HOST");
/// ```
pub fn resolve_value(template: &str, context: &BTreeMap<String, String>) -> String {
    if !template.contains("${") {
        return template.to_string();
    }

    REFERENCE
        .replace_all(template, |caps: &Captures<'_>| match context.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Resolve every value of `raw` against `raw` overlaid on `primary`.
///
/// Keys of `raw` win over same-named keys of `primary` as substitution sources.
/// Only the keys of `raw` appear in the result; neither input is modified.
pub fn resolve_config_map(
    raw: &BTreeMap<String, String>,
    primary: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut combined = primary.clone();
    combined.extend(raw.iter().map(|(k, v)| (k.clone(), v.clone())));

    raw.iter().map(|(key, value)| (key.clone(), resolve_value(value, &combined))).collect()
}
