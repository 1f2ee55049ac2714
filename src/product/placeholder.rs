//! `@{name}` placeholder extraction and substitution.

use super::UnassignedPolicy;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\{([a-zA-Z0-9_.-]+)\}").expect("placeholder pattern is a valid regex")
});

/// Distinct placeholder names in `text`, sorted.
///
/// ```rust
/// use helmkit::product::extract_placeholders;
///
/// let names = extract_placeholders("image: \"@{repo}:@{tag}\"\nrepo2: @{repo}");
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["repo", "tag"]);
/// ```
pub fn extract_placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER.captures_iter(text).map(|caps| caps[1].to_string()).collect()
}

/// Replace every placeholder in `text`, returning the new text and the names that had no value.
///
/// Missing names are replaced according to `policy`; under
/// [`UnassignedPolicy::Error`] the token is kept so the caller can decide
/// whether to abort.
pub fn substitute_placeholders(
    text: &str,
    values: &BTreeMap<String, String>,
    policy: UnassignedPolicy,
) -> (String, BTreeSet<String>) {
    let mut missing = BTreeSet::new();

    let output = PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => {
                    missing.insert(name.to_string());
                    match policy {
                        UnassignedPolicy::Empty => String::new(),
                        UnassignedPolicy::Keep | UnassignedPolicy::Error => caps[0].to_string(),
                    }
                }
            }
        })
        .into_owned();

    (output, missing)
}
