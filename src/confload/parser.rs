//! Lenient `KEY=VALUE` parser for `.conf` files.
//!
//! Config files are often edited by hand on live systems, so a bad line never
//! aborts a load: it is logged with its file and line number and skipped.
//!
//! # Syntax
//!
//! ```text
//! # full-line comment
//! KEY1=value1
//! KEY2 = "value with spaces" # inline comment
//! KEY3 = 'single # quoted'
//! KEY4 = unquoted value with spaces # inline comment
//! KEY.WITH.DOTS = dotted
//! EMPTY=
//! ```
//!
//! - Whitespace around keys, `=` and unquoted values is trimmed.
//! - A quoted value ends at its closing quote; anything after it is ignored.
//! - In an unquoted value, `#` starts a comment only when preceded by whitespace,
//!   so `COLOR=#fff` keeps its value.
//! - A later assignment to the same key overwrites the earlier one.

use crate::core::Result;
use crate::utils::fs::FileStore;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineError {
    MissingEquals,
    EmptyKey,
    WhitespaceInKey,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineError::MissingEquals => write!(f, "expected KEY=VALUE"),
            LineError::EmptyKey => write!(f, "empty key"),
            LineError::WhitespaceInKey => write!(f, "key contains whitespace"),
        }
    }
}

/// Parse conf text into `target`, returning how many assignments were applied.
///
/// `source` only labels log messages (usually the file path).
pub fn parse_conf_str(content: &str, target: &mut BTreeMap<String, String>, source: &str) -> usize {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut applied = 0;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Ok((key, value)) => {
                target.insert(key.to_string(), value.to_string());
                applied += 1;
            }
            Err(reason) => {
                warn!("Skipping malformed line {} in {}: {}", index + 1, source, reason);
            }
        }
    }

    applied
}

/// Read and parse a conf file through `store`.
///
/// Only I/O failures are errors. Malformed lines, including lines that are not
/// valid UTF-8, are skipped.
pub fn parse_conf_file(
    store: &dyn FileStore,
    path: &Path,
    target: &mut BTreeMap<String, String>,
) -> Result<usize> {
    let bytes = store.read(path)?;
    let source = path.display().to_string();
    let content = decode_lines(&bytes, &source);
    let applied = parse_conf_str(&content, target, &source);
    debug!("Parsed {} entries from {}", applied, path.display());
    Ok(applied)
}

/// Decode `bytes` line by line, blanking lines that are not valid UTF-8 so
/// later line numbers stay accurate.
fn decode_lines(bytes: &[u8], source: &str) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut lines = Vec::new();
    for (index, line) in bytes.split(|b| *b == b'\n').enumerate() {
        match std::str::from_utf8(line) {
            Ok(text) => lines.push(text),
            Err(e) => {
                warn!("Skipping line {} in {}: not valid UTF-8 ({})", index + 1, source, e);
                lines.push("");
            }
        }
    }
    lines.join("\n")
}

fn parse_line(line: &str) -> std::result::Result<(&str, &str), LineError> {
    let (key, rest) = line.split_once('=').ok_or(LineError::MissingEquals)?;
    let key = key.trim();

    if key.is_empty() {
        return Err(LineError::EmptyKey);
    }
    if key.chars().any(char::is_whitespace) {
        return Err(LineError::WhitespaceInKey);
    }

    Ok((key, parse_value(rest)))
}

fn parse_value(raw: &str) -> &str {
    let value = raw.trim_start();

    if let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &value[1..];
        return match inner.find(quote) {
            Some(end) => &inner[..end],
            // Unterminated quote keeps the rest of the line
            None => inner.trim_end(),
        };
    }

    // `KEY= # note` is an empty value, `KEY=#fff` is not
    let mut previous_is_space = value.len() != raw.len();
    for (offset, c) in value.char_indices() {
        if c == '#' && previous_is_space {
            return value[..offset].trim_end();
        }
        previous_is_space = c.is_whitespace();
    }

    value.trim_end()
}
