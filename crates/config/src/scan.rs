//! Placeholder scanning for embedded secret references
//!
//! Configuration string values may reference a secret inline with
//! `{GoogleSecret:<name>}` or `{GoogleSecret:<name>:<version>}`. The scanner
//! walks the configured root subtrees and emits one entry per occurrence,
//! recording the destination path the fetched value should be written back
//! to.

use crate::tree::ConfigTree;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Root keys scanned when the caller does not configure their own, matching
/// the runtime-config shape of the web frameworks this loader targets.
pub const DEFAULT_SCAN_ROOTS: [&str; 2] = ["serverRuntimeConfig", "publicRuntimeConfig"];

/// Version label used when a placeholder or mapping does not pin one.
pub const DEFAULT_VERSION: &str = "latest";

#[allow(clippy::expect_used)] // pattern is a checked literal
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{GoogleSecret:([^:}]+)(?::([^}]+))?\}").expect("placeholder pattern is valid")
});

/// A secret reference discovered inside an existing configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    /// Short secret name taken from the placeholder.
    pub secret_name: String,
    /// Version label, [`DEFAULT_VERSION`] when the placeholder names none.
    pub secret_version: String,
    /// Destination path, ancestor keys joined with `__`.
    pub path: String,
}

/// Collect placeholder occurrences under the given `roots` of `tree`.
///
/// Only string leaves are inspected; other value kinds are ignored. Roots
/// that are missing or not objects are skipped. A string containing several
/// placeholders yields one entry per match; entries targeting the same path
/// are all emitted and the last write wins at merge time.
#[must_use]
pub fn placeholders(tree: &ConfigTree, roots: &[String]) -> Vec<PlaceholderEntry> {
    let mut entries = Vec::new();
    for root in roots {
        if let Some(subtree) = tree.get(root) {
            walk(subtree, root, &mut entries);
        }
    }
    entries
}

fn walk(value: &Value, prefix: &str, entries: &mut Vec<PlaceholderEntry>) {
    let Value::Object(table) = value else {
        return;
    };
    for (key, child) in table {
        let path = format!("{prefix}__{key}");
        match child {
            Value::Object(_) => walk(child, &path, entries),
            Value::String(text) => {
                for captures in PLACEHOLDER.captures_iter(text) {
                    entries.push(PlaceholderEntry {
                        secret_name: captures[1].to_string(),
                        secret_version: captures
                            .get(2)
                            .map_or(DEFAULT_VERSION, |m| m.as_str())
                            .to_string(),
                        path: path.clone(),
                    });
                }
            }
            _ => {}
        }
    }
}
