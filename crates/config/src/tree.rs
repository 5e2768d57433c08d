//! Path-based configuration tree mutation

use serde_json::{Map, Value};

/// A nested configuration object: string keys mapping to JSON values.
pub type ConfigTree = Map<String, Value>;

/// Split a destination path on `.` or `__`.
///
/// The separators are equivalent and may be mixed within one path. Empty
/// segments are dropped.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('.')
        .flat_map(|part| part.split("__"))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Intermediate segments must resolve to objects. A segment already occupied
/// by a non-object value blocks the whole write: it is skipped with a
/// warning, never an error, and the existing value is left intact. The final
/// segment overwrites any prior value silently.
pub fn set_value(tree: &mut ConfigTree, path: &str, value: &str) {
    let segments = split_path(path);
    let Some((last, parents)) = segments.split_last() else {
        tracing::warn!(path = %path, "skipping config override: empty path");
        return;
    };

    let mut node = tree;
    for segment in parents {
        let slot = node
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(child) => node = child,
            _ => {
                tracing::warn!(
                    path = %path,
                    segment = %segment,
                    "skipping config override: segment occupied by a non-object value"
                );
                return;
            }
        }
    }

    node.insert((*last).to_string(), Value::String(value.to_string()));
    tracing::debug!(path = %path, "config value overridden from secret store");
}
