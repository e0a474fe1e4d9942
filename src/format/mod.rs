//! Resource Formatters
//!
//! Pure projections of raw API documents into the multi-line text reports
//! returned to the tool host. Every field is optional: a missing value
//! renders as a placeholder and a missing substructure drops its section.

mod compute_pool;
mod statement;

pub use compute_pool::format_compute_pool;
pub use statement::{format_statement, Column, ColumnType};

/// Placeholder for absent fields
pub const UNKNOWN: &str = "Unknown";

/// Separator between reports in a listing
pub const SEPARATOR: &str = "\n---\n";

use serde_json::Value;

/// Walk a dot-separated path; JSON `null` counts as absent
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// Render a value for display.
/// Booleans come out as `true`/`false` and arrays or objects as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => UNKNOWN.to_string(),
        other => other.to_string(),
    }
}

/// Render the value at `path`, or `default` when absent
pub(crate) fn field(doc: &Value, path: &str, default: &str) -> String {
    lookup(doc, path)
        .map(display_value)
        .unwrap_or_else(|| default.to_string())
}

/// The object at `path` if it has at least one entry
pub(crate) fn non_empty_object<'a>(
    doc: &'a Value,
    path: &str,
) -> Option<&'a serde_json::Map<String, Value>> {
    lookup(doc, path)
        .and_then(|v| v.as_object())
        .filter(|map| !map.is_empty())
}
