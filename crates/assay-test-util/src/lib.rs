//! Shared test utilities for the assay workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `assay-types` would not suffice.

use serde_json::Value;

pub const ID_PLACEHOLDER: &str = "__ID__";
pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";

/// Normalize non-deterministic JSON fields of an assessment snapshot for golden-file comparison.
///
/// 1. **Root-only**: `id` is replaced with `"__ID__"` only when the root object looks like a
///    snapshot (`schema`, `id`, `results`, `policy_order`). Response `data` payloads may carry
///    their own `id` keys, which stay untouched.
///
/// 2. **Recursive**: any `reporting_period` object has its `start` and `end` replaced with
///    `"__TIMESTAMP__"`.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_snapshot = obj.contains_key("schema")
            && obj.contains_key("id")
            && obj.contains_key("results")
            && obj.contains_key("policy_order");
        if is_snapshot {
            obj.insert("id".to_string(), Value::String(ID_PLACEHOLDER.to_string()));
        }
    }
    normalize_periods_recursive(&mut value);
    value
}

fn normalize_periods_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(period)) = map.get_mut("reporting_period") {
                for key in ["start", "end"] {
                    if period.contains_key(key) {
                        period.insert(
                            key.to_string(),
                            Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                        );
                    }
                }
            }
            for val in map.values_mut() {
                normalize_periods_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_periods_recursive(val);
            }
        }
        _ => {}
    }
}
