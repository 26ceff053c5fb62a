//! Narrow accessors over untyped event payloads.
//!
//! Producer `data` fields are free-form JSON. The registry state machine
//! reads them exclusively through these helpers so a missing or mistyped
//! field degrades to `None` in one place instead of type assertions strewn
//! through the transitions.

use serde_json::Value;

pub(crate) fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn u32_field(data: &Value, key: &str) -> Option<u32> {
    data.get(key).and_then(Value::as_u64).map(|n| n as u32)
}

pub(crate) fn u64_field(data: &Value, key: &str) -> Option<u64> {
    data.get(key).and_then(Value::as_u64)
}

/// Integers are accepted where a float is expected; producers are loose here.
pub(crate) fn f64_field(data: &Value, key: &str) -> Option<f64> {
    data.get(key).and_then(Value::as_f64)
}

pub(crate) fn str_list_field(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
