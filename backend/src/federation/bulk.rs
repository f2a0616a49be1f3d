//! Bulk federation: commit the rows an operator ticked in a fetched table.

use serde_json::Value;
use std::collections::HashMap;

/// Rows whose `id` is marked `true` in `selected`, in their original order.
///
/// Rows without a string or numeric `id` can't be selected and are skipped.
pub fn select_for_commit(records: &[Value], selected: &HashMap<String, bool>) -> Vec<Value> {
    records
        .iter()
        .filter(|record| {
            record_key(record)
                .and_then(|key| selected.get(&key).copied())
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

fn record_key(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
