use serde_json::Value;
use std::collections::BTreeMap;

/// Flat `path -> value` view of a metrics object. Every value is finite.
pub type FlattenedMetrics = BTreeMap<String, f64>;

/// Flatten a JSON value into dotted/bracketed paths.
///
/// Objects contribute `parent.key`, arrays `parent[index]`. Only finite
/// numbers are kept; strings, booleans and nulls are dropped.
pub fn flatten(value: &Value) -> FlattenedMetrics {
    let mut out = FlattenedMetrics::new();
    walk(value, String::new(), &mut out);
    out
}

fn walk(value: &Value, path: String, out: &mut FlattenedMetrics) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk(item, format!("{path}[{index}]"), out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(item, child, out);
            }
        }
        Value::Number(n) => {
            if let Some(v) = n.as_f64().filter(|v| v.is_finite()) {
                out.insert(path, v);
            }
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}
