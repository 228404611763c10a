use serde::Serialize;
use serde_json::{Map, Value};

/// Label for records without a usable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    #[serde(serialize_with = "crate::util::serialize_count")]
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub name: String,
    #[serde(serialize_with = "crate::util::serialize_count")]
    pub delta: f64,
}

/// Normalize either input shape into `{name, count}` pairs.
///
/// - array of records: grouped by `category` (or `Category`), in order of
///   first occurrence
/// - object with `accounts_by_category`: that mapping, in key order
/// - any other object: read as `name -> count`, in key order
pub fn aggregate(input: &Value) -> Vec<CategoryCount> {
    match input {
        Value::Array(records) => from_records(records),
        Value::Object(map) => match map.get("accounts_by_category") {
            Some(Value::Object(inner)) => from_mapping(inner),
            Some(_) => Vec::new(),
            None => from_mapping(map),
        },
        _ => Vec::new(),
    }
}

/// Category label of a record; numbers and `true` count by their text form,
/// while empty strings, `0`, `false` and `null` do not count.
fn record_category(record: &Value) -> String {
    ["category", "Category"]
        .iter()
        .filter_map(|field| match record.get(field)? {
            Value::String(name) if !name.is_empty() => Some(name.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn from_records(records: &[Value]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in records {
        let name = record_category(record);
        match counts.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.count += 1.0,
            None => counts.push(CategoryCount { name, count: 1.0 }),
        }
    }

    counts
}

fn from_mapping(map: &Map<String, Value>) -> Vec<CategoryCount> {
    map.iter()
        .filter_map(|(name, count)| {
            count.as_f64().filter(|c| c.is_finite()).map(|count| CategoryCount {
                name: name.clone(),
                count,
            })
        })
        .collect()
}

/// Per-category change between two inputs, missing categories counted as 0.
///
/// Names follow `left` order, then categories only present in `right`.
pub fn category_deltas(left: &Value, right: &Value) -> Vec<CategoryDelta> {
    let left = aggregate(left);
    let right = aggregate(right);

    let count_of = |series: &[CategoryCount], name: &str| {
        series
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.count)
            .unwrap_or(0.0)
    };

    let mut names: Vec<&str> = left.iter().map(|c| c.name.as_str()).collect();
    for c in &right {
        if !names.contains(&c.name.as_str()) {
            names.push(c.name.as_str());
        }
    }

    names
        .into_iter()
        .map(|name| CategoryDelta {
            name: name.to_string(),
            delta: count_of(&right, name) - count_of(&left, name),
        })
        .collect()
}
