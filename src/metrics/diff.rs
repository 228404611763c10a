//! Snapshot comparison engine.
//!
//! Compares two flattened metric maps path by path:
//! - one row per path present on either side, sorted by path
//! - a delta only when both sides carry a value (never zero-filled)
//! - ranked "biggest changes" by absolute delta

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use super::flatten::{flatten, FlattenedMetrics};

/// Default number of entries returned by `top_changes`.
pub const DEFAULT_TOP_CHANGES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Increased,
    Decreased,
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRow {
    pub path: String,
    pub left_value: Option<f64>,
    pub right_value: Option<f64>,
    pub delta: Option<f64>,
}

impl DeltaRow {
    pub fn change_type(&self) -> ChangeType {
        match (self.left_value, self.right_value) {
            (Some(l), Some(r)) if r > l => ChangeType::Increased,
            (Some(l), Some(r)) if r < l => ChangeType::Decreased,
            (Some(_), Some(_)) => ChangeType::Unchanged,
            (None, _) => ChangeType::Added,
            (Some(_), None) => ChangeType::Removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub path: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub increased: usize,
    pub decreased: usize,
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn from_rows(rows: &[DeltaRow]) -> Self {
        let mut summary = DiffSummary::default();
        for row in rows {
            match row.change_type() {
                ChangeType::Increased => summary.increased += 1,
                ChangeType::Decreased => summary.decreased += 1,
                ChangeType::Unchanged => summary.unchanged += 1,
                ChangeType::Added => summary.added += 1,
                ChangeType::Removed => summary.removed += 1,
            }
        }
        summary
    }
}

/// Compare two flattened maps. `delta = right - left`.
pub fn diff(left: &FlattenedMetrics, right: &FlattenedMetrics) -> Vec<DeltaRow> {
    let paths: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    paths
        .into_iter()
        .filter_map(|path| {
            let left_value = left.get(path).copied();
            let right_value = right.get(path).copied();

            if left_value.is_none() && right_value.is_none() {
                return None;
            }

            let delta = match (left_value, right_value) {
                (Some(l), Some(r)) => Some(r - l),
                _ => None,
            };

            Some(DeltaRow {
                path: path.clone(),
                left_value,
                right_value,
                delta,
            })
        })
        .collect()
}

/// Flatten both values, then `diff` them.
pub fn diff_values(left: &Value, right: &Value) -> Vec<DeltaRow> {
    diff(&flatten(left), &flatten(right))
}

/// Rows with a delta, largest absolute change first, ties by path.
pub fn top_changes(rows: &[DeltaRow], limit: usize) -> Vec<Change> {
    let mut changes: Vec<Change> = rows
        .iter()
        .filter_map(|row| {
            row.delta.map(|delta| Change {
                path: row.path.clone(),
                delta,
            })
        })
        .collect();

    changes.sort_by(|a, b| {
        b.delta
            .abs()
            .total_cmp(&a.delta.abs())
            .then_with(|| a.path.cmp(&b.path))
    });
    changes.truncate(limit);
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row<'a>(rows: &'a [DeltaRow], path: &str) -> &'a DeltaRow {
        rows.iter().find(|r| r.path == path).unwrap()
    }

    #[test]
    fn single_metric_decrease() {
        let rows = diff_values(&json!({ "total_accounts": 14 }), &json!({ "total_accounts": 12 }));

        assert_eq!(
            rows,
            vec![DeltaRow {
                path: "total_accounts".to_string(),
                left_value: Some(14.0),
                right_value: Some(12.0),
                delta: Some(-2.0),
            }]
        );
    }

    #[test]
    fn one_sided_paths_have_no_delta() {
        let rows = diff_values(
            &json!({ "gone": 3, "kept": 1 }),
            &json!({ "new": 5, "kept": 1 }),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(row(&rows, "gone").delta, None);
        assert_eq!(row(&rows, "gone").change_type(), ChangeType::Removed);
        assert_eq!(row(&rows, "new").delta, None);
        assert_eq!(row(&rows, "new").change_type(), ChangeType::Added);
        assert_eq!(row(&rows, "kept").delta, Some(0.0));
        assert_eq!(row(&rows, "kept").change_type(), ChangeType::Unchanged);
    }

    #[test]
    fn rows_sorted_by_path() {
        let rows = diff_values(&json!({ "b": 1, "a": 1 }), &json!({ "c": 1, "a": 2 }));
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[test]
    fn swapping_sides_negates_deltas() {
        let a = json!({ "x": 1.5, "y": { "z": 10 }, "only_a": 4 });
        let b = json!({ "x": 4, "y": { "z": 3 }, "only_b": 9 });

        let forward = diff_values(&a, &b);
        let backward = diff_values(&b, &a);

        for row in forward.iter().filter(|r| r.delta.is_some()) {
            let reverse = backward.iter().find(|r| r.path == row.path).unwrap();
            assert_eq!(row.delta.map(|d| -d), reverse.delta);
        }
    }

    #[test]
    fn rows_cover_union_of_numeric_paths() {
        let a = json!({ "n": 1, "s": "text", "list": [1, null] });
        let b = json!({ "n": 2, "m": { "k": 0 }, "flag": false });

        let rows = diff_values(&a, &b);
        let paths: BTreeSet<String> = rows.into_iter().map(|r| r.path).collect();

        let expected: BTreeSet<String> = flatten(&a)
            .into_keys()
            .chain(flatten(&b).into_keys())
            .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn empty_inputs_diff_to_nothing() {
        assert!(diff_values(&Value::Null, &json!({ "s": "x" })).is_empty());
    }

    #[test]
    fn top_changes_ranks_by_magnitude() {
        let rows = diff_values(
            &json!({ "a": 10, "b": 10, "c": 10, "d": 10, "gone": 100 }),
            &json!({ "a": 11, "b": 2, "c": 15, "d": 10, "new": 100 }),
        );

        let top = top_changes(&rows, 3);
        let paths: Vec<&str> = top.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["b", "c", "a"]);
        assert_eq!(top[0].delta, -8.0);
    }

    #[test]
    fn top_changes_ties_broken_by_path() {
        let rows = diff_values(&json!({ "z": 0, "m": 0, "a": 0 }), &json!({ "z": 2, "m": -2, "a": 2 }));
        let top = top_changes(&rows, DEFAULT_TOP_CHANGES);
        let paths: Vec<&str> = top.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "m", "z"]);
    }

    #[test]
    fn top_changes_keeps_zero_deltas_last() {
        let rows = diff_values(&json!({ "same": 1, "up": 1 }), &json!({ "same": 1, "up": 2 }));
        let top = top_changes(&rows, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].path, "same");
        assert_eq!(top[1].delta, 0.0);
    }

    #[test]
    fn summary_counts_each_kind() {
        let rows = diff_values(
            &json!({ "up": 1, "down": 5, "same": 2, "gone": 1 }),
            &json!({ "up": 3, "down": 1, "same": 2, "new": 1 }),
        );

        assert_eq!(
            DiffSummary::from_rows(&rows),
            DiffSummary {
                increased: 1,
                decreased: 1,
                unchanged: 1,
                added: 1,
                removed: 1,
            }
        );
    }

    #[test]
    fn delta_row_serializes_camel_case_with_nulls() {
        let rows = diff_values(&json!({ "a": 1 }), &json!({}));
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(
            value,
            json!({ "path": "a", "leftValue": 1.0, "rightValue": null, "delta": null })
        );
    }
}
