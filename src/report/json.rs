//! JSON output for scripting and piping into chart tools.

use serde::Serialize;

use super::Comparison;
use crate::metrics::CategoryCount;
use crate::store::Snapshot;

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

pub fn render_snapshot(snapshot: &Snapshot) -> String {
    pretty(snapshot)
}

pub fn render_list(snapshots: &[Snapshot]) -> String {
    pretty(snapshots)
}

pub fn render_comparison(comparison: &Comparison) -> String {
    pretty(comparison)
}

pub fn render_categories(counts: &[CategoryCount]) -> String {
    pretty(counts)
}
