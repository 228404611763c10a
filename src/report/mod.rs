pub mod csv;
pub mod json;
pub mod table;

use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::metrics::{self, CategoryDelta, Change, DeltaRow, DiffSummary};
use crate::store::Snapshot;

/// Which snapshot a comparison side came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub total_accounts: f64,
}

impl SnapshotRef {
    fn of(snapshot: &Snapshot) -> Self {
        SnapshotRef {
            id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            created_at: snapshot.created_at,
            total_accounts: AnalysisResult::new(snapshot.metrics.clone()).effective_total(),
        }
    }
}

/// Everything the compare view shows for two snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub from: SnapshotRef,
    pub to: SnapshotRef,
    pub total_delta: f64,
    pub rows: Vec<DeltaRow>,
    pub top_changes: Vec<Change>,
    pub summary: DiffSummary,
    pub category_deltas: Vec<CategoryDelta>,
}

/// Compare `older` against `newer`; deltas are `newer - older`.
pub fn compare(older: &Snapshot, newer: &Snapshot, limit: usize) -> Comparison {
    let rows = metrics::diff_values(&older.metrics, &newer.metrics);
    let top_changes = metrics::top_changes(&rows, limit);
    let summary = DiffSummary::from_rows(&rows);
    let category_deltas = metrics::category_deltas(&older.metrics, &newer.metrics);

    let from = SnapshotRef::of(older);
    let to = SnapshotRef::of(newer);

    Comparison {
        total_delta: to.total_accounts - from.total_accounts,
        from,
        to,
        rows,
        top_changes,
        summary,
        category_deltas,
    }
}
