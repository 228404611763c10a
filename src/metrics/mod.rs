//! Pure transformations over analysis results.
//!
//! - `flatten`: nested JSON to a flat `path -> number` map
//! - `diff`: per-path deltas between two flattened results, ranked changes
//! - `category`: chartable `{name, count}` series from records or mappings
//!
//! None of these fail: empty or non-numeric input yields empty output.

pub mod category;
pub mod diff;
pub mod flatten;

pub use category::{aggregate, category_deltas, CategoryCount, CategoryDelta};
pub use diff::{diff, diff_values, top_changes, Change, DeltaRow, DiffSummary, DEFAULT_TOP_CHANGES};
pub use flatten::{flatten, FlattenedMetrics};
