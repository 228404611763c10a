//! Terminal rendering for snapshots and comparisons.
//!
//! - report: scorecards, highlights, per-mapping sections, flagged lists
//! - compare: biggest changes, full delta table, per-category change
//! - list: one line per snapshot, newest first

use crate::analysis::AnalysisResult;
use crate::metrics::diff::ChangeType;
use crate::metrics::CategoryCount;
use crate::store::Snapshot;
use crate::util::{format_delta, format_number, format_timestamp_ms, truncate};

use super::Comparison;

const BAR_WIDTH: usize = 24;

pub fn render_report(snapshot: &Snapshot) -> String {
    let analysis = AnalysisResult::new(snapshot.metrics.clone());
    let highlights = analysis.highlights();
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        snapshot.name,
        format_timestamp_ms(snapshot.created_at)
    ));
    output.push_str(&"=".repeat(40));
    output.push('\n');

    output.push_str(&format!("  {:24} {:>12}\n", "Total accounts", format_number(analysis.total_accounts())));
    output.push_str(&format!(
        "  {:24} {:>12}\n",
        "Oldest account",
        highlights.oldest_account.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("  {:24} {:>12}\n", "Risk average", format_number(analysis.risk_average())));
    output.push_str(&format!("  {:24} {:>12}\n", "Password warnings", highlights.password_warnings));
    output.push_str(&format!("  {:24} {:>12}\n", "Inactive accounts", highlights.inactive_accounts));
    output.push_str(&format!(
        "  {:24} {:>12}\n",
        "Top category",
        highlights.top_category.as_deref().unwrap_or("-")
    ));

    push_section(&mut output, "Accounts by category", &analysis.accounts_by_category());
    push_section(&mut output, "Risk breakdown", &analysis.risk_breakdown());
    push_section(&mut output, "Accounts per year", &analysis.accounts_per_year());
    push_section(&mut output, "Account age", &analysis.account_age_distribution());

    push_list(&mut output, "Password updates needed", &analysis.password_hygiene_warnings());
    push_list(&mut output, "Inactive accounts", &analysis.inactive_accounts());
    push_list(&mut output, "Insights", &analysis.insights());

    output
}

fn push_section(output: &mut String, title: &str, rows: &[(String, f64)]) {
    if rows.is_empty() {
        return;
    }

    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"-".repeat(40));
    output.push('\n');

    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    for (label, value) in rows {
        output.push_str(&format!(
            "  {:20} {:>8}  {}\n",
            truncate(label, 20),
            format_number(*value),
            bar(*value, max)
        ));
    }
}

fn push_list(output: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"-".repeat(40));
    output.push('\n');
    for item in items {
        output.push_str(&format!("  - {item}\n"));
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "#".repeat(width.min(BAR_WIDTH))
}

pub fn render_list(snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return String::from("No snapshots found. Run 'footprint save' to create one.\n");
    }

    let mut output = String::new();
    output.push_str(&format!("{:<10} {:<20} {:<28} {:>8}\n", "ID", "Date", "Name", "Accounts"));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for snapshot in snapshots {
        let total = AnalysisResult::new(snapshot.metrics.clone()).effective_total();
        output.push_str(&format!(
            "{:<10} {:<20} {:<28} {:>8}\n",
            short_id(&snapshot.id),
            format_timestamp_ms(snapshot.created_at),
            truncate(&snapshot.name, 28),
            format_number(total)
        ));
    }

    output
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let mut output = String::new();

    output.push_str("Comparing snapshots:\n");
    output.push_str(&format!(
        "  From: {} {} ({})\n",
        short_id(&comparison.from.id),
        comparison.from.name,
        format_timestamp_ms(comparison.from.created_at)
    ));
    output.push_str(&format!(
        "  To:   {} {} ({})\n",
        short_id(&comparison.to.id),
        comparison.to.name,
        format_timestamp_ms(comparison.to.created_at)
    ));
    output.push_str(&format!(
        "  Accounts: {} -> {} ({})\n",
        format_number(comparison.from.total_accounts),
        format_number(comparison.to.total_accounts),
        format_delta(comparison.total_delta)
    ));

    if comparison.rows.is_empty() {
        output.push_str("\nNo numeric metrics to compare.\n");
        return output;
    }

    if !comparison.top_changes.is_empty() {
        output.push_str("\nBiggest changes\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for change in &comparison.top_changes {
            output.push_str(&format!(
                "  {:40} {:>10}\n",
                truncate(&change.path, 40),
                format_delta(change.delta)
            ));
        }
    }

    output.push_str("\nAll metrics\n");
    output.push_str(&"-".repeat(72));
    output.push('\n');
    for row in &comparison.rows {
        let marker = match row.change_type() {
            ChangeType::Increased => "[+]",
            ChangeType::Decreased => "[-]",
            ChangeType::Unchanged => "[=]",
            ChangeType::Added => "[new]",
            ChangeType::Removed => "[gone]",
        };
        output.push_str(&format!(
            "  {:6} {:36} {:>8} {:>8} {:>8}\n",
            marker,
            truncate(&row.path, 36),
            optional(row.left_value),
            optional(row.right_value),
            row.delta.map(format_delta).unwrap_or_else(|| "-".to_string())
        ));
    }

    let s = &comparison.summary;
    output.push_str(&format!(
        "\n{} increased, {} decreased, {} unchanged, {} new, {} gone\n",
        s.increased, s.decreased, s.unchanged, s.added, s.removed
    ));

    if !comparison.category_deltas.is_empty() {
        output.push_str("\nChange by category\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for delta in &comparison.category_deltas {
            output.push_str(&format!(
                "  {:30} {:>8}\n",
                truncate(&delta.name, 30),
                format_delta(delta.delta)
            ));
        }
    }

    output
}

fn optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "-".to_string())
}

pub fn render_categories(counts: &[CategoryCount]) -> String {
    if counts.is_empty() {
        return String::from("No categories found.\n");
    }

    let rows: Vec<(String, f64)> = counts.iter().map(|c| (c.name.clone(), c.count)).collect();
    let mut output = String::new();
    push_section(&mut output, "Accounts by category", &rows);

    let total: f64 = counts.iter().map(|c| c.count).sum();
    output.push_str(&format!("  {:20} {:>8}\n", "total", format_number(total)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compare;
    use crate::report::tests::snapshot;
    use serde_json::json;

    #[test]
    fn report_shows_scorecards_and_sections() {
        let snap = snapshot(
            "0123456789",
            0,
            json!({
                "total_accounts": 19,
                "risk_average": 1.7,
                "accounts_by_category": { "Social Media": 5, "Banking": 3 },
                "inactive_accounts": ["Pinterest"],
                "insights": ["Inactive accounts detected; review for deletion."]
            }),
        );

        let text = render_report(&snap);

        assert!(text.contains("snap 0123456789 (1970-01-01 00:00:00)"));
        assert!(text.contains("Total accounts"));
        assert!(text.contains("19"));
        assert!(text.contains("1.7"));
        assert!(text.contains("Social Media"));
        assert!(text.contains("  - Pinterest"));
        assert!(text.contains("Insights"));
        assert!(!text.contains("Risk breakdown"));
    }

    #[test]
    fn report_tolerates_empty_metrics() {
        let text = render_report(&snapshot("x", 0, json!(null)));
        assert!(text.contains("Oldest account"));
        assert!(!text.contains("Accounts by category"));
    }

    #[test]
    fn list_uses_short_ids() {
        let mut snap = snapshot("abcdef0123456789", 0, json!({ "total_accounts": 3 }));
        snap.name = "after cleanup".to_string();
        let text = render_list(&[snap]);
        assert!(text.contains("abcdef01 "));
        assert!(!text.contains("abcdef0123"));
    }

    #[test]
    fn empty_list_hint() {
        assert!(render_list(&[]).contains("No snapshots found"));
    }

    #[test]
    fn comparison_marks_each_row() {
        let older = snapshot("a", 0, json!({ "total_accounts": 14, "gone": 1, "same": 2 }));
        let newer = snapshot("b", 1, json!({ "total_accounts": 12, "new": 1, "same": 2 }));

        let text = render_comparison(&compare(&older, &newer, 6));

        assert!(text.contains("Accounts: 14 -> 12 (-2)"));
        assert!(text.contains("[-]"));
        assert!(text.contains("[gone]"));
        assert!(text.contains("[new]"));
        assert!(text.contains("[=]"));
        assert!(text.contains("0 increased, 1 decreased, 1 unchanged, 1 new, 1 gone"));
    }

    #[test]
    fn comparison_without_numbers() {
        let older = snapshot("a", 0, json!({ "note": "x" }));
        let newer = snapshot("b", 1, json!({}));
        assert!(render_comparison(&compare(&older, &newer, 6)).contains("No numeric metrics"));
    }

    #[test]
    fn bars_scale_to_largest_value() {
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.1, 1000.0).len(), 1);
        assert!(bar(0.0, 10.0).is_empty());
    }
}
