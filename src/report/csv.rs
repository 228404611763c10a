//! CSV exports.
//!
//! - summary: `Metric,Value` rows for the headline numbers
//! - flagged lists: one quoted service name per line

use crate::analysis::AnalysisResult;
use crate::util::format_number;
use csv::{QuoteStyle, Writer, WriterBuilder};

fn finish(writer: Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render_summary(analysis: &AnalysisResult) -> Result<String, csv::Error> {
    let oldest = analysis.oldest_account().unwrap_or_default();

    let rows = [
        ("Total Accounts", format_number(analysis.total_accounts())),
        ("Oldest Account", oldest),
        ("Risk Avg", format_number(analysis.risk_average())),
        (
            "Password Warnings",
            analysis.password_hygiene_warnings().len().to_string(),
        ),
        ("Inactive Accounts", analysis.inactive_accounts().len().to_string()),
    ];

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(["Metric", "Value"])?;
    for (metric, value) in rows {
        writer.write_record([metric, value.as_str()])?;
    }
    finish(writer)
}

pub fn render_list(items: &[String]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    for item in items {
        writer.write_record([item])?;
    }
    finish(writer)
}
