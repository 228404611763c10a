//! Typed access to analysis results.
//!
//! An analysis result is whatever JSON the external analysis step produced.
//! No field is required; every accessor returns a fixed default when a field
//! is absent or has the wrong type:
//! - numbers: `0`
//! - lists: empty
//! - mappings: empty
//! - dates: `None`

use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    raw: Value,
}

/// Cards shown above a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlights {
    pub oldest_account: Option<String>,
    pub password_warnings: usize,
    pub inactive_accounts: usize,
    pub top_category: Option<String>,
}

impl AnalysisResult {
    pub fn new(raw: Value) -> Self {
        AnalysisResult { raw }
    }

    /// Read an analysis result from a JSON file.
    ///
    /// Some producers wrap the body as `{"statusCode":..,"body":"<json>"}`;
    /// the body string is unwrapped when present.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_value(serde_json::from_str(content)?)
    }

    pub fn from_value(value: Value) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(body) = value.get("body").and_then(Value::as_str) {
            if value.get("statusCode").is_some() {
                return Ok(AnalysisResult::new(serde_json::from_str(body)?));
            }
        }

        Ok(AnalysisResult::new(value))
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    fn number(&self, field: &str) -> f64 {
        self.raw
            .get(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    fn mapping(&self, field: &str) -> Vec<(String, f64)> {
        self.raw
            .get(field)
            .and_then(Value::as_object)
            .map(numeric_entries)
            .unwrap_or_default()
    }

    fn strings(&self, field: &str) -> Vec<String> {
        self.raw
            .get(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn total_accounts(&self) -> f64 {
        self.number("total_accounts")
    }

    pub fn risk_average(&self) -> f64 {
        self.number("risk_average")
    }

    pub fn accounts_by_category(&self) -> Vec<(String, f64)> {
        self.mapping("accounts_by_category")
    }

    pub fn risk_breakdown(&self) -> Vec<(String, f64)> {
        self.mapping("risk_breakdown")
    }

    /// Accounts per signup year, sorted by year.
    pub fn accounts_per_year(&self) -> Vec<(String, f64)> {
        let mut years = self.mapping("accounts_per_year");
        years.sort_by(|(a, _), (b, _)| match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });
        years
    }

    pub fn account_age_distribution(&self) -> Vec<(String, f64)> {
        self.mapping("account_age_distribution")
    }

    pub fn oldest_account(&self) -> Option<String> {
        self.raw
            .get("oldest_account")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn password_hygiene_warnings(&self) -> Vec<String> {
        self.strings("password_hygiene_warnings")
    }

    pub fn inactive_accounts(&self) -> Vec<String> {
        self.strings("inactive_accounts")
    }

    pub fn insights(&self) -> Vec<String> {
        self.strings("insights")
    }

    /// Total accounts, falling back to the category counts when the total
    /// is missing or zero.
    pub fn effective_total(&self) -> f64 {
        let total = self.total_accounts();
        if total != 0.0 {
            total
        } else {
            self.accounts_by_category().iter().map(|(_, c)| c).sum()
        }
    }

    pub fn highlights(&self) -> Highlights {
        Highlights {
            oldest_account: self.oldest_account(),
            password_warnings: self.password_hygiene_warnings().len(),
            inactive_accounts: self.inactive_accounts().len(),
            top_category: self
                .raw
                .get("accounts_by_category")
                .and_then(Value::as_object)
                .and_then(|m| m.keys().next().cloned()),
        }
    }
}

fn numeric_entries(map: &Map<String, Value>) -> Vec<(String, f64)> {
    map.iter()
        .filter_map(|(k, v)| v.as_f64().filter(|v| v.is_finite()).map(|v| (k.clone(), v)))
        .collect()
}
