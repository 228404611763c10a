/// Format a millisecond unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp_ms(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Current time in milliseconds since the unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a metric value without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Render a delta with an explicit sign; zero is shown as `0`.
pub fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{}", format_number(delta))
    } else {
        format_number(delta)
    }
}

/// Serialize whole counts as JSON integers, anything else as a float.
pub fn serialize_count<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_have_no_fraction() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(2.1), "2.1");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn deltas_are_signed() {
        assert_eq!(format_delta(2.0), "+2");
        assert_eq!(format_delta(-2.0), "-2");
        assert_eq!(format_delta(0.0), "0");
    }

    #[test]
    fn timestamp_formats_in_utc() {
        assert_eq!(format_timestamp_ms(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp_ms(1_700_000_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("accounts_by_category.Social", 10), "account...");
    }
}
