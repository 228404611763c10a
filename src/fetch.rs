//! Waiting for a remote analysis result.
//!
//! The analysis runs elsewhere; its output appears at a location derived
//! from the uploaded file name. `poll_report` retries a `ReportSource` with
//! a fixed delay until it yields a result or the attempt ceiling is hit.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid analysis result in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no analysis result after {attempts} attempts{}", last_error_suffix(.last_error))]
    Exhausted {
        attempts: u32,
        last_error: Option<String>,
    },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

pub trait ReportSource {
    /// `Ok(None)` means the result is not ready yet.
    fn fetch(&self) -> Result<Option<Value>, FetchError>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            max_attempts: 10,
            interval: Duration::from_secs(2),
        }
    }
}

/// Poll `source` until it produces a result.
///
/// A result that fails to parse counts as "not ready", since the producer
/// may still be writing it. Other errors abort immediately. `max_attempts`
/// of 0 is treated as 1.
pub fn poll_report(source: &dyn ReportSource, policy: PollPolicy) -> Result<Value, FetchError> {
    poll_with_sleep(source, policy, std::thread::sleep)
}

fn poll_with_sleep(
    source: &dyn ReportSource,
    policy: PollPolicy,
    mut sleep: impl FnMut(Duration),
) -> Result<Value, FetchError> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match source.fetch() {
            Ok(Some(value)) => {
                log::info!("analysis result ready at {} (attempt {attempt})", source.describe());
                return Ok(value);
            }
            Ok(None) => {
                log::debug!("{} not ready (attempt {attempt}/{attempts})", source.describe());
            }
            Err(e @ FetchError::Parse { .. }) => {
                log::debug!("{e} (attempt {attempt}/{attempts})");
                last_error = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }

        if attempt < attempts {
            sleep(policy.interval);
        }
    }

    Err(FetchError::Exhausted { attempts, last_error })
}

/// Result file named after the upload: `<dir>/<upload stem>.json`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn for_upload(dir: &Path, upload_name: &str) -> Self {
        FileSource {
            path: dir.join(result_file_name(upload_name)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `takeout.csv` -> `takeout.json`; directories in the upload name are dropped.
pub fn result_file_name(upload_name: &str) -> String {
    let stem = Path::new(upload_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("analysis");
    format!("{stem}.json")
}

impl ReportSource for FileSource {
    fn fetch(&self) -> Result<Option<Value>, FetchError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FetchError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| FetchError::Parse {
                path: self.path.clone(),
                source: e,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct ReadyAfter {
        calls: Cell<u32>,
        ready_on: u32,
    }

    impl ReportSource for ReadyAfter {
        fn fetch(&self) -> Result<Option<Value>, FetchError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            Ok((n >= self.ready_on).then(|| json!({ "total_accounts": n })))
        }

        fn describe(&self) -> String {
            "test".to_string()
        }
    }

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            interval: Duration::from_millis(250),
        }
    }

    #[test]
    fn returns_first_ready_result() {
        let source = ReadyAfter { calls: Cell::new(0), ready_on: 3 };
        let mut sleeps = Vec::new();

        let value = poll_with_sleep(&source, policy(5), |d| sleeps.push(d)).unwrap();

        assert_eq!(value["total_accounts"], 3);
        assert_eq!(sleeps, vec![Duration::from_millis(250); 2]);
    }

    #[test]
    fn gives_up_after_ceiling() {
        let source = ReadyAfter { calls: Cell::new(0), ready_on: 100 };
        let mut sleeps = 0;

        let err = poll_with_sleep(&source, policy(4), |_| sleeps += 1).unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { attempts: 4, last_error: None }));
        assert_eq!(source.calls.get(), 4);
        assert_eq!(sleeps, 3);
    }

    #[test]
    fn truncated_file_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::for_upload(dir.path(), "takeout.csv");
        std::fs::write(source.path(), r#"{"total_accounts": 1"#).unwrap();

        let path = source.path().to_path_buf();
        let value = poll_with_sleep(&source, policy(3), |_| {
            std::fs::write(&path, r#"{"total_accounts": 1}"#).unwrap();
        })
        .unwrap();

        assert_eq!(value, json!({ "total_accounts": 1 }));
    }

    #[test]
    fn exhausted_reports_last_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::for_upload(dir.path(), "takeout.csv");
        std::fs::write(source.path(), "{ nope").unwrap();

        let err = poll_with_sleep(&source, policy(2), |_| {}).unwrap_err();

        match err {
            FetchError::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 2);
                assert!(last_error.unwrap().contains("invalid analysis result"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let source = ReadyAfter { calls: Cell::new(0), ready_on: 1 };
        assert!(poll_with_sleep(&source, policy(0), |_| {}).is_ok());
    }

    #[test]
    fn result_file_name_from_upload() {
        assert_eq!(result_file_name("takeout.csv"), "takeout.json");
        assert_eq!(result_file_name("exports/accounts.json"), "accounts.json");
        assert_eq!(result_file_name(""), "analysis.json");
    }

    #[test]
    fn file_source_waits_for_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::for_upload(dir.path(), "takeout.csv");

        assert!(source.fetch().unwrap().is_none());

        std::fs::write(source.path(), "").unwrap();
        assert!(source.fetch().unwrap().is_none());

        std::fs::write(source.path(), r#"{"total_accounts": 7}"#).unwrap();
        assert_eq!(source.fetch().unwrap(), Some(json!({ "total_accounts": 7 })));
    }

    #[test]
    fn file_source_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::for_upload(dir.path(), "bad.json");
        std::fs::write(source.path(), "{ nope").unwrap();

        assert!(matches!(source.fetch(), Err(FetchError::Parse { .. })));
    }
}
