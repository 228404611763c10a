use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::fetch::PollPolicy;
use crate::metrics::DEFAULT_TOP_CHANGES;

/// Shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db_path: Option<PathBuf>,
    top_changes: Option<usize>,
    results_dir: Option<PathBuf>,
    poll_interval: Option<String>,
    poll_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` means the platform default database location.
    pub db_path: Option<PathBuf>,
    pub top_changes: usize,
    pub results_dir: PathBuf,
    pub poll: PollPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: None,
            top_changes: DEFAULT_TOP_CHANGES,
            results_dir: PathBuf::from("."),
            poll: PollPolicy::default(),
        }
    }
}

impl Config {
    /// ~/.config/footprint/config.toml or platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "footprint")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the config file, then apply command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };

        if let Some(db) = &cli.db {
            config.db_path = Some(db.clone());
        }

        Ok(config)
    }

    /// Missing file means defaults; an unreadable or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_toml_str(&content)
            .map_err(|e| format!("invalid config {}: {e}", path.display()).into())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file: FileConfig = toml::from_str(content)?;
        let defaults = Config::default();

        let interval = match file.poll_interval.as_deref() {
            Some(s) => parse_interval(s)?,
            None => defaults.poll.interval,
        };

        Ok(Config {
            db_path: file.db_path,
            top_changes: file.top_changes.unwrap_or(defaults.top_changes),
            results_dir: file.results_dir.unwrap_or(defaults.results_dir),
            poll: PollPolicy {
                max_attempts: file.poll_attempts.unwrap_or(defaults.poll.max_attempts),
                interval,
            },
        })
    }
}

/// Parse a humantime duration such as `2s` or `500ms`.
pub fn parse_interval(s: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    humantime::parse_duration(s.trim())
        .map_err(|e| format!("invalid duration '{s}': {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_changes, 6);
    }

    #[test]
    fn all_keys_read() {
        let config = Config::from_toml_str(
            r#"
            db_path = "/tmp/fp.db"
            top_changes = 10
            results_dir = "/tmp/results"
            poll_interval = "500ms"
            poll_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/fp.db")));
        assert_eq!(config.top_changes, 10);
        assert_eq!(config.results_dir, PathBuf::from("/tmp/results"));
        assert_eq!(config.poll.interval, Duration::from_millis(500));
        assert_eq!(config.poll.max_attempts, 3);
    }

    #[test]
    fn bad_duration_rejected() {
        assert!(Config::from_toml_str(r#"poll_interval = "soon""#).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(Config::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_on_disk_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "top_changes = 2\n").unwrap();

        assert_eq!(Config::load_from(&path).unwrap().top_changes, 2);
    }
}
