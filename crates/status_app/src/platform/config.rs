use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use status_core::DEFAULT_CONTAINER_SELECTOR;
use status_engine::{FetchSettings, PollSettings};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "status_board.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub endpoint: String,
    pub interval_secs: u64,
    pub discard_stale: bool,
    pub container_selector: String,
    /// Whether the simulated page carries the status container.
    pub status_container: bool,
    /// Entity ids that get a badge on the board.
    pub badges: Vec<String>,
    pub render_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/api/website-status".to_string(),
            interval_secs: 10,
            discard_stale: true,
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            status_container: true,
            badges: Vec::new(),
            render_interval_ms: 250,
            request_timeout_secs: 30,
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid("interval_secs must be at least 1".into()));
        }
        if self.render_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "render_interval_ms must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log_level {:?}", self.log_level)))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.interval_secs),
            container_selector: self.container_selector.clone(),
            discard_stale: self.discard_stale,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}

/// Loads and validates the config; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<BoardConfig, ConfigError> {
    let config = match fs::read_to_string(path) {
        Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BoardConfig::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.poll_settings().interval, Duration::from_secs(10));
        assert!(config.poll_settings().discard_stale);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"(
                endpoint: "http://dashboard.local/api/website-status",
                badges: ["9f2c", "a71b"],
                discard_stale: false,
                log_destination: Both,
            )"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoint, "http://dashboard.local/api/website-status");
        assert_eq!(config.badges, vec!["9f2c".to_string(), "a71b".to_string()]);
        assert!(!config.discard_stale);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.container_selector, ".website-status-container");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "(interval_secs: 0)");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, r#"(log_level: "loud")"#);
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "(interval_secs: \"ten\"");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
