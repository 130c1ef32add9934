//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::controller::TurnTiming;
use crate::error::{ClientError, ClientErrorKind};

/// Settings for connecting to the game server and pacing AI turns.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the game server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Milliseconds between AI-task polls.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Milliseconds to wait before starting each AI turn.
    #[serde(default = "default_turn_delay_ms")]
    turn_delay_ms: u64,

    /// Seconds an AI task may stay unresolved before the turn is abandoned.
    #[serde(default = "default_ai_task_deadline_secs")]
    ai_task_deadline_secs: u64,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Where the terminal UI writes its log.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_turn_delay_ms() -> u64 {
    100
}

fn default_ai_task_deadline_secs() -> u64 {
    120
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_othello.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_ms: default_poll_interval_ms(),
            turn_delay_ms: default_turn_delay_ms(),
            ai_task_deadline_secs: default_ai_task_deadline_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ClientError::new(
                ClientErrorKind::Config,
                format!("Failed to read config file: {}", e),
            )
        })?;

        let config = Self::from_toml(&content)?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ClientError::new(
                ClientErrorKind::Config,
                format!("Failed to parse config: {}", e),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            warn!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.poll_interval_ms == 0 {
            return Err(ClientError::new(
                ClientErrorKind::Config,
                "poll_interval_ms must be greater than zero",
            ));
        }
        if self.ai_task_deadline_secs == 0 {
            return Err(ClientError::new(
                ClientErrorKind::Config,
                "ai_task_deadline_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Overrides the server URL.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    /// Overrides the log file path.
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Delays for the AI-turn protocol.
    pub fn timing(&self) -> TurnTiming {
        TurnTiming::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.turn_delay_ms),
            Duration::from_secs(self.ai_task_deadline_secs),
        )
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_browser_client() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url(), "http://127.0.0.1:5000");
        let timing = config.timing();
        assert_eq!(timing.poll_interval, Duration::from_millis(2000));
        assert_eq!(timing.turn_delay, Duration::from_millis(100));
        assert_eq!(timing, TurnTiming::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ClientConfig::from_toml("server_url = \"http://othello:8080\"\n").unwrap();
        assert_eq!(config.server_url(), "http://othello:8080");
        assert_eq!(*config.poll_interval_ms(), 2000);
        assert_eq!(config.log_file(), &PathBuf::from("strictly_othello.log"));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = ClientConfig::from_toml("poll_interval_ms = 0\n").unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Config);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ClientConfig::from_toml("poll_interval_ms = \"soon\"").unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "turn_delay_ms = 250").unwrap();
        writeln!(file, "ai_task_deadline_secs = 30").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        let timing = config.timing();
        assert_eq!(timing.turn_delay, Duration::from_millis(250));
        assert_eq!(timing.task_deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_server_url("http://elsewhere:1")
            .with_log_file("/tmp/othello.log");
        assert_eq!(config.server_url(), "http://elsewhere:1");
        assert_eq!(config.log_file(), &PathBuf::from("/tmp/othello.log"));
    }
}
