//! Application configuration loaded from TOML.
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working in-process setup. Unknown keys are rejected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastConfig;
use crate::generator::GeneratorConfig;
use crate::store::{MemoryStore, SqliteStore, StoreError, TicketStore};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub generator: GeneratorConfig,
    pub forecast: ForecastConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.forecast
            .validate()
            .map_err(|e| ConfigError::Validation(format!("forecast: {e}")))?;
        self.generator
            .validate()
            .map_err(|e| ConfigError::Validation(format!("generator: {e}")))?;

        if self.store.backend == StoreBackend::Sqlite && self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "store.path is required for the sqlite backend".into(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("server.host is empty".into()));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Where tickets are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database file (sqlite backend only).
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: PathBuf::from("data/tickets.db"),
        }
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Default::default()
        }
    }

    /// Open the configured backend.
    pub fn open(&self) -> Result<Arc<dyn TicketStore>, StoreError> {
        Ok(match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Sqlite => Arc::new(SqliteStore::open(&self.path)?),
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,

    /// Extra filter directives (e.g., "helpdesk_forecast=debug,tower=warn").
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::default(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line format.
    Pretty,
    /// Compact single-line format.
    #[default]
    Compact,
    /// JSON format (for log aggregation).
    Json,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.forecast.min_history, 5);
        assert_eq!(config.generator.high_demand_months, vec![1, 6, 11]);
    }

    #[test]
    fn parses_every_section() {
        let config = AppConfig::from_str(
            r#"
            [server]
            port = 9000

            [store]
            backend = "memory"

            [generator]
            count = 250
            high_demand_months = [3, 12]
            seed = 7

            [forecast]
            n_estimators = 20

            [logging]
            level = "debug"
            format = "json"
            filter = "tower=warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.generator.count, 250);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.forecast.n_estimators, 20);
        assert_eq!(config.forecast.seed, 42);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter.as_deref(), Some("tower=warn"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_str("[server]\nportt = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = AppConfig::from_str("[generator]\nhigh_demand_months = [13]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = AppConfig::from_str("[forecast]\ntest_size = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = AppConfig::from_str("[store]\nbackend = \"sqlite\"\npath = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::from_file("/nonexistent/helpdesk.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/helpdesk.toml"));
    }

    #[test]
    fn memory_backend_opens() {
        let store = StoreConfig::memory().open().unwrap();
        assert!(store.scan_all().unwrap().is_empty());
    }
}
