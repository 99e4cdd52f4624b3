//! YAML configuration for database and logging setup.
//!
//! # Responsibility
//! - Parse the process configuration file into typed settings.
//! - Reject settings the storage or logging bootstrap cannot honor.
//!
//! # Example
//! ```yaml
//! database:
//!   path: /var/lib/pressdesk/pressdesk.db
//!   busy_timeout_ms: 5000
//! logging:
//!   level: info
//!   dir: /var/log/pressdesk
//! ```

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const IN_MEMORY_PATH: &str = ":memory:";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const SUPPORTED_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config yaml: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: Option<String>,
    /// File logging stays off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Parses and validates YAML text.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.logging.validate()
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(IN_MEMORY_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database.path cannot be empty".to_string(),
            ));
        }
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl LoggingConfig {
    /// Level to start logging with; falls back to the build-mode default.
    pub fn effective_level(&self) -> &str {
        match self.level.as_deref() {
            Some(level) => level,
            None => default_log_level(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if let Some(level) = self.level.as_deref() {
            let normalized = level.trim().to_ascii_lowercase();
            if !SUPPORTED_LEVELS.contains(&normalized.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "unsupported logging.level `{level}`"
                )));
            }
        }
        if let Some(dir) = self.dir.as_deref() {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Reads, parses and validates a YAML config file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<AppConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::from_yaml_str(&text)
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

#[cfg(test)]
mod tests {
    use super::{load_config, AppConfig, ConfigError};
    use std::time::Duration;

    #[test]
    fn minimal_config_applies_defaults() {
        let config = AppConfig::from_yaml_str("database:\n  path: ':memory:'\n").unwrap();
        assert!(config.database.is_in_memory());
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(5));
        assert!(config.logging.dir.is_none());
        assert!(!config.logging.effective_level().is_empty());
    }

    #[test]
    fn rejects_relative_log_dir() {
        let err = AppConfig::from_yaml_str(
            "database:\n  path: data.db\nlogging:\n  level: info\n  dir: logs\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("absolute")));
    }

    #[test]
    fn rejects_unknown_level_and_zero_timeout() {
        let err = AppConfig::from_yaml_str(
            "database:\n  path: data.db\nlogging:\n  level: loud\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AppConfig::from_yaml_str("database:\n  path: data.db\n  busy_timeout_ms: 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_database_section_is_a_parse_error() {
        let err = AppConfig::from_yaml_str("logging:\n  level: info\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pressdesk.yaml");
        std::fs::write(
            &path,
            "database:\n  path: /tmp/pressdesk.db\n  busy_timeout_ms: 250\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.busy_timeout(), Duration::from_millis(250));

        let missing = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
