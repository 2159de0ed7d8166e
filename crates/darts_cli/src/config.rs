//! Driver configuration loaded from `darts.toml`.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Environment variable that overrides the configured database path.
pub const DB_ENV_VAR: &str = "DARTS_DB";

/// Configuration for the darts driver.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DartsConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,
}

fn default_db_path() -> String {
    "darts.db".to_string()
}

impl Default for DartsConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl DartsConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if present, then applies `DARTS_DB` and the `--db` flag.
    ///
    /// Precedence, lowest to highest: defaults, file, environment, flag.
    #[instrument(skip(path, env_db, flag_db), fields(path = %path.as_ref().display()))]
    pub fn resolve(
        path: impl AsRef<Path>,
        env_db: Option<String>,
        flag_db: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file; using defaults");
            Self::default()
        };
        if let Some(db_path) = flag_db.or(env_db) {
            config.db_path = db_path;
        }
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = DartsConfig::resolve("/no/such/darts.toml", None, None).unwrap();
        assert_eq!(config.db_path(), "darts.db");
    }

    #[test]
    fn test_precedence_file_env_flag() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "db_path = \"from_file.db\"").unwrap();

        let config = DartsConfig::resolve(file.path(), None, None).unwrap();
        assert_eq!(config.db_path(), "from_file.db");

        let config = DartsConfig::resolve(file.path(), Some("env.db".into()), None).unwrap();
        assert_eq!(config.db_path(), "env.db");

        let config =
            DartsConfig::resolve(file.path(), Some("env.db".into()), Some("flag.db".into()))
                .unwrap();
        assert_eq!(config.db_path(), "flag.db");
    }

    #[test]
    fn test_empty_file_falls_back_to_default_path() {
        let file = NamedTempFile::new().unwrap();
        let config = DartsConfig::from_file(file.path()).unwrap();
        assert_eq!(config, DartsConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "db_path = ").unwrap();
        let err = DartsConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }
}
