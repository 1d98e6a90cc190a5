//! Demo configuration loading from file and environment variables.

use acme_db::DbRuntimeSettings;
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Demonstration run settings.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// How long to wait for a connection, in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "acme_db=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Demonstration run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Populate an empty database with fixtures before running.
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_db_path() -> String {
    "acme.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_connection_timeout_ms() -> u64 {
    DbRuntimeSettings::default().connection_timeout_ms
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_seed() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
            connection_timeout_ms: default_connection_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// The pool tunables carried by this configuration.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
            connection_timeout_ms: self.connection_timeout_ms,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ACME_DB_PATH` overrides `database.path`
/// - `ACME_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `ACME_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `ACME_LOG_LEVEL` overrides `logging.level`
/// - `ACME_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `ACME_SEED` overrides `demo.seed`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `ACME_*` overrides looked up through `var`. Values that fail to
/// parse are ignored.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(db_path) = var("ACME_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(parsed) = var("ACME_DB_BUSY_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.database.busy_timeout_ms = parsed;
    }
    if let Some(parsed) = var("ACME_DB_POOL_MAX_SIZE").and_then(|v| v.parse().ok()) {
        config.database.pool_max_size = parsed;
    }
    if let Some(level) = var("ACME_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("ACME_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(seed) = var("ACME_SEED") {
        config.demo.seed = seed == "true" || seed == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_pool_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, "acme.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.demo.seed);
        assert_eq!(
            config.database.runtime_settings(),
            DbRuntimeSettings::default()
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");
        let config =
            load_config(path.to_str()).expect("missing file should not be an error");
        assert_eq!(config.database.connection_timeout_ms, 5_000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/var/lib/acme/sales.db"

            [demo]
            seed = false
            "#,
        )
        .expect("should parse");

        assert_eq!(config.database.path, "/var/lib/acme/sales.db");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert!(!config.demo.seed);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("acme.toml");
        std::fs::write(&path, "[database\npath = 1").expect("write config");

        let err = load_config(path.to_str()).expect_err("should fail to parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ACME_DB_PATH", "/tmp/override.db"),
            ("ACME_DB_POOL_MAX_SIZE", "2"),
            ("ACME_DB_BUSY_TIMEOUT_MS", "not-a-number"),
            ("ACME_LOG_JSON", "1"),
            ("ACME_SEED", "false"),
        ]);
        let mut config = Config::default();

        apply_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, "/tmp/override.db");
        assert_eq!(config.database.pool_max_size, 2);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert!(config.logging.json);
        assert!(!config.demo.seed);
    }
}
