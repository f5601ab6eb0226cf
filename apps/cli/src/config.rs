//! Configuration loading
//!
//! Sources, later ones winning: built-in defaults, `mosaic.toml` (or the file
//! given with `--config`), then `MOSAIC_*` environment variables with `__`
//! between sections, e.g. `MOSAIC_LOGGING__LEVEL=debug`.

use std::path::Path;

use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PATH: &str = "mosaic.toml";

/// Accepted values of `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for the mosaic crates when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print the field trace after the decoded configuration
    #[serde(default)]
    pub trace: bool,
}

impl Config {
    /// Load configuration; an explicit `path` must exist, the default file
    /// is optional
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_PATH).required(false),
        };

        let defaults = Config::default();
        config::Config::builder()
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .set_default("output.trace", defaults.output.trace)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("MOSAIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("mosaic-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert!(!config.output.trace);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let path = write_temp(
            "load.toml",
            "[logging]\nlevel = \"debug\"\njson = true\n\n[output]\ntrace = true\n",
        );
        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.output.trace);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = write_temp("partial.toml", "[output]\ntrace = true\n");
        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert!(config.output.trace);
    }

    #[test]
    fn test_missing_explicit_file() {
        let path = std::env::temp_dir().join("mosaic-does-not-exist.toml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_level() {
        let mut config = Config::default();
        config.logging.level = "INFO".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("\"loud\""));
    }
}
