//! JSON configuration file under `~/.config/gymlog/config.json`.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gymlog");
        Self {
            db_path: data_dir.join("gymlog.db"),
            log_dir: data_dir.join("logs"),
            log_level: gymlog_core::default_log_level().to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Loads the user config; a missing file yields defaults.
    pub fn load() -> CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|err| CliError::Config(format!("{}: {err}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("home directory not found".to_string()))?;
        Ok(home.join(".config").join("gymlog").join("config.json"))
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, db: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(db) = db {
            self.db_path = db;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "logLevel": "ignored", "log_level": "debug" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn save_then_load_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path)
            .unwrap()
            .with_overrides(Some(PathBuf::from("other.db")), None);
        assert_eq!(loaded.export_dir, dir.path());
        assert_eq!(loaded.db_path, PathBuf::from("other.db"));
        assert_eq!(loaded.log_level, config.log_level);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
