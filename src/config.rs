//! Persisted connection settings
//!
//! The settings written by `setup` and read by every other command. Stored
//! as pretty-printed JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "USERS_CONSOLE_CONFIG";

const APP_DIR: &str = "users-console";
const CONFIG_FILE: &str = "db_config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}; run `users-console setup` first")]
    NotFound(PathBuf),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Directory holding the database file
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`
    pub database: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database: "users.db".to_string(),
            pool_size: 4,
            busy_timeout_ms: 5_000,
        }
    }
}

impl DbConfig {
    /// Config rooted at `data_dir` with default settings otherwise
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let name = self.database.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("database name is empty".to_string()));
        }
        if name.chars().all(|c| c == '.') {
            return Err(ConfigError::Invalid(format!(
                "database name must name a file, got {}",
                name
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "database name must be a file name, got {}",
                name
            )));
        }
        if !(1..=32).contains(&self.pool_size) {
            return Err(ConfigError::Invalid(format!(
                "pool size must be between 1 and 32, got {}",
                self.pool_size
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)?;
        let config: DbConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load only when the file exists; used by the wizard to offer reuse
    pub fn load_existing(path: &Path) -> ConfigResult<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;

        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Resolve the config file location
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".users-console"))
}
