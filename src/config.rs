//! Application configuration stored as TOML next to the database

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::DEFAULT_DAILY_GOAL;
use crate::storage::MAX_SQL_PARAMS;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "lexis.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to write config: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides `<data dir>/lexis.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Goal restored by a progress reset
    pub default_daily_goal: u32,
    /// Bound on bound parameters per seeding statement
    pub seed_batch_params: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            default_daily_goal: DEFAULT_DAILY_GOAL,
            seed_batch_params: MAX_SQL_PARAMS,
        }
    }
}

/// Per-user data directory, e.g. `~/.local/share/lexis`
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("lexis"))
        .ok_or(ConfigError::DataDirNotFound)
}

impl AppConfig {
    /// Read the config, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Database location: the configured path, else inside `data_dir`
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE_NAME))
    }
}
