use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lexis_lib::config::{self, AppConfig, CONFIG_FILE_NAME};
use lexis_lib::session::{DailySet, StudySession};
use lexis_lib::storage::SqliteStore;
use lexis_lib::vocabulary::Vocabulary;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub db_path: PathBuf,
    pub session: StudySession<SqliteStore>,
}

impl App {
    /// Open the configured database, creating it on first use
    pub fn new(db_override: Option<&Path>, config_override: Option<&Path>) -> Result<Self> {
        let data_dir = || config::default_data_dir().context("Failed to get data directory");

        let config_path = match config_override {
            Some(path) => path.to_path_buf(),
            None => data_dir()?.join(CONFIG_FILE_NAME),
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let db_path = match db_override {
            Some(path) => path.to_path_buf(),
            None => config.database_path(&data_dir()?),
        };
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?
            .with_batch_params(config.seed_batch_params);
        log::debug!("Using database {}", db_path.display());

        let session = StudySession::new(store).with_default_goal(config.default_daily_goal);

        Ok(Self {
            config,
            db_path,
            session,
        })
    }

    pub fn store(&self) -> &SqliteStore {
        self.session.store()
    }

    pub fn vocabulary(&self) -> Vocabulary<'_, SqliteStore> {
        Vocabulary::new(self.session.store())
    }

    /// Day rollover plus today's queues; every study command starts here
    pub fn load_today(&mut self) -> Result<&DailySet> {
        self.session
            .load_daily_set(None)
            .context("Failed to load today's words")
    }
}
