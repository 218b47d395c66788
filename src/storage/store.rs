//! Store interfaces consumed by the scheduler, selector and tracker

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::models::{Category, NewWord, Provenance, Word};
use crate::progress::UserProgress;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Word not found: {0}")]
    WordNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Preloaded word {0} cannot be edited or deleted")]
    PreloadedWord(i64),

    #[error("Preloaded category {0} cannot be edited or deleted")]
    PreloadedCategory(i64),

    #[error("Word {0} has not been started yet")]
    WordNotStarted(i64),

    #[error("Word {0} is already in the review rotation")]
    WordAlreadyStarted(i64),

    #[error("Word {0} is already learned")]
    WordAlreadyLearned(i64),

    #[error("Unsupported backup version: {0}")]
    UnsupportedBackupVersion(u32),
}

impl StoreError {
    /// Invariant violations rejected before any write, as opposed to I/O failures
    pub fn is_domain(&self) -> bool {
        match self {
            Self::Sqlite(_) | Self::Json(_) | Self::Io(_) => false,
            Self::WordNotFound(_)
            | Self::CategoryNotFound(_)
            | Self::PreloadedWord(_)
            | Self::PreloadedCategory(_)
            | Self::WordNotStarted(_)
            | Self::WordAlreadyStarted(_)
            | Self::WordAlreadyLearned(_)
            | Self::UnsupportedBackupVersion(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable word records
pub trait WordStore {
    /// Words never started, most recently added first
    fn find_due_for_learning(&self, limit: usize) -> Result<Vec<Word>>;

    /// Started words due at `now`, earliest due first
    fn find_due_for_review(&self, now: DateTime<Utc>) -> Result<Vec<Word>>;

    fn get_word(&self, id: i64) -> Result<Word>;

    fn list_words(&self, category_id: Option<i64>) -> Result<Vec<Word>>;

    fn insert_word(&self, word: &NewWord, now: DateTime<Utc>) -> Result<Word>;

    /// Insert many words in one transaction, returns the number inserted
    fn insert_words(&self, words: &[NewWord], now: DateTime<Utc>) -> Result<usize>;

    fn update_word(&self, word: &Word) -> Result<()>;

    fn delete_word(&self, id: i64) -> Result<()>;

    /// Put every word back to the never-started state
    fn reset_words_progress(&self, now: DateTime<Utc>) -> Result<usize>;
}

/// Durable categories
pub trait CategoryStore {
    /// All categories with their word counts
    fn list_categories(&self) -> Result<Vec<Category>>;

    fn get_category(&self, id: i64) -> Result<Category>;

    fn insert_category(&self, name: &str, icon: Option<&str>, provenance: Provenance) -> Result<Category>;

    fn update_category(&self, category: &Category) -> Result<()>;

    /// Delete a category and move its words to `fallback_id` atomically,
    /// returns the number of words moved
    fn delete_category_reassigning(&self, id: i64, fallback_id: i64) -> Result<usize>;
}

/// The per-installation progress counters
pub trait ProgressStore {
    fn get_counters(&self) -> Result<UserProgress>;

    fn set_counters(&self, progress: &UserProgress) -> Result<()>;
}

/// Groups several store writes so they commit or roll back together
pub trait AtomicStore {
    /// Run `f` inside one transaction. An error from `f` rolls back every
    /// write it made. `f` must not open a transaction of its own.
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>;
}
