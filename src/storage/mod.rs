//! Durable storage for words, categories and progress counters

pub mod backup;
mod models;
pub mod seed;
mod sqlite;
mod store;

pub use models::*;
pub use sqlite::{SqliteStore, MAX_SQL_PARAMS};
pub use store::{AtomicStore, CategoryStore, ProgressStore, Result, StoreError, WordStore};
