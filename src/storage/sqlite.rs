//! SQLite-backed word, category and progress store

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::models::*;
use super::store::{AtomicStore, CategoryStore, ProgressStore, Result, StoreError, WordStore};
use crate::progress::UserProgress;

/// SQLite's default bound-parameter limit
pub const MAX_SQL_PARAMS: usize = 999;

/// Columns bound per row by a batch word insert
const WORD_INSERT_PARAMS: usize = 8;

const WORD_COLUMNS: &str = "id, category_id, text, translation, transcription, example, provenance, learned, priority, next_review, created_at";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        icon TEXT,
        provenance TEXT NOT NULL DEFAULT 'user'
    );

    -- Timestamps are UTC milliseconds so due-date comparisons stay numeric
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        text TEXT NOT NULL,
        translation TEXT NOT NULL,
        transcription TEXT,
        example TEXT,
        provenance TEXT NOT NULL DEFAULT 'user',
        learned INTEGER NOT NULL DEFAULT 0,
        priority INTEGER NOT NULL DEFAULT 0,
        next_review INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_text TEXT NOT NULL,
        target_language TEXT NOT NULL,
        translated_text TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_progress (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        streak INTEGER NOT NULL DEFAULT 0,
        daily_goal INTEGER NOT NULL,
        learned_today INTEGER NOT NULL DEFAULT 0,
        reviewed_today INTEGER NOT NULL DEFAULT 0,
        total_learned_words INTEGER NOT NULL DEFAULT 0,
        last_learning_date TEXT,
        daily_goal_achieve INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_words_schedule ON words(learned, priority, next_review);
    CREATE INDEX IF NOT EXISTS idx_words_category ON words(category_id);
"#;

impl ToSql for Provenance {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Provenance {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Provenance::parse(text).ok_or_else(|| FromSqlError::Other(format!("unknown provenance: {text}").into()))
    }
}

fn millis_to_datetime(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, format!("timestamp out of range: {millis}").into())
    })
}

fn word_from_row(row: &Row<'_>) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        category_id: row.get(1)?,
        text: row.get(2)?,
        translation: row.get(3)?,
        transcription: row.get(4)?,
        example: row.get(5)?,
        provenance: row.get(6)?,
        learned: row.get(7)?,
        priority: row.get(8)?,
        next_review: millis_to_datetime(9, row.get(9)?)?,
        created_at: millis_to_datetime(10, row.get(10)?)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let word_count: i64 = row.get(4)?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        provenance: row.get(3)?,
        word_count: usize::try_from(word_count).unwrap_or_default(),
    })
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<UserProgress> {
    let last_learning_date = row
        .get::<_, Option<String>>(5)?
        .map(|text| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))
        })
        .transpose()?;

    Ok(UserProgress {
        streak: row.get(0)?,
        daily_goal: row.get(1)?,
        learned_today: row.get(2)?,
        reviewed_today: row.get(3)?,
        total_learned_words: row.get(4)?,
        last_learning_date,
        daily_goal_achieve: row.get(6)?,
    })
}

pub(crate) fn query_word(conn: &Connection, id: i64) -> Result<Word> {
    conn.query_row(
        &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
        params![id],
        word_from_row,
    )
    .optional()?
    .ok_or(StoreError::WordNotFound(id))
}

pub(crate) fn query_category(conn: &Connection, id: i64) -> Result<Category> {
    conn.query_row(
        "SELECT c.id, c.name, c.icon, c.provenance,
                (SELECT COUNT(*) FROM words w WHERE w.category_id = c.id)
         FROM categories c WHERE c.id = ?1",
        params![id],
        category_from_row,
    )
    .optional()?
    .ok_or(StoreError::CategoryNotFound(id))
}

pub(crate) fn query_all_words(conn: &Connection) -> Result<Vec<Word>> {
    let mut stmt = conn.prepare(&format!("SELECT {WORD_COLUMNS} FROM words ORDER BY id"))?;
    let words = stmt.query_map([], word_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(words)
}

pub(crate) fn query_all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.icon, c.provenance, COUNT(w.id)
         FROM categories c LEFT JOIN words w ON w.category_id = c.id
         GROUP BY c.id ORDER BY c.id",
    )?;
    let categories = stmt.query_map([], category_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub(crate) fn query_counters(conn: &Connection) -> Result<UserProgress> {
    let progress = conn.query_row(
        "SELECT streak, daily_goal, learned_today, reviewed_today, total_learned_words,
                last_learning_date, daily_goal_achieve
         FROM user_progress WHERE id = 1",
        [],
        progress_from_row,
    )?;
    Ok(progress)
}

pub(crate) fn write_counters(conn: &Connection, progress: &UserProgress) -> Result<()> {
    let last_learning_date = progress
        .last_learning_date
        .map(|date| date.format("%Y-%m-%d").to_string());

    conn.execute(
        "INSERT INTO user_progress (id, streak, daily_goal, learned_today, reviewed_today,
                                    total_learned_words, last_learning_date, daily_goal_achieve)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            streak = excluded.streak,
            daily_goal = excluded.daily_goal,
            learned_today = excluded.learned_today,
            reviewed_today = excluded.reviewed_today,
            total_learned_words = excluded.total_learned_words,
            last_learning_date = excluded.last_learning_date,
            daily_goal_achieve = excluded.daily_goal_achieve",
        params![
            progress.streak,
            progress.daily_goal,
            progress.learned_today,
            progress.reviewed_today,
            progress.total_learned_words,
            last_learning_date,
            progress.daily_goal_achieve,
        ],
    )?;
    Ok(())
}

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

/// Insert words with multi-row statements, each kept under `max_params`
/// bound parameters. Runs on the caller's connection or transaction.
pub(crate) fn insert_word_rows(
    conn: &Connection,
    words: &[NewWord],
    now: DateTime<Utc>,
    max_params: usize,
) -> Result<usize> {
    let rows_per_chunk = (max_params.min(MAX_SQL_PARAMS) / WORD_INSERT_PARAMS).max(1);
    let timestamp = now.timestamp_millis();
    let mut inserted = 0;

    for chunk in words.chunks(rows_per_chunk) {
        let placeholders = vec!["(?, ?, ?, ?, ?, ?, ?, ?)"; chunk.len()].join(", ");
        let sql = format!(
            "INSERT INTO words (category_id, text, translation, transcription, example, provenance, next_review, created_at) VALUES {placeholders}"
        );

        let mut values = Vec::with_capacity(chunk.len() * WORD_INSERT_PARAMS);
        for word in chunk {
            values.push(Value::Integer(word.category_id));
            values.push(Value::Text(word.text.clone()));
            values.push(Value::Text(word.translation.clone()));
            values.push(optional_text(&word.transcription));
            values.push(optional_text(&word.example));
            values.push(Value::Text(word.provenance.as_str().to_string()));
            values.push(Value::Integer(timestamp));
            values.push(Value::Integer(timestamp));
        }

        inserted += conn.execute(&sql, params_from_iter(values.iter()))?;
        log::debug!("Inserted batch of {} words", chunk.len());
    }

    Ok(inserted)
}

/// Local SQLite database holding words, categories, cached translations and
/// the progress counters
pub struct SqliteStore {
    conn: Connection,
    batch_params: usize,
}

impl SqliteStore {
    /// Open (and create if needed) the database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    /// Throwaway database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        conn.execute(
            "INSERT OR IGNORE INTO categories (id, name, icon, provenance) VALUES (?1, ?2, NULL, ?3)",
            params![DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, Provenance::Preloaded],
        )?;

        let has_progress: bool = conn.query_row("SELECT EXISTS(SELECT 1 FROM user_progress WHERE id = 1)", [], |row| row.get(0))?;
        if !has_progress {
            write_counters(&conn, &UserProgress::default())?;
        }

        Ok(Self {
            conn,
            batch_params: MAX_SQL_PARAMS,
        })
    }

    /// Cap on bound parameters per batch insert statement
    pub fn with_batch_params(mut self, batch_params: usize) -> Self {
        self.batch_params = batch_params.clamp(WORD_INSERT_PARAMS, MAX_SQL_PARAMS);
        self
    }

    pub fn batch_params(&self) -> usize {
        self.batch_params
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Aggregate counts over the whole library
    pub fn stats(&self, now: DateTime<Utc>) -> Result<LibraryStats> {
        let (total, to_learn, in_progress, learned, due_now) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN learned = 0 AND priority = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN learned = 0 AND priority > 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(learned), 0),
                    COALESCE(SUM(CASE WHEN learned = 0 AND priority > 0 AND next_review <= ?1 THEN 1 ELSE 0 END), 0)
             FROM words",
            params![now.timestamp_millis()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )?;
        let categories: i64 = self.conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

        let count = |value: i64| usize::try_from(value).unwrap_or_default();
        Ok(LibraryStats {
            total_words: count(total),
            to_learn: count(to_learn),
            in_progress: count(in_progress),
            learned: count(learned),
            due_now: count(due_now),
            categories: count(categories),
        })
    }
}

impl WordStore for SqliteStore {
    fn find_due_for_learning(&self, limit: usize) -> Result<Vec<Word>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words
             WHERE learned = 0 AND priority = 0
             ORDER BY id DESC LIMIT ?1"
        ))?;
        let words = stmt
            .query_map(params![limit], word_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    fn find_due_for_review(&self, now: DateTime<Utc>) -> Result<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words
             WHERE learned = 0 AND priority > 0 AND next_review <= ?1
             ORDER BY next_review ASC, id ASC"
        ))?;
        let words = stmt
            .query_map(params![now.timestamp_millis()], word_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }

    fn get_word(&self, id: i64) -> Result<Word> {
        query_word(&self.conn, id)
    }

    fn list_words(&self, category_id: Option<i64>) -> Result<Vec<Word>> {
        match category_id {
            Some(category_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {WORD_COLUMNS} FROM words WHERE category_id = ?1 ORDER BY id"
                ))?;
                let words = stmt
                    .query_map(params![category_id], word_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(words)
            }
            None => query_all_words(&self.conn),
        }
    }

    fn insert_word(&self, word: &NewWord, now: DateTime<Utc>) -> Result<Word> {
        let timestamp = now.timestamp_millis();
        self.conn.execute(
            "INSERT INTO words (category_id, text, translation, transcription, example, provenance, next_review, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                word.category_id,
                word.text,
                word.translation,
                word.transcription,
                word.example,
                word.provenance,
                timestamp,
                timestamp,
            ],
        )?;
        query_word(&self.conn, self.conn.last_insert_rowid())
    }

    fn insert_words(&self, words: &[NewWord], now: DateTime<Utc>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let inserted = insert_word_rows(&tx, words, now, self.batch_params)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn update_word(&self, word: &Word) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE words SET category_id = ?1, text = ?2, translation = ?3, transcription = ?4,
                              example = ?5, learned = ?6, priority = ?7, next_review = ?8
             WHERE id = ?9",
            params![
                word.category_id,
                word.text,
                word.translation,
                word.transcription,
                word.example,
                word.learned,
                word.priority,
                word.next_review.timestamp_millis(),
                word.id,
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::WordNotFound(word.id));
        }
        Ok(())
    }

    fn delete_word(&self, id: i64) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM words WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::WordNotFound(id));
        }
        Ok(())
    }

    fn reset_words_progress(&self, now: DateTime<Utc>) -> Result<usize> {
        let updated = self.conn.execute(
            "UPDATE words SET learned = 0, priority = 0, next_review = ?1",
            params![now.timestamp_millis()],
        )?;
        Ok(updated)
    }
}

impl CategoryStore for SqliteStore {
    fn list_categories(&self) -> Result<Vec<Category>> {
        query_all_categories(&self.conn)
    }

    fn get_category(&self, id: i64) -> Result<Category> {
        query_category(&self.conn, id)
    }

    fn insert_category(&self, name: &str, icon: Option<&str>, provenance: Provenance) -> Result<Category> {
        self.conn.execute(
            "INSERT INTO categories (name, icon, provenance) VALUES (?1, ?2, ?3)",
            params![name, icon, provenance],
        )?;
        query_category(&self.conn, self.conn.last_insert_rowid())
    }

    fn update_category(&self, category: &Category) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE categories SET name = ?1, icon = ?2 WHERE id = ?3",
            params![category.name, category.icon, category.id],
        )?;
        if updated == 0 {
            return Err(StoreError::CategoryNotFound(category.id));
        }
        Ok(())
    }

    fn delete_category_reassigning(&self, id: i64, fallback_id: i64) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        // Both ends must exist before any word moves
        query_category(&tx, id)?;
        query_category(&tx, fallback_id)?;

        let moved = tx.execute(
            "UPDATE words SET category_id = ?1 WHERE category_id = ?2",
            params![fallback_id, id],
        )?;
        tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(moved)
    }
}

impl AtomicStore for SqliteStore {
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        // Statements issued through `self.conn` run inside this transaction
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}

impl ProgressStore for SqliteStore {
    fn get_counters(&self) -> Result<UserProgress> {
        query_counters(&self.conn)
    }

    fn set_counters(&self, progress: &UserProgress) -> Result<()> {
        write_counters(&self.conn, progress)
    }
}
