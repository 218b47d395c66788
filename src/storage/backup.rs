//! Versioned JSON snapshot of the whole dataset

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::models::{Category, Provenance, Translation, Word, DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME};
use super::sqlite::{query_all_categories, query_all_words, query_counters, write_counters, SqliteStore};
use super::store::{Result, StoreError};
use crate::progress::UserProgress;

/// Snapshot format version written by this build
pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub user_data: UserProgress,
    pub categories: Vec<Category>,
    pub words: Vec<Word>,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

fn query_translations(conn: &rusqlite::Connection) -> Result<Vec<Translation>> {
    let mut stmt = conn.prepare(
        "SELECT id, source_text, target_language, translated_text FROM translations ORDER BY id",
    )?;
    let translations = stmt
        .query_map([], |row| {
            Ok(Translation {
                id: row.get(0)?,
                source_text: row.get(1)?,
                target_language: row.get(2)?,
                translated_text: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(translations)
}

/// Read everything into a snapshot
pub fn export_snapshot(store: &SqliteStore) -> Result<BackupSnapshot> {
    let conn = store.connection();
    Ok(BackupSnapshot {
        version: BACKUP_VERSION,
        created_at: Some(Utc::now()),
        user_data: query_counters(conn)?,
        categories: query_all_categories(conn)?,
        words: query_all_words(conn)?,
        translations: query_translations(conn)?,
    })
}

/// Replace the whole dataset with `snapshot` in one transaction
pub fn restore_snapshot(store: &SqliteStore, snapshot: &BackupSnapshot) -> Result<()> {
    if snapshot.version == 0 || snapshot.version > BACKUP_VERSION {
        return Err(StoreError::UnsupportedBackupVersion(snapshot.version));
    }

    let tx = store.connection().unchecked_transaction()?;

    tx.execute_batch(
        "DELETE FROM translations;
         DELETE FROM words;
         DELETE FROM categories;",
    )?;

    for category in &snapshot.categories {
        tx.execute(
            "INSERT INTO categories (id, name, icon, provenance) VALUES (?1, ?2, ?3, ?4)",
            params![category.id, category.name, category.icon, category.provenance],
        )?;
    }

    // Older snapshots may predate the default category
    tx.execute(
        "INSERT OR IGNORE INTO categories (id, name, icon, provenance) VALUES (?1, ?2, NULL, ?3)",
        params![DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, Provenance::Preloaded],
    )?;

    for word in &snapshot.words {
        tx.execute(
            "INSERT INTO words (id, category_id, text, translation, transcription, example, provenance,
                                learned, priority, next_review, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                word.id,
                word.category_id,
                word.text,
                word.translation,
                word.transcription,
                word.example,
                word.provenance,
                word.learned,
                word.priority,
                word.next_review.timestamp_millis(),
                word.created_at.timestamp_millis(),
            ],
        )?;
    }

    for translation in &snapshot.translations {
        tx.execute(
            "INSERT INTO translations (id, source_text, target_language, translated_text) VALUES (?1, ?2, ?3, ?4)",
            params![
                translation.id,
                translation.source_text,
                translation.target_language,
                translation.translated_text,
            ],
        )?;
    }

    let user_data = snapshot.user_data.normalized();
    if user_data != snapshot.user_data {
        log::warn!("Backup progress counters were inconsistent, goal and achievement recomputed");
    }
    write_counters(&tx, &user_data)?;
    tx.commit()?;

    log::info!(
        "Restored backup v{}: {} categories, {} words, {} translations",
        snapshot.version,
        snapshot.categories.len(),
        snapshot.words.len(),
        snapshot.translations.len()
    );
    Ok(())
}

/// Export the dataset to a JSON file
pub fn write_backup_file(store: &SqliteStore, output_path: &Path) -> Result<BackupSnapshot> {
    let snapshot = export_snapshot(store)?;
    fs::write(output_path, serde_json::to_string_pretty(&snapshot)?)?;
    log::info!("Wrote backup to {:?}", output_path);
    Ok(snapshot)
}

/// Restore the dataset from a JSON file
pub fn read_backup_file(store: &SqliteStore, input_path: &Path) -> Result<BackupSnapshot> {
    let content = fs::read_to_string(input_path)?;
    let snapshot: BackupSnapshot = serde_json::from_str(&content)?;
    restore_snapshot(store, &snapshot)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CategoryStore, NewWord, ProgressStore, WordStore};
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn populated_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let now = Utc::now();
        let verbs = store.insert_category("Verbs", Some("run"), Provenance::UserAdded).unwrap();

        let mut word = store.insert_word(&NewWord::new(verbs.id, "run", "løbe"), now).unwrap();
        word.priority = 4;
        word.next_review = now + Duration::minutes(60);
        store.update_word(&word).unwrap();
        store.insert_word(&NewWord::new(DEFAULT_CATEGORY_ID, "yes", "ja"), now).unwrap();

        store
            .connection()
            .execute(
                "INSERT INTO translations (source_text, target_language, translated_text) VALUES ('run', 'da', 'løbe')",
                [],
            )
            .unwrap();

        let mut progress = UserProgress::with_goal(4);
        progress.streak = 5;
        progress.last_learning_date = NaiveDate::from_ymd_opt(2026, 4, 1);
        store.set_counters(&progress).unwrap();
        store
    }

    #[test]
    fn test_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("backup.json");

        let source = populated_store();
        let exported = write_backup_file(&source, &path).unwrap();
        assert_eq!(exported.version, BACKUP_VERSION);
        assert_eq!(exported.words.len(), 2);
        assert_eq!(exported.translations.len(), 1);

        let target = SqliteStore::open_in_memory().unwrap();
        target.insert_word(&NewWord::new(DEFAULT_CATEGORY_ID, "stale", "gammel"), Utc::now()).unwrap();
        read_backup_file(&target, &path).unwrap();

        assert_eq!(target.get_counters().unwrap(), source.get_counters().unwrap());
        assert_eq!(target.list_categories().unwrap(), source.list_categories().unwrap());

        let words = target.list_words(None).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.text != "stale"));
        let run = words.iter().find(|w| w.text == "run").unwrap();
        assert_eq!(run.priority, 4);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = export_snapshot(&populated_store()).unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();

        for key in ["version", "userData", "categories", "words", "translations"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["userData"]["lastLearningDate"], "2026-04-01");
    }

    #[test]
    fn test_unknown_version_rejected_without_changes() {
        let store = populated_store();
        let mut snapshot = export_snapshot(&store).unwrap();
        snapshot.version = BACKUP_VERSION + 1;
        snapshot.words.clear();

        let result = restore_snapshot(&store, &snapshot);
        assert!(matches!(result, Err(StoreError::UnsupportedBackupVersion(_))));
        assert_eq!(store.list_words(None).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_restore_rolls_back() {
        let store = populated_store();
        let mut snapshot = export_snapshot(&store).unwrap();
        // Duplicate id violates the primary key halfway through
        let duplicate = snapshot.words[0].clone();
        snapshot.words.push(duplicate);

        assert!(restore_snapshot(&store, &snapshot).is_err());
        assert_eq!(store.list_words(None).unwrap().len(), 2);
        assert_eq!(store.list_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_repairs_inconsistent_counters() {
        let store = populated_store();
        let mut snapshot = export_snapshot(&store).unwrap();
        snapshot.user_data.daily_goal = 0;
        snapshot.user_data.learned_today = 3;
        snapshot.user_data.daily_goal_achieve = false;

        restore_snapshot(&store, &snapshot).unwrap();

        let restored = store.get_counters().unwrap();
        assert_eq!(restored.daily_goal, 1);
        assert!(restored.daily_goal_achieve);
        assert_eq!(restored.learned_today, 3);
        assert_eq!(restored.streak, 5);
    }
}
