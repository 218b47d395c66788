//! First-launch seeding of preloaded categories and words

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::models::{NewWord, Provenance, DEFAULT_CATEGORY_ID};
use super::sqlite::{insert_word_rows, SqliteStore};
use super::store::Result;

/// A category shipped with the app, referenced by words through `key`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadCategory {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadWord {
    /// Key of a pack category; the default category when absent or unknown
    #[serde(default)]
    pub category: Option<String>,
    pub text: String,
    pub translation: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}

/// Seed content as shipped in a JSON pack
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadPack {
    #[serde(default)]
    pub categories: Vec<PreloadCategory>,
    #[serde(default)]
    pub words: Vec<PreloadWord>,
}

impl PreloadPack {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub categories: usize,
    pub words: usize,
    /// Preloaded words were already present
    pub skipped: bool,
}

/// Insert a preload pack in one transaction. Does nothing when preloaded words
/// already exist, so it is safe to call on every launch.
pub fn seed_preloaded(store: &SqliteStore, pack: &PreloadPack, now: DateTime<Utc>) -> Result<SeedReport> {
    let conn = store.connection();
    let tx = conn.unchecked_transaction()?;

    let already_seeded: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM words WHERE provenance = ?1)",
        params![Provenance::Preloaded],
        |row| row.get(0),
    )?;
    if already_seeded {
        log::debug!("Preloaded words present, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut category_ids = HashMap::new();
    for category in &pack.categories {
        tx.execute(
            "INSERT INTO categories (name, icon, provenance) VALUES (?1, ?2, ?3)",
            params![category.name, category.icon, Provenance::Preloaded],
        )?;
        category_ids.insert(category.key.as_str(), tx.last_insert_rowid());
    }

    let words: Vec<NewWord> = pack
        .words
        .iter()
        .map(|word| {
            let category_id = word
                .category
                .as_deref()
                .and_then(|key| category_ids.get(key).copied())
                .unwrap_or(DEFAULT_CATEGORY_ID);

            NewWord {
                category_id,
                text: word.text.clone(),
                translation: word.translation.clone(),
                transcription: word.transcription.clone(),
                example: word.example.clone(),
                provenance: Provenance::Preloaded,
            }
        })
        .collect();

    let inserted = insert_word_rows(&tx, &words, now, store.batch_params())?;
    tx.commit()?;

    log::info!(
        "Seeded {} preloaded categories and {} words",
        category_ids.len(),
        inserted
    );

    Ok(SeedReport {
        categories: category_ids.len(),
        words: inserted,
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CategoryStore, WordStore};

    const PACK: &str = r#"{
        "categories": [
            { "key": "animals", "name": "Animals", "icon": "paw" },
            { "key": "food", "name": "Food" }
        ],
        "words": [
            { "category": "animals", "text": "cat", "translation": "kat" },
            { "category": "animals", "text": "dog", "translation": "hund" },
            { "category": "food", "text": "bread", "translation": "brød", "example": "Fresh bread" },
            { "text": "hello", "translation": "hej" },
            { "category": "missing", "text": "yes", "translation": "ja" }
        ]
    }"#;

    #[test]
    fn test_seed_pack() {
        let store = SqliteStore::open_in_memory().unwrap();
        let pack = PreloadPack::from_json(PACK).unwrap();

        let report = seed_preloaded(&store, &pack, Utc::now()).unwrap();
        assert_eq!(report.categories, 2);
        assert_eq!(report.words, 5);
        assert!(!report.skipped);

        let categories = store.list_categories().unwrap();
        assert_eq!(categories.len(), 3);
        let animals = categories.iter().find(|c| c.name == "Animals").unwrap();
        assert_eq!(animals.word_count, 2);
        assert!(animals.provenance.is_preloaded());

        let defaults = store.list_words(Some(DEFAULT_CATEGORY_ID)).unwrap();
        assert_eq!(defaults.len(), 2);
        assert!(defaults.iter().all(|w| w.provenance.is_preloaded() && w.priority == 0));
    }

    #[test]
    fn test_seed_is_skipped_when_present() {
        let store = SqliteStore::open_in_memory().unwrap();
        let pack = PreloadPack::from_json(PACK).unwrap();

        seed_preloaded(&store, &pack, Utc::now()).unwrap();
        let again = seed_preloaded(&store, &pack, Utc::now()).unwrap();

        assert!(again.skipped);
        assert_eq!(store.list_words(None).unwrap().len(), 5);
        assert_eq!(store.list_categories().unwrap().len(), 3);
    }

    #[test]
    fn test_seed_large_pack_in_small_batches() {
        let store = SqliteStore::open_in_memory().unwrap().with_batch_params(16);
        let pack = PreloadPack {
            categories: Vec::new(),
            words: (0..41)
                .map(|i| PreloadWord {
                    category: None,
                    text: format!("word{i}"),
                    translation: format!("ord{i}"),
                    transcription: None,
                    example: None,
                })
                .collect(),
        };

        let report = seed_preloaded(&store, &pack, Utc::now()).unwrap();
        assert_eq!(report.words, 41);
        assert_eq!(store.find_due_for_learning(100).unwrap().len(), 41);
    }
}
