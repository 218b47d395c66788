//! Word and category management with provenance rules
//!
//! Preloaded words keep their text but may change category. Preloaded
//! categories, including the default one, cannot be renamed or deleted.
//! Deleting a user category moves its words to the default category.

use chrono::{DateTime, Utc};

use crate::storage::{
    Category, CategoryStore, NewWord, Provenance, Result, StoreError, Word, WordEdit, WordStore,
    DEFAULT_CATEGORY_ID,
};

pub struct Vocabulary<'a, S> {
    store: &'a S,
}

impl<'a, S: WordStore + CategoryStore> Vocabulary<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn add_word(&self, word: &NewWord, now: DateTime<Utc>) -> Result<Word> {
        self.store.get_category(word.category_id)?;
        let created = self.store.insert_word(word, now)?;
        log::debug!("Added word {} to category {}", created.id, created.category_id);
        Ok(created)
    }

    pub fn edit_word(&self, id: i64, edit: WordEdit) -> Result<Word> {
        let mut word = self.store.get_word(id)?;

        if edit.changes_content() && word.provenance.is_preloaded() {
            return Err(StoreError::PreloadedWord(id));
        }
        if let Some(category_id) = edit.category_id {
            self.store.get_category(category_id)?;
            word.category_id = category_id;
        }

        if let Some(text) = edit.text {
            word.text = text;
        }
        if let Some(translation) = edit.translation {
            word.translation = translation;
        }
        if let Some(transcription) = edit.transcription {
            word.transcription = transcription;
        }
        if let Some(example) = edit.example {
            word.example = example;
        }

        self.store.update_word(&word)?;
        Ok(word)
    }

    pub fn delete_word(&self, id: i64) -> Result<()> {
        let word = self.store.get_word(id)?;
        if word.provenance.is_preloaded() {
            return Err(StoreError::PreloadedWord(id));
        }
        self.store.delete_word(id)
    }

    pub fn list_words(&self, category_id: Option<i64>) -> Result<Vec<Word>> {
        if let Some(category_id) = category_id {
            self.store.get_category(category_id)?;
        }
        self.store.list_words(category_id)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories()
    }

    pub fn add_category(&self, name: &str, icon: Option<&str>) -> Result<Category> {
        self.store.insert_category(name, icon, Provenance::UserAdded)
    }

    pub fn rename_category(&self, id: i64, name: Option<String>, icon: Option<String>) -> Result<Category> {
        let mut category = self.store.get_category(id)?;
        if category.provenance.is_preloaded() {
            return Err(StoreError::PreloadedCategory(id));
        }

        if let Some(name) = name {
            category.name = name;
        }
        if icon.is_some() {
            category.icon = icon;
        }

        self.store.update_category(&category)?;
        Ok(category)
    }

    /// Delete a user category, returns how many words moved to the default category
    pub fn delete_category(&self, id: i64) -> Result<usize> {
        let category = self.store.get_category(id)?;
        if category.provenance.is_preloaded() {
            return Err(StoreError::PreloadedCategory(id));
        }

        let moved = self.store.delete_category_reassigning(id, DEFAULT_CATEGORY_ID)?;
        log::info!(
            "Deleted category '{}', {} words moved to the default category",
            category.name,
            moved
        );
        Ok(moved)
    }
}
