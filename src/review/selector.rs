//! Builds the daily "to learn" and "to review" queues

use chrono::{DateTime, Utc};

use crate::progress::UserProgress;
use crate::storage::{Result, Word, WordStore};

pub struct DailySetSelector<'a, S> {
    store: &'a S,
}

impl<'a, S: WordStore> DailySetSelector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Never-started words, newest first, at most `limit`.
    /// A zero limit skips the query.
    pub fn words_to_learn(&self, limit: usize) -> Result<Vec<Word>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.store.find_due_for_learning(limit)
    }

    /// Words still wanted under today's remaining quota
    pub fn daily_words_to_learn(&self, progress: &UserProgress) -> Result<Vec<Word>> {
        self.words_to_learn(progress.remaining_quota())
    }

    /// Every started word due at `now`, earliest due first
    pub fn words_to_review(&self, now: DateTime<Utc>) -> Result<Vec<Word>> {
        self.store.find_due_for_review(now)
    }

    /// A full goal's worth of new words, regardless of what was learned today
    pub fn extra_words_to_learn(&self, progress: &UserProgress) -> Result<Vec<Word>> {
        self.words_to_learn(progress.daily_goal as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewWord, SqliteStore, DEFAULT_CATEGORY_ID};
    use chrono::Duration;
    use std::collections::HashSet;

    fn store_with_words(count: usize) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let words: Vec<NewWord> = (0..count)
            .map(|i| NewWord::new(DEFAULT_CATEGORY_ID, format!("word{i}"), format!("ord{i}")))
            .collect();
        store.insert_words(&words, Utc::now() - Duration::hours(1)).unwrap();
        store
    }

    #[test]
    fn test_learn_limit() {
        let store = store_with_words(5);
        let selector = DailySetSelector::new(&store);

        assert_eq!(selector.words_to_learn(3).unwrap().len(), 3);
        assert_eq!(selector.words_to_learn(10).unwrap().len(), 5);
        assert!(selector.words_to_learn(0).unwrap().is_empty());
    }

    #[test]
    fn test_quota_from_progress() {
        let store = store_with_words(8);
        let selector = DailySetSelector::new(&store);

        let mut progress = UserProgress::with_goal(5);
        progress.learned_today = 3;
        assert_eq!(selector.daily_words_to_learn(&progress).unwrap().len(), 2);

        progress.learned_today = 7;
        assert!(selector.daily_words_to_learn(&progress).unwrap().is_empty());
        assert_eq!(selector.extra_words_to_learn(&progress).unwrap().len(), 5);
    }

    #[test]
    fn test_queues_never_overlap() {
        let store = store_with_words(6);
        let now = Utc::now();
        for mut word in store.list_words(None).unwrap().into_iter().take(3) {
            word.priority = 2;
            store.update_word(&word).unwrap();
        }

        let selector = DailySetSelector::new(&store);
        let to_learn: HashSet<i64> = selector.words_to_learn(100).unwrap().iter().map(|w| w.id).collect();
        let to_review: HashSet<i64> = selector.words_to_review(now).unwrap().iter().map(|w| w.id).collect();

        assert_eq!(to_learn.len(), 3);
        assert_eq!(to_review.len(), 3);
        assert!(to_learn.is_disjoint(&to_review));
    }
}
