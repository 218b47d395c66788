//! Applies repetition state transitions to stored words

use chrono::{DateTime, Utc};

use super::algorithm::{calculate_next_review, ReviewResult};
use crate::storage::{Result, StoreError, Word, WordStore};

/// Moves words through `to learn -> in review -> learned`
pub struct ReviewScheduler<'a, S> {
    store: &'a S,
}

impl<'a, S: WordStore> ReviewScheduler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Successful review ("I remember") of a started word
    pub fn review_word(&self, word: &Word, now: DateTime<Utc>) -> Result<Word> {
        if word.priority == 0 {
            return Err(StoreError::WordNotStarted(word.id));
        }

        let ReviewResult {
            priority,
            offset,
            next_review,
            learned,
        } = calculate_next_review(word.priority, now);

        let mut updated = word.clone();
        updated.priority = priority;
        updated.next_review = next_review;
        updated.learned = learned;
        self.store.update_word(&updated)?;

        log::debug!(
            "Word {} reviewed: priority {} -> {}, next in {:?}",
            word.id,
            word.priority,
            priority,
            offset
        );
        if learned {
            log::info!("Word {} reached the maximal interval and is learned", word.id);
        }

        Ok(updated)
    }

    /// Move a never-started word into the review rotation ("don't know yet").
    /// The due date is left alone and set by the first review.
    pub fn start_learning_word(&self, word: &Word) -> Result<Word> {
        if word.priority != 0 {
            return Err(StoreError::WordAlreadyStarted(word.id));
        }

        let mut updated = word.clone();
        updated.priority = 1;
        self.store.update_word(&updated)?;

        log::debug!("Word {} started learning", word.id);
        Ok(updated)
    }

    /// "I already know this": skip the schedule entirely
    pub fn mark_word_completely_learned(&self, word: &Word) -> Result<Word> {
        let mut updated = word.clone();
        updated.learned = true;
        self.store.update_word(&updated)?;

        log::debug!("Word {} marked as learned", word.id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewWord, SqliteStore, DEFAULT_CATEGORY_ID};
    use chrono::Duration;

    fn store_with_word(priority: u32) -> (SqliteStore, Word) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut word = store
            .insert_word(&NewWord::new(DEFAULT_CATEGORY_ID, "vand", "water"), Utc::now())
            .unwrap();
        word.priority = priority;
        store.update_word(&word).unwrap();
        (store, word)
    }

    #[test]
    fn test_start_learning() {
        let (store, word) = store_with_word(0);
        let scheduler = ReviewScheduler::new(&store);

        let started = scheduler.start_learning_word(&word).unwrap();
        assert_eq!(started.priority, 1);
        assert!(!started.learned);
        assert_eq!(started.next_review, word.next_review);

        let stored = store.get_word(word.id).unwrap();
        assert_eq!(stored.priority, 1);
    }

    #[test]
    fn test_start_learning_rejects_started_word() {
        let (store, word) = store_with_word(3);
        let scheduler = ReviewScheduler::new(&store);

        let result = scheduler.start_learning_word(&word);
        assert!(matches!(result, Err(StoreError::WordAlreadyStarted(_))));
        assert_eq!(store.get_word(word.id).unwrap().priority, 3);
    }

    #[test]
    fn test_review_persists_next_state() {
        let (store, word) = store_with_word(1);
        let scheduler = ReviewScheduler::new(&store);
        let now = Utc::now();

        let reviewed = scheduler.review_word(&word, now).unwrap();
        assert_eq!(reviewed.priority, 2);
        assert!(reviewed.next_review > now);
        assert!(!reviewed.learned);

        let stored = store.get_word(word.id).unwrap();
        assert_eq!(stored.priority, 2);
        assert_eq!(
            stored.next_review.timestamp_millis(),
            (now + Duration::minutes(10)).timestamp_millis()
        );
    }

    #[test]
    fn test_review_to_graduation() {
        let (store, word) = store_with_word(12);
        let scheduler = ReviewScheduler::new(&store);

        let reviewed = scheduler.review_word(&word, Utc::now()).unwrap();
        assert_eq!(reviewed.priority, 13);
        assert!(reviewed.learned);
        assert!(store.get_word(word.id).unwrap().learned);
    }

    #[test]
    fn test_review_rejects_unstarted_word() {
        let (store, word) = store_with_word(0);
        let scheduler = ReviewScheduler::new(&store);

        let result = scheduler.review_word(&word, Utc::now());
        assert!(matches!(result, Err(StoreError::WordNotStarted(_))));
    }

    #[test]
    fn test_mark_learned_from_any_priority() {
        for priority in [0, 4, 9] {
            let (store, word) = store_with_word(priority);
            let scheduler = ReviewScheduler::new(&store);

            let learned = scheduler.mark_word_completely_learned(&word).unwrap();
            assert!(learned.learned);
            assert_eq!(learned.priority, priority);
            assert!(store.get_word(word.id).unwrap().learned);
        }
    }

    #[test]
    fn test_review_of_deleted_word_fails() {
        let (store, word) = store_with_word(2);
        store.delete_word(word.id).unwrap();
        let scheduler = ReviewScheduler::new(&store);

        let result = scheduler.review_word(&word, Utc::now());
        assert!(matches!(result, Err(StoreError::WordNotFound(_))));
    }
}
