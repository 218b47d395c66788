//! Study session: the operations offered to the UI layer
//!
//! Wires the review scheduler, daily set selector and progress tracker
//! around one store and keeps the visible queues in memory.

use std::collections::VecDeque;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{GoalUpdate, LearningUpdate, ProgressTracker, UserProgress, DEFAULT_DAILY_GOAL};
use crate::review::{DailySetSelector, ReviewScheduler};
use crate::storage::{AtomicStore, ProgressStore, Result, StoreError, Word, WordStore};

/// The two queues shown to the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySet {
    pub to_learn: VecDeque<Word>,
    pub to_review: VecDeque<Word>,
    /// Last load failure, kept so the UI can offer a retry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The learn queue was loaded past today's quota
    #[serde(default)]
    pub extra: bool,
}

impl DailySet {
    pub fn is_empty(&self) -> bool {
        self.to_learn.is_empty() && self.to_review.is_empty()
    }

    fn remove_from_learn(&mut self, id: i64) {
        self.to_learn.retain(|w| w.id != id);
    }

    fn remove_from_review(&mut self, id: i64) {
        self.to_review.retain(|w| w.id != id);
    }
}

/// Which learn batch a load should produce
#[derive(Debug, Clone, Copy)]
enum LearnBatch {
    /// What is left of today's quota
    Remaining,
    /// A full goal's worth, past the quota
    FullGoal,
    Limit(u32),
}

pub struct StudySession<S> {
    store: S,
    progress: UserProgress,
    daily_set: DailySet,
    default_goal: u32,
}

impl<S: WordStore + ProgressStore + AtomicStore> StudySession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            progress: UserProgress::default(),
            daily_set: DailySet::default(),
            default_goal: DEFAULT_DAILY_GOAL,
        }
    }

    /// Goal restored by `reset_progress`
    pub fn with_default_goal(mut self, daily_goal: u32) -> Self {
        self.default_goal = daily_goal.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn daily_set(&self) -> &DailySet {
        &self.daily_set
    }

    pub fn load_daily_set(&mut self, goal_override: Option<u32>) -> Result<&DailySet> {
        self.load_daily_set_at(goal_override, Local::now())
    }

    /// Run the day-rollover check and rebuild both queues.
    ///
    /// `goal_override` replaces the remaining quota as the learn limit. On
    /// failure the previous queues stay in place and `error` is set.
    pub fn load_daily_set_at(&mut self, goal_override: Option<u32>, now: DateTime<Local>) -> Result<&DailySet> {
        let batch = match goal_override {
            Some(limit) => LearnBatch::Limit(limit),
            None => LearnBatch::Remaining,
        };
        self.reload(batch, now)
    }

    pub fn load_extra_daily_word_set(&mut self) -> Result<&DailySet> {
        self.load_extra_daily_word_set_at(Local::now())
    }

    /// Refill the learn queue with a full goal's worth of words, ignoring
    /// what was already learned today. The goal is read from the store.
    pub fn load_extra_daily_word_set_at(&mut self, now: DateTime<Local>) -> Result<&DailySet> {
        self.reload(LearnBatch::FullGoal, now)
    }

    fn reload(&mut self, batch: LearnBatch, now: DateTime<Local>) -> Result<&DailySet> {
        match self.build_daily_set(batch, now) {
            Ok((progress, to_learn, to_review)) => {
                self.progress = progress;
                self.daily_set = DailySet {
                    to_learn: to_learn.into(),
                    to_review: to_review.into(),
                    error: None,
                    extra: !matches!(batch, LearnBatch::Remaining),
                };
                Ok(&self.daily_set)
            }
            Err(e) => {
                log::warn!("Failed to load daily word set: {}", e);
                self.daily_set.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn build_daily_set(
        &self,
        batch: LearnBatch,
        now: DateTime<Local>,
    ) -> Result<(UserProgress, Vec<Word>, Vec<Word>)> {
        let progress = ProgressTracker::new(&self.store).load_user_data(now.date_naive())?;
        let selector = DailySetSelector::new(&self.store);

        let to_learn = match batch {
            LearnBatch::Remaining => selector.daily_words_to_learn(&progress)?,
            LearnBatch::FullGoal => selector.extra_words_to_learn(&progress)?,
            LearnBatch::Limit(limit) => selector.words_to_learn(limit as usize)?,
        };
        let to_review = selector.words_to_review(now.with_timezone(&Utc))?;

        Ok((progress, to_learn, to_review))
    }

    pub fn accept_learn(&mut self, id: i64) -> Result<LearningUpdate> {
        self.accept_learn_at(id, Local::now())
    }

    /// "I already know this word". The word and the counters commit together.
    pub fn accept_learn_at(&mut self, id: i64, now: DateTime<Local>) -> Result<LearningUpdate> {
        let update = self.store.atomically(|store| {
            let word = learnable_word(store, id)?;
            ReviewScheduler::new(store).mark_word_completely_learned(&word)?;
            ProgressTracker::new(store).update_after_learning_word(now.date_naive())
        })?;

        self.progress = update.progress.clone();
        self.daily_set.remove_from_learn(id);
        Ok(update)
    }

    pub fn reject_learn(&mut self, id: i64) -> Result<LearningUpdate> {
        self.reject_learn_at(id, Local::now())
    }

    /// "Don't know yet": start learning, the word joins the review rotation
    pub fn reject_learn_at(&mut self, id: i64, now: DateTime<Local>) -> Result<LearningUpdate> {
        let (started, update) = self.store.atomically(|store| {
            let word = learnable_word(store, id)?;
            let started = ReviewScheduler::new(store).start_learning_word(&word)?;
            let update = ProgressTracker::new(store).update_after_learning_word(now.date_naive())?;
            Ok((started, update))
        })?;

        self.progress = update.progress.clone();
        self.daily_set.remove_from_learn(id);
        if started.is_due_for_review(now.with_timezone(&Utc)) {
            self.daily_set.to_review.push_back(started);
        }
        Ok(update)
    }

    pub fn accept_review(&mut self, id: i64) -> Result<Word> {
        self.accept_review_at(id, Local::now())
    }

    /// "I remember": advance the schedule and count the review
    pub fn accept_review_at(&mut self, id: i64, now: DateTime<Local>) -> Result<Word> {
        let (reviewed, progress) = self.store.atomically(|store| {
            let word = store.get_word(id)?;
            let reviewed = ReviewScheduler::new(store).review_word(&word, now.with_timezone(&Utc))?;
            let progress = ProgressTracker::new(store).update_after_reviewing_word()?;
            Ok((reviewed, progress))
        })?;

        self.progress = progress;
        self.daily_set.remove_from_review(id);
        Ok(reviewed)
    }

    /// "Show later": move the word to the back of the review queue.
    /// Nothing is persisted. Returns false when the word is not queued.
    pub fn reject_review(&mut self, id: i64) -> bool {
        let Some(position) = self.daily_set.to_review.iter().position(|w| w.id == id) else {
            return false;
        };
        if let Some(word) = self.daily_set.to_review.remove(position) {
            self.daily_set.to_review.push_back(word);
        }
        true
    }

    pub fn change_daily_goal(&mut self, daily_goal: u32) -> Result<GoalUpdate> {
        let update = ProgressTracker::new(&self.store).change_daily_goal(daily_goal)?;
        self.progress = update.progress.clone();

        // The remaining quota changed, so the learn queue follows
        let to_learn = DailySetSelector::new(&self.store).daily_words_to_learn(&self.progress)?;
        self.daily_set.to_learn = to_learn.into();
        self.daily_set.extra = false;
        Ok(update)
    }

    pub fn reset_progress(&mut self) -> Result<&DailySet> {
        self.reset_progress_at(Local::now())
    }

    /// Counters back to defaults, then reload the queues
    pub fn reset_progress_at(&mut self, now: DateTime<Local>) -> Result<&DailySet> {
        self.progress = ProgressTracker::new(&self.store).reset_progress(self.default_goal)?;
        self.load_daily_set_at(None, now)
    }

    pub fn reset_words_progress(&mut self) -> Result<&DailySet> {
        self.reset_words_progress_at(Local::now())
    }

    /// Every word back to never-started, then reload the queues
    pub fn reset_words_progress_at(&mut self, now: DateTime<Local>) -> Result<&DailySet> {
        let reset = self.store.reset_words_progress(now.with_timezone(&Utc))?;
        log::info!("Reset learning progress of {} words", reset);
        self.load_daily_set_at(None, now)
    }
}

/// A word that may still be answered from the learn queue
fn learnable_word<S: WordStore>(store: &S, id: i64) -> Result<Word> {
    let word = store.get_word(id)?;
    if word.learned {
        return Err(StoreError::WordAlreadyLearned(id));
    }
    if word.priority != 0 {
        return Err(StoreError::WordAlreadyStarted(id));
    }
    Ok(word)
}
