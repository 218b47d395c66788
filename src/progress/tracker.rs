//! Persisting wrapper around the goal/streak counters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::models::{GoalChange, Rollover, UserProgress};
use crate::storage::{ProgressStore, Result};

/// Counters after a learned word, plus whether it just completed the goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningUpdate {
    pub progress: UserProgress,
    /// Fires at most once per day; drives the "goal achieved" overlay
    pub goal_just_achieved: bool,
}

/// Counters after a goal change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub progress: UserProgress,
    pub change: GoalChange,
}

/// Applies learning/review events to the stored counters
pub struct ProgressTracker<'a, S> {
    store: &'a S,
}

impl<'a, S: ProgressStore> ProgressTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn update_after_learning_word(&self, today: NaiveDate) -> Result<LearningUpdate> {
        let mut progress = self.store.get_counters()?;
        let goal_just_achieved = progress.record_learned(today);
        self.store.set_counters(&progress)?;

        if goal_just_achieved {
            log::info!(
                "Daily goal of {} reached, streak is now {}",
                progress.daily_goal,
                progress.streak
            );
        }

        Ok(LearningUpdate {
            progress,
            goal_just_achieved,
        })
    }

    pub fn update_after_reviewing_word(&self) -> Result<UserProgress> {
        let mut progress = self.store.get_counters()?;
        progress.record_reviewed();
        self.store.set_counters(&progress)?;
        Ok(progress)
    }

    pub fn change_daily_goal(&self, daily_goal: u32) -> Result<GoalUpdate> {
        let mut progress = self.store.get_counters()?;
        let change = progress.apply_daily_goal(daily_goal);
        self.store.set_counters(&progress)?;

        log::info!(
            "Daily goal set to {} ({:?}), streak {}",
            progress.daily_goal,
            change,
            progress.streak
        );

        Ok(GoalUpdate { progress, change })
    }

    /// Load the counters, resetting the daily ones when the calendar day changed
    pub fn load_user_data(&self, today: NaiveDate) -> Result<UserProgress> {
        let mut progress = self.store.get_counters()?;
        let previous_streak = progress.streak;

        match progress.roll_over(today) {
            Rollover::SameDay => return Ok(progress),
            Rollover::NewDay => log::debug!("New learning day {}", today),
            Rollover::StreakBroken => {
                if previous_streak > 0 {
                    log::info!("Streak of {} broken by a missed day", previous_streak);
                }
            }
        }

        self.store.set_counters(&progress)?;
        Ok(progress)
    }

    pub fn reset_progress(&self, daily_goal: u32) -> Result<UserProgress> {
        let progress = UserProgress::with_goal(daily_goal);
        self.store.set_counters(&progress)?;
        log::info!("Progress reset");
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Counters kept in memory
    #[derive(Default)]
    struct MemoryCounters(RefCell<UserProgress>);

    impl ProgressStore for MemoryCounters {
        fn get_counters(&self) -> Result<UserProgress> {
            Ok(self.0.borrow().clone())
        }

        fn set_counters(&self, progress: &UserProgress) -> Result<()> {
            *self.0.borrow_mut() = progress.clone();
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_learning_word_completes_goal() {
        let today = date(2026, 5, 2);
        let store = MemoryCounters::default();
        {
            let mut counters = store.0.borrow_mut();
            counters.daily_goal = 5;
            counters.learned_today = 4;
            counters.last_learning_date = Some(today);
        }

        let tracker = ProgressTracker::new(&store);
        let update = tracker.update_after_learning_word(today).unwrap();

        assert!(update.goal_just_achieved);
        assert_eq!(update.progress.learned_today, 5);
        assert_eq!(update.progress.streak, 1);
        assert_eq!(store.get_counters().unwrap(), update.progress);
    }

    #[test]
    fn test_reviewing_word_persists() {
        let store = MemoryCounters::default();
        let tracker = ProgressTracker::new(&store);

        tracker.update_after_reviewing_word().unwrap();
        tracker.update_after_reviewing_word().unwrap();

        let stored = store.get_counters().unwrap();
        assert_eq!(stored.reviewed_today, 2);
        assert_eq!(stored.learned_today, 0);
    }

    #[test]
    fn test_goal_round_trip_moves_streak_once() {
        let store = MemoryCounters::default();
        {
            let mut counters = store.0.borrow_mut();
            counters.daily_goal = 10;
            counters.learned_today = 4;
            counters.streak = 1;
        }
        let tracker = ProgressTracker::new(&store);

        let lowered = tracker.change_daily_goal(3).unwrap();
        assert_eq!(lowered.change, GoalChange::Achieved);
        assert_eq!(lowered.progress.streak, 2);

        let raised = tracker.change_daily_goal(8).unwrap();
        assert_eq!(raised.change, GoalChange::Unachieved);
        assert_eq!(raised.progress.streak, 1);
        assert!(!store.get_counters().unwrap().daily_goal_achieve);
    }

    #[test]
    fn test_load_user_data_rolls_over() {
        let store = MemoryCounters::default();
        {
            let mut counters = store.0.borrow_mut();
            counters.streak = 3;
            counters.learned_today = 10;
            counters.reviewed_today = 4;
            counters.daily_goal_achieve = true;
            counters.last_learning_date = Some(date(2026, 5, 1));
        }
        let tracker = ProgressTracker::new(&store);

        let progress = tracker.load_user_data(date(2026, 5, 2)).unwrap();
        assert_eq!(progress.streak, 3);
        assert_eq!(progress.learned_today, 0);
        assert_eq!(progress.reviewed_today, 0);
        assert!(!progress.daily_goal_achieve);
        assert_eq!(store.get_counters().unwrap(), progress);

        let later = tracker.load_user_data(date(2026, 5, 4)).unwrap();
        assert_eq!(later.streak, 0);
    }

    #[test]
    fn test_reset_progress() {
        let store = MemoryCounters::default();
        store.0.borrow_mut().streak = 12;
        let tracker = ProgressTracker::new(&store);

        let progress = tracker.reset_progress(15).unwrap();
        assert_eq!(progress, UserProgress::with_goal(15));
        assert_eq!(store.get_counters().unwrap().streak, 0);
    }
}
