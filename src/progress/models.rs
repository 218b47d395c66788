//! Daily goal and streak counters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily goal used on first launch and after a progress reset
pub const DEFAULT_DAILY_GOAL: u32 = 10;

/// Per-installation learning counters.
///
/// `daily_goal_achieve` mirrors `learned_today >= daily_goal`; every mutating
/// method below keeps the two in step and moves `streak` with the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Consecutive calendar days the goal was met
    pub streak: u32,
    /// Target of newly learned words per day, at least 1
    pub daily_goal: u32,
    pub learned_today: u32,
    pub reviewed_today: u32,
    pub total_learned_words: u32,
    /// Last calendar day a word was learned (serialized as YYYY-MM-DD)
    pub last_learning_date: Option<NaiveDate>,
    pub daily_goal_achieve: bool,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::with_goal(DEFAULT_DAILY_GOAL)
    }
}

/// Effect of a goal change on today's achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalChange {
    Unchanged,
    /// Lowering the goal reached it retroactively
    Achieved,
    /// Raising the goal took today's achievement back
    Unachieved,
}

/// Outcome of the day-rollover check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rollover {
    SameDay,
    /// Last learning day was yesterday; daily counters reset, streak kept
    NewDay,
    /// A whole day was skipped; daily counters and streak reset
    StreakBroken,
}

impl UserProgress {
    pub fn with_goal(daily_goal: u32) -> Self {
        Self {
            streak: 0,
            daily_goal: daily_goal.max(1),
            learned_today: 0,
            reviewed_today: 0,
            total_learned_words: 0,
            last_learning_date: None,
            daily_goal_achieve: false,
        }
    }

    /// Copy with the goal clamped to at least 1 and the achieved flag
    /// recomputed from the counters, for data coming from outside
    pub fn normalized(&self) -> Self {
        let mut progress = self.clone();
        progress.daily_goal = progress.daily_goal.max(1);
        progress.daily_goal_achieve = progress.goal_met();
        progress
    }

    pub fn goal_met(&self) -> bool {
        self.learned_today >= self.daily_goal
    }

    /// How many new words are still wanted today
    pub fn remaining_quota(&self) -> usize {
        self.daily_goal.saturating_sub(self.learned_today) as usize
    }

    /// Count a newly learned word. Returns true when this word reached the goal.
    pub fn record_learned(&mut self, today: NaiveDate) -> bool {
        self.learned_today = self.learned_today.saturating_add(1);
        self.total_learned_words = self.total_learned_words.saturating_add(1);

        if self.last_learning_date != Some(today) {
            self.last_learning_date = Some(today);
        }

        if !self.daily_goal_achieve && self.goal_met() {
            self.daily_goal_achieve = true;
            self.streak = self.streak.saturating_add(1);
            return true;
        }

        false
    }

    /// Reviews never count toward the goal or the streak
    pub fn record_reviewed(&mut self) {
        self.reviewed_today = self.reviewed_today.saturating_add(1);
    }

    /// Set a new goal (clamped to at least 1) and re-evaluate today's achievement
    pub fn apply_daily_goal(&mut self, daily_goal: u32) -> GoalChange {
        self.daily_goal = daily_goal.max(1);

        match (self.daily_goal_achieve, self.goal_met()) {
            (false, true) => {
                self.daily_goal_achieve = true;
                self.streak = self.streak.saturating_add(1);
                GoalChange::Achieved
            }
            (true, false) => {
                self.daily_goal_achieve = false;
                self.streak = self.streak.saturating_sub(1);
                GoalChange::Unachieved
            }
            (true, true) | (false, false) => GoalChange::Unchanged,
        }
    }

    /// Calendar-day rollover, evaluated when the user data is loaded
    pub fn roll_over(&mut self, today: NaiveDate) -> Rollover {
        if self.last_learning_date == Some(today) {
            return Rollover::SameDay;
        }

        self.daily_goal_achieve = false;
        self.learned_today = 0;
        self.reviewed_today = 0;

        let yesterday = today.pred_opt();
        if self.last_learning_date.is_some() && self.last_learning_date == yesterday {
            Rollover::NewDay
        } else {
            self.streak = 0;
            Rollover::StreakBroken
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_learning_reaches_goal_once() {
        let today = date(2026, 3, 14);
        let mut progress = UserProgress::with_goal(5);
        progress.learned_today = 4;
        progress.last_learning_date = Some(today);

        assert!(progress.record_learned(today));
        assert_eq!(progress.learned_today, 5);
        assert!(progress.daily_goal_achieve);
        assert_eq!(progress.streak, 1);

        // Past the goal: no second increment
        assert!(!progress.record_learned(today));
        assert_eq!(progress.learned_today, 6);
        assert_eq!(progress.streak, 1);
    }

    #[test]
    fn test_first_learning_of_day_sets_date() {
        let today = date(2026, 3, 14);
        let mut progress = UserProgress::default();
        progress.record_learned(today);

        assert_eq!(progress.last_learning_date, Some(today));
        assert_eq!(progress.total_learned_words, 1);
        assert!(!progress.daily_goal_achieve);
    }

    #[test]
    fn test_review_only_counts_reviews() {
        let mut progress = UserProgress::with_goal(1);
        progress.record_reviewed();

        assert_eq!(progress.reviewed_today, 1);
        assert_eq!(progress.learned_today, 0);
        assert!(!progress.daily_goal_achieve);
        assert_eq!(progress.streak, 0);
    }

    #[test]
    fn test_lowering_goal_achieves() {
        let mut progress = UserProgress::with_goal(10);
        progress.learned_today = 3;
        progress.streak = 2;

        assert_eq!(progress.apply_daily_goal(3), GoalChange::Achieved);
        assert!(progress.daily_goal_achieve);
        assert_eq!(progress.streak, 3);

        // Lowering further changes nothing
        assert_eq!(progress.apply_daily_goal(2), GoalChange::Unchanged);
        assert_eq!(progress.streak, 3);
    }

    #[test]
    fn test_raising_goal_unachieves() {
        let mut progress = UserProgress::with_goal(3);
        progress.learned_today = 3;
        progress.daily_goal_achieve = true;
        progress.streak = 3;

        assert_eq!(progress.apply_daily_goal(4), GoalChange::Unachieved);
        assert!(!progress.daily_goal_achieve);
        assert_eq!(progress.streak, 2);
    }

    #[test]
    fn test_unachieve_floors_streak() {
        let mut progress = UserProgress::with_goal(1);
        progress.learned_today = 1;
        progress.daily_goal_achieve = true;
        progress.streak = 0;

        assert_eq!(progress.apply_daily_goal(5), GoalChange::Unachieved);
        assert_eq!(progress.streak, 0);
    }

    #[test]
    fn test_goal_clamped_to_one() {
        let mut progress = UserProgress::with_goal(0);
        assert_eq!(progress.daily_goal, 1);

        progress.apply_daily_goal(0);
        assert_eq!(progress.daily_goal, 1);
    }

    #[test]
    fn test_normalized_repairs_imported_counters() {
        let mut progress = UserProgress::with_goal(5);
        progress.daily_goal = 0;
        progress.learned_today = 2;
        progress.daily_goal_achieve = false;
        progress.streak = 3;

        let fixed = progress.normalized();
        assert_eq!(fixed.daily_goal, 1);
        assert!(fixed.daily_goal_achieve);
        assert_eq!(fixed.streak, 3);

        progress.daily_goal = 10;
        progress.daily_goal_achieve = true;
        assert!(!progress.normalized().daily_goal_achieve);
    }

    #[test]
    fn test_rollover_same_day() {
        let today = date(2026, 3, 14);
        let mut progress = UserProgress::with_goal(2);
        progress.learned_today = 2;
        progress.daily_goal_achieve = true;
        progress.streak = 4;
        progress.last_learning_date = Some(today);

        assert_eq!(progress.roll_over(today), Rollover::SameDay);
        assert_eq!(progress.learned_today, 2);
        assert!(progress.daily_goal_achieve);
    }

    #[test]
    fn test_rollover_from_yesterday_keeps_streak() {
        let today = date(2026, 3, 1);
        let mut progress = UserProgress::with_goal(2);
        progress.learned_today = 2;
        progress.reviewed_today = 7;
        progress.daily_goal_achieve = true;
        progress.streak = 4;
        progress.last_learning_date = Some(date(2026, 2, 28));

        assert_eq!(progress.roll_over(today), Rollover::NewDay);
        assert_eq!(progress.learned_today, 0);
        assert_eq!(progress.reviewed_today, 0);
        assert!(!progress.daily_goal_achieve);
        assert_eq!(progress.streak, 4);
    }

    #[test]
    fn test_rollover_after_skipped_day_breaks_streak() {
        let today = date(2026, 3, 14);
        let mut progress = UserProgress::with_goal(2);
        progress.streak = 9;
        progress.learned_today = 1;
        progress.last_learning_date = Some(date(2026, 3, 12));

        assert_eq!(progress.roll_over(today), Rollover::StreakBroken);
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.learned_today, 0);
    }

    #[test]
    fn test_rollover_without_history() {
        let mut progress = UserProgress::default();
        assert_eq!(progress.roll_over(date(2026, 3, 14)), Rollover::StreakBroken);
        assert_eq!(progress.streak, 0);
    }

    #[test]
    fn test_remaining_quota() {
        let mut progress = UserProgress::with_goal(5);
        progress.learned_today = 2;
        assert_eq!(progress.remaining_quota(), 3);

        progress.learned_today = 8;
        assert_eq!(progress.remaining_quota(), 0);
    }
}
