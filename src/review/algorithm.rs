//! Two-phase repetition schedule
//!
//! A word's priority counts its successful repetitions. The first six steps
//! use short minute-scale offsets for consolidation, after which offsets come
//! from a day-scale table. The last day step is reused forever and a word that
//! reaches it is considered learned.
//!
//! | new priority | offset   |
//! |--------------|----------|
//! | 1..=6        | 5m, 10m, 30m, 1h, 2h, 4h |
//! | 7..=13       | 1d, 2d, 4d, 7d, 14d, 30d, 50d |
//! | 14..         | 50d      |

use chrono::{DateTime, Duration, Utc};

/// Minute offsets for the first repetitions
pub const MINUTE_STEPS: [i64; 6] = [5, 10, 30, 60, 120, 240];

/// Day offsets once the minute steps are exhausted
pub const DAY_STEPS: [i64; 7] = [1, 2, 4, 7, 14, 30, 50];

/// Day offset at which a word graduates to learned
pub const GRADUATION_DAYS: i64 = 50;

/// Delay until the next repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOffset {
    Minutes(i64),
    Days(i64),
}

impl ReviewOffset {
    pub fn duration(&self) -> Duration {
        match *self {
            Self::Minutes(minutes) => Duration::minutes(minutes),
            Self::Days(days) => Duration::days(days),
        }
    }

    /// Reaching the maximal interval marks the word learned
    pub fn graduates(&self) -> bool {
        matches!(*self, Self::Days(days) if days >= GRADUATION_DAYS)
    }
}

/// Result of a successful review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub priority: u32,
    pub offset: ReviewOffset,
    pub next_review: DateTime<Utc>,
    pub learned: bool,
}

/// Look up the offset for a word that has just reached `new_priority`.
///
/// Priority 0 never comes out of a review; it is treated as the first step.
pub fn resolve_offset(new_priority: u32) -> ReviewOffset {
    let step = usize::try_from(new_priority.max(1)).unwrap_or(usize::MAX);

    if let Some(&minutes) = MINUTE_STEPS.get(step - 1) {
        return ReviewOffset::Minutes(minutes);
    }

    let day_index = step - MINUTE_STEPS.len() - 1;
    let days = DAY_STEPS
        .get(day_index)
        .or_else(|| DAY_STEPS.last())
        .copied()
        .unwrap_or(GRADUATION_DAYS);
    ReviewOffset::Days(days)
}

/// Compute the state after a successful review of a word at `priority`
pub fn calculate_next_review(priority: u32, now: DateTime<Utc>) -> ReviewResult {
    let new_priority = priority.saturating_add(1);
    let offset = resolve_offset(new_priority);

    ReviewResult {
        priority: new_priority,
        offset,
        next_review: now + offset.duration(),
        learned: offset.graduates(),
    }
}

/// Format an offset as a short human-readable string
pub fn format_offset(offset: ReviewOffset) -> String {
    match offset {
        ReviewOffset::Minutes(minutes) if minutes < 60 => format!("{}m", minutes),
        ReviewOffset::Minutes(minutes) => format!("{}h", minutes / 60),
        ReviewOffset::Days(days) if days < 7 => format!("{}d", days),
        ReviewOffset::Days(days) if days < 30 => format!("{}w", days / 7),
        ReviewOffset::Days(days) => format!("{}mo", days / 30),
    }
}
