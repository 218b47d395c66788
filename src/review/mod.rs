//! Spaced repetition for vocabulary words
//!
//! This module provides:
//! - The table-driven repetition schedule
//! - Word state transitions (start, review, mark learned)
//! - Daily queue selection

pub mod algorithm;
pub mod scheduler;
pub mod selector;

pub use algorithm::{calculate_next_review, resolve_offset, ReviewOffset, ReviewResult};
pub use scheduler::ReviewScheduler;
pub use selector::DailySetSelector;
