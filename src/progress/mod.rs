//! Daily goal and streak tracking

pub mod models;
pub mod tracker;

pub use models::*;
pub use tracker::{GoalUpdate, LearningUpdate, ProgressTracker};
