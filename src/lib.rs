//! Lexis: a spaced-repetition vocabulary trainer.
//!
//! Words move from "to learn" through a fixed review schedule to "learned".
//! Each day offers a bounded batch of new words plus every review that is due,
//! and a daily goal with a streak counter tracks consistency.

pub mod config;
pub mod progress;
pub mod review;
pub mod session;
pub mod storage;
pub mod vocabulary;
