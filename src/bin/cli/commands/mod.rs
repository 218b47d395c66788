pub mod categories;
pub mod library;
pub mod stats;
pub mod study;
pub mod words;
