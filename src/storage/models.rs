//! Data models for words, categories and cached translations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the preloaded category that always exists and receives the words of
/// deleted user categories
pub const DEFAULT_CATEGORY_ID: i64 = 1;

/// Name given to the default category on first launch
pub const DEFAULT_CATEGORY_NAME: &str = "General";

/// Where a word or category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    /// Seed content shipped with the app; cannot be deleted
    Preloaded,
    /// Created by the user
    #[default]
    UserAdded,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preloaded => "preloaded",
            Self::UserAdded => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "preloaded" => Some(Self::Preloaded),
            "user" => Some(Self::UserAdded),
            _ => None,
        }
    }

    pub fn is_preloaded(&self) -> bool {
        *self == Self::Preloaded
    }
}

/// A vocabulary word together with its repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub category_id: i64,
    pub text: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
    /// Terminal state, set once the word is mastered
    #[serde(default)]
    pub learned: bool,
    /// Repetition counter; 0 means learning never started
    #[serde(default)]
    pub priority: u32,
    /// Earliest instant the word may be shown again
    pub next_review: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Word {
    /// Never started and not learned: belongs to the "to learn" queue
    pub fn is_to_learn(&self) -> bool {
        !self.learned && self.priority == 0
    }

    /// In the review rotation and due at `now`
    pub fn is_due_for_review(&self, now: DateTime<Utc>) -> bool {
        !self.learned && self.priority > 0 && self.next_review <= now
    }
}

/// Fields needed to insert a word; the schedule starts fresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub category_id: i64,
    pub text: String,
    pub translation: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl NewWord {
    pub fn new(category_id: i64, text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            category_id,
            text: text.into(),
            translation: translation.into(),
            transcription: None,
            example: None,
            provenance: Provenance::UserAdded,
        }
    }

    pub fn preloaded(mut self) -> Self {
        self.provenance = Provenance::Preloaded;
        self
    }
}

/// Request to edit an existing word
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEdit {
    pub text: Option<String>,
    pub translation: Option<String>,
    /// `Some(None)` clears the field, `None` leaves it unchanged
    #[serde(default, deserialize_with = "present_field")]
    pub transcription: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_field")]
    pub example: Option<Option<String>>,
    pub category_id: Option<i64>,
}

/// Keeps an explicit `null` apart from a missing field
fn present_field<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl WordEdit {
    /// Whether the edit touches anything besides the category
    pub fn changes_content(&self) -> bool {
        self.text.is_some()
            || self.translation.is_some()
            || self.transcription.is_some()
            || self.example.is_some()
    }
}

/// A named group of words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default)]
    pub word_count: usize,
}

/// A cached lookup from the translation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: i64,
    pub source_text: String,
    pub target_language: String,
    pub translated_text: String,
}

/// Counts over the whole word library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_words: usize,
    pub to_learn: usize,
    pub in_progress: usize,
    pub learned: usize,
    pub due_now: usize,
    pub categories: usize,
}
