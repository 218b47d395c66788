use chrono::{DateTime, Local, Utc};

use lexis_lib::progress::UserProgress;
use lexis_lib::storage::Word;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Short label for a word's place in the schedule
pub fn word_status(word: &Word, now: DateTime<Utc>) -> String {
    if word.learned {
        "learned".to_string()
    } else if word.priority == 0 {
        "new".to_string()
    } else if word.next_review <= now {
        "due".to_string()
    } else {
        format!("next {}", format_local(word.next_review))
    }
}

/// One line per word: id, text, translation and optional transcription
pub fn render_word(word: &Word, use_color: bool) -> String {
    let id = paint(&format!("#{:<5}", word.id), Color::DIM, use_color);
    let text = paint(&word.text, Color::BOLD, use_color);
    let mut line = format!("{} {}  {}", id, text, word.translation);

    if let Some(transcription) = word.transcription.as_deref() {
        line.push_str(&format!("  [{}]", transcription));
    }
    line
}

pub fn render_example(word: &Word, use_color: bool) -> Option<String> {
    word.example
        .as_deref()
        .map(|example| format!("       {}", paint(example, Color::DIM, use_color)))
}

/// e.g. `Goal 3/10  Streak 4  Reviewed 12`
pub fn render_progress(progress: &UserProgress, use_color: bool) -> String {
    let goal = format!("{}/{}", progress.learned_today, progress.daily_goal);
    let goal = if progress.daily_goal_achieve {
        paint(&goal, Color::GREEN, use_color)
    } else {
        paint(&goal, Color::YELLOW, use_color)
    };

    format!(
        "Goal {}  Streak {}  Reviewed {}",
        goal,
        paint(&progress.streak.to_string(), Color::CYAN, use_color),
        progress.reviewed_today
    )
}

pub fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lexis_lib::storage::{Provenance, DEFAULT_CATEGORY_ID};

    fn word(priority: u32, learned: bool, next_review: DateTime<Utc>) -> Word {
        Word {
            id: 7,
            category_id: DEFAULT_CATEGORY_ID,
            text: "bog".to_string(),
            translation: "book".to_string(),
            transcription: Some("bɔʊ̯".to_string()),
            example: None,
            provenance: Provenance::UserAdded,
            learned,
            priority,
            next_review,
            created_at: next_review,
        }
    }

    #[test]
    fn test_word_status() {
        let now = Utc::now();
        assert_eq!(word_status(&word(0, false, now), now), "new");
        assert_eq!(word_status(&word(3, false, now), now), "due");
        assert_eq!(word_status(&word(3, true, now), now), "learned");
        assert!(word_status(&word(3, false, now + Duration::days(2)), now).starts_with("next "));
    }

    #[test]
    fn test_plain_rendering() {
        let line = render_word(&word(0, false, Utc::now()), false);
        assert_eq!(line, "#7     bog  book  [bɔʊ̯]");

        let mut progress = UserProgress::with_goal(10);
        progress.learned_today = 3;
        progress.streak = 4;
        assert_eq!(render_progress(&progress, false), "Goal 3/10  Streak 4  Reviewed 0");
    }
}
