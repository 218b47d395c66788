use anyhow::{Context, Result};
use chrono::Utc;

use lexis_lib::storage::{NewWord, WordEdit, DEFAULT_CATEGORY_ID};

use crate::app::App;
use crate::render::terminal::{render_example, render_word, word_status};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub fn run_add(
    app: &App,
    text: String,
    translation: String,
    category: Option<i64>,
    transcription: Option<String>,
    example: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut word = NewWord::new(category.unwrap_or(DEFAULT_CATEGORY_ID), text, translation);
    word.transcription = transcription;
    word.example = example;

    let created = app
        .vocabulary()
        .add_word(&word, Utc::now())
        .context("Failed to add word")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        OutputFormat::Plain => {
            println!("Added {}", render_word(&created, use_color));
        }
    }

    Ok(())
}

pub fn run_edit(app: &App, id: i64, edit: WordEdit, format: &OutputFormat, use_color: bool) -> Result<()> {
    let word = app
        .vocabulary()
        .edit_word(id, edit)
        .with_context(|| format!("Failed to edit word {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&word)?);
        }
        OutputFormat::Plain => {
            println!("Updated {}", render_word(&word, use_color));
        }
    }

    Ok(())
}

pub fn run_rm(app: &App, id: i64, format: &OutputFormat) -> Result<()> {
    app.vocabulary()
        .delete_word(id)
        .with_context(|| format!("Failed to delete word {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": id }));
        }
        OutputFormat::Plain => {
            println!("Deleted word {}", id);
        }
    }

    Ok(())
}

pub fn run_ls(app: &App, category: Option<i64>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let words = app
        .vocabulary()
        .list_words(category)
        .context("Failed to list words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("No words.");
                return Ok(());
            }

            let now = Utc::now();
            for word in &words {
                let preloaded = if word.provenance.is_preloaded() { " *" } else { "" };
                println!(
                    "{}  ({}){}",
                    render_word(word, use_color),
                    word_status(word, now),
                    preloaded
                );
                if let Some(example) = render_example(word, use_color) {
                    println!("{}", example);
                }
            }
            println!();
            println!("{} words (* preloaded)", words.len());
        }
    }

    Ok(())
}
