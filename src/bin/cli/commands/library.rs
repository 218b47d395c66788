use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use lexis_lib::storage::backup::{read_backup_file, write_backup_file};
use lexis_lib::storage::seed::{seed_preloaded, PreloadPack};

use crate::app::App;
use crate::OutputFormat;

pub fn run_seed(app: &App, pack_path: &Path, format: &OutputFormat) -> Result<()> {
    let pack = PreloadPack::load(pack_path)
        .with_context(|| format!("Failed to read word pack {}", pack_path.display()))?;
    let report = seed_preloaded(app.store(), &pack, Utc::now()).context("Failed to seed words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            if report.skipped {
                println!("Preloaded words already present, nothing imported");
            } else {
                println!(
                    "Imported {} words in {} categories",
                    report.words, report.categories
                );
            }
        }
    }

    Ok(())
}

pub fn run_export(app: &App, file: &Path, format: &OutputFormat) -> Result<()> {
    let snapshot = write_backup_file(app.store(), file)
        .with_context(|| format!("Failed to write backup {}", file.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": file.to_string_lossy(),
                "version": snapshot.version,
                "words": snapshot.words.len(),
                "categories": snapshot.categories.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Backed up {} words and {} categories to {}",
                snapshot.words.len(),
                snapshot.categories.len(),
                file.display()
            );
        }
    }

    Ok(())
}

pub fn run_import(app: &mut App, file: &Path, format: &OutputFormat) -> Result<()> {
    let snapshot = read_backup_file(app.store(), file)
        .with_context(|| format!("Failed to restore backup {}", file.display()))?;
    // Restored counters may belong to an earlier day
    app.load_today()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "version": snapshot.version,
                "words": snapshot.words.len(),
                "categories": snapshot.categories.len(),
                "progress": app.session.progress(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Restored {} words and {} categories from {}",
                snapshot.words.len(),
                snapshot.categories.len(),
                file.display()
            );
        }
    }

    Ok(())
}
