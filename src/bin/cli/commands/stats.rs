use anyhow::{Context, Result};
use chrono::Utc;

use crate::app::App;
use crate::render::terminal::render_progress;
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load_today()?;
    let stats = app
        .store()
        .stats(Utc::now())
        .context("Failed to compute statistics")?;
    let progress = app.session.progress();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "progress": progress,
                "library": stats,
                "database": app.db_path.to_string_lossy(),
                "defaultDailyGoal": app.config.default_daily_goal,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", render_progress(progress, use_color));
            println!("Total learned: {}", progress.total_learned_words);
            if let Some(date) = progress.last_learning_date {
                println!("Last learning day: {}", date);
            }
            println!();
            println!("Words:       {}", stats.total_words);
            println!("  to learn   {}", stats.to_learn);
            println!("  in review  {} ({} due now)", stats.in_progress, stats.due_now);
            println!("  learned    {}", stats.learned);
            println!("Categories:  {}", stats.categories);
            println!();
            println!("Database: {}", app.db_path.display());
            println!("Goal after reset: {}", app.config.default_daily_goal);
        }
    }

    Ok(())
}
