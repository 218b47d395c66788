use anyhow::{bail, Context, Result};

use lexis_lib::progress::{GoalChange, UserProgress};
use lexis_lib::review::algorithm::format_offset;
use lexis_lib::review::resolve_offset;
use lexis_lib::session::DailySet;
use lexis_lib::storage::WordStore;

use crate::app::App;
use crate::render::terminal::{format_local, render_example, render_progress, render_word, Color};
use crate::OutputFormat;

fn print_daily_set(
    progress: &UserProgress,
    set: &DailySet,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "progress": progress,
                "dailySet": set,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", render_progress(progress, use_color));
            println!();

            let learn_title = if set.extra { "To learn (extra)" } else { "To learn" };
            println!("{} ({})", learn_title, set.to_learn.len());
            if set.to_learn.is_empty() && progress.daily_goal_achieve && !set.extra {
                println!("  Daily goal reached. Run `extra` for more words.");
            }
            for word in &set.to_learn {
                println!("  {}", render_word(word, use_color));
                if let Some(example) = render_example(word, use_color) {
                    println!("  {}", example);
                }
            }

            println!();
            println!("To review ({})", set.to_review.len());
            for word in &set.to_review {
                println!("  {}", render_word(word, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_today(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load_today()?;
    print_daily_set(app.session.progress(), app.session.daily_set(), format, use_color)
}

pub fn run_learn(app: &mut App, id: i64, know: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load_today()?;
    let update = if know {
        app.session.accept_learn(id)
    } else {
        app.session.reject_learn(id)
    }
    .with_context(|| format!("Failed to answer word {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        OutputFormat::Plain => {
            let word = app.store().get_word(id)?;
            if know {
                println!("Marked \"{}\" as learned", word.text);
            } else {
                println!("Started learning \"{}\"", word.text);
            }
            if update.goal_just_achieved {
                let message = format!("Daily goal reached! Streak: {} days", update.progress.streak);
                if use_color {
                    println!("{}{}{}", Color::GREEN, message, Color::RESET);
                } else {
                    println!("{}", message);
                }
            }
            println!("{}", render_progress(&update.progress, use_color));
        }
    }

    Ok(())
}

pub fn run_review(app: &mut App, id: i64, know: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load_today()?;

    if !know {
        // Only the in-memory queue moves; nothing is stored
        if !app.session.reject_review(id) {
            bail!("Word {} is not due for review", id);
        }
        return print_daily_set(app.session.progress(), app.session.daily_set(), format, use_color);
    }

    let word = app
        .session
        .accept_review(id)
        .with_context(|| format!("Failed to review word {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&word)?);
        }
        OutputFormat::Plain => {
            if word.learned {
                println!("\"{}\" is now learned", word.text);
            } else {
                println!(
                    "\"{}\" next review in {} ({})",
                    word.text,
                    format_offset(resolve_offset(word.priority)),
                    format_local(word.next_review)
                );
            }
            println!("{} reviews left", app.session.daily_set().to_review.len());
        }
    }

    Ok(())
}

pub fn run_extra(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load_today()?;
    app.session
        .load_extra_daily_word_set()
        .context("Failed to load extra words")?;
    print_daily_set(app.session.progress(), app.session.daily_set(), format, use_color)
}

pub fn run_goal(app: &mut App, goal: u32, format: &OutputFormat) -> Result<()> {
    app.load_today()?;
    let update = app
        .session
        .change_daily_goal(goal)
        .context("Failed to change daily goal")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        OutputFormat::Plain => {
            println!("Daily goal set to {}", update.progress.daily_goal);
            match update.change {
                GoalChange::Achieved => println!("Goal reached for today, streak is now {}", update.progress.streak),
                GoalChange::Unachieved => println!("Today's goal is no longer met, streak is now {}", update.progress.streak),
                GoalChange::Unchanged => {}
            }
        }
    }

    Ok(())
}

pub fn run_reset(app: &mut App, words: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    if words {
        app.session
            .reset_words_progress()
            .context("Failed to reset word progress")?;
    } else {
        app.session.reset_progress().context("Failed to reset progress")?;
    }
    print_daily_set(app.session.progress(), app.session.daily_set(), format, use_color)
}
