mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexis-cli", about = "Spaced-repetition vocabulary trainer", version)]
struct Cli {
    /// Database file (default: from config, else the data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (default: config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's words to learn and to review
    Today,

    /// Answer a word from the learn queue
    #[command(group(ArgGroup::new("answer").required(true).args(["know", "dont_know"])))]
    Learn {
        /// Word id
        id: i64,
        /// I already know this word
        #[arg(long)]
        know: bool,
        /// Start learning this word
        #[arg(long)]
        dont_know: bool,
    },

    /// Answer a word from the review queue
    #[command(group(ArgGroup::new("answer").required(true).args(["know", "later"])))]
    Review {
        /// Word id
        id: i64,
        /// I remember it: schedule the next review
        #[arg(long)]
        know: bool,
        /// Show it again later in this session
        #[arg(long)]
        later: bool,
    },

    /// Load another goal's worth of new words
    Extra,

    /// Set the daily goal
    Goal {
        /// New words per day
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        goal: u32,
    },

    /// Show progress and library statistics
    Stats,

    /// Reset goal and streak counters
    Reset {
        /// Reset every word to "not started" instead
        #[arg(long)]
        words: bool,
    },

    /// Manage words
    #[command(subcommand)]
    Word(WordCommand),

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Import a preloaded word pack (JSON)
    Seed {
        /// Path to the pack file
        pack: PathBuf,
    },

    /// Export or import a full backup
    #[command(subcommand)]
    Backup(BackupCommand),
}

#[derive(Subcommand)]
enum WordCommand {
    /// Add a word
    Add {
        text: String,
        translation: String,
        /// Category id (default: the General category)
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        transcription: Option<String>,
        #[arg(long)]
        example: Option<String>,
    },

    /// Edit a word; preloaded words may only change category
    Edit {
        id: i64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        translation: Option<String>,
        #[arg(long)]
        transcription: Option<String>,
        /// Remove the transcription
        #[arg(long, conflicts_with = "transcription")]
        clear_transcription: bool,
        #[arg(long)]
        example: Option<String>,
        /// Remove the example sentence
        #[arg(long, conflicts_with = "example")]
        clear_example: bool,
        #[arg(long)]
        category: Option<i64>,
    },

    /// Delete a user-added word
    Rm { id: i64 },

    /// List words
    Ls {
        /// Only words of this category
        #[arg(long)]
        category: Option<i64>,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Add a category
    Add {
        name: String,
        #[arg(long)]
        icon: Option<String>,
    },

    /// Rename a user category or change its icon
    Rename {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a user category, moving its words to General
    Rm { id: i64 },

    /// List categories with word counts
    Ls,
}

#[derive(Subcommand)]
enum BackupCommand {
    /// Write all words, categories and progress to a JSON file
    Export { file: PathBuf },

    /// Replace all data with the contents of a backup file
    Import { file: PathBuf },
}

/// `--clear-*` wins over a missing value; a given value replaces the field
fn optional_edit(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.db.as_deref(), cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Today) {
        Command::Today => commands::study::run_today(&mut app, &cli.format, use_color)?,
        Command::Learn { id, know, .. } => {
            commands::study::run_learn(&mut app, id, know, &cli.format, use_color)?;
        }
        Command::Review { id, know, .. } => {
            commands::study::run_review(&mut app, id, know, &cli.format, use_color)?;
        }
        Command::Extra => commands::study::run_extra(&mut app, &cli.format, use_color)?,
        Command::Goal { goal } => commands::study::run_goal(&mut app, goal, &cli.format)?,
        Command::Stats => commands::stats::run(&mut app, &cli.format, use_color)?,
        Command::Reset { words } => commands::study::run_reset(&mut app, words, &cli.format, use_color)?,
        Command::Word(subcmd) => match subcmd {
            WordCommand::Add {
                text,
                translation,
                category,
                transcription,
                example,
            } => {
                commands::words::run_add(
                    &app,
                    text,
                    translation,
                    category,
                    transcription,
                    example,
                    &cli.format,
                    use_color,
                )?;
            }
            WordCommand::Edit {
                id,
                text,
                translation,
                transcription,
                clear_transcription,
                example,
                clear_example,
                category,
            } => {
                let edit = lexis_lib::storage::WordEdit {
                    text,
                    translation,
                    transcription: optional_edit(transcription, clear_transcription),
                    example: optional_edit(example, clear_example),
                    category_id: category,
                };
                commands::words::run_edit(&app, id, edit, &cli.format, use_color)?;
            }
            WordCommand::Rm { id } => commands::words::run_rm(&app, id, &cli.format)?,
            WordCommand::Ls { category } => commands::words::run_ls(&app, category, &cli.format, use_color)?,
        },
        Command::Category(subcmd) => match subcmd {
            CategoryCommand::Add { name, icon } => {
                commands::categories::run_add(&app, &name, icon.as_deref(), &cli.format)?;
            }
            CategoryCommand::Rename { id, name, icon } => {
                commands::categories::run_rename(&app, id, name, icon, &cli.format)?;
            }
            CategoryCommand::Rm { id } => commands::categories::run_rm(&app, id, &cli.format)?,
            CategoryCommand::Ls => commands::categories::run_ls(&app, &cli.format)?,
        },
        Command::Seed { pack } => commands::library::run_seed(&app, &pack, &cli.format)?,
        Command::Backup(subcmd) => match subcmd {
            BackupCommand::Export { file } => commands::library::run_export(&app, &file, &cli.format)?,
            BackupCommand::Import { file } => commands::library::run_import(&mut app, &file, &cli.format)?,
        },
    }

    Ok(())
}
