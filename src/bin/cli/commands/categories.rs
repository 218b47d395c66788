use anyhow::{Context, Result};

use lexis_lib::storage::Category;

use crate::app::App;
use crate::OutputFormat;

fn category_label(category: &Category) -> String {
    match category.icon.as_deref() {
        Some(icon) => format!("{} {}", icon, category.name),
        None => category.name.clone(),
    }
}

pub fn run_add(app: &App, name: &str, icon: Option<&str>, format: &OutputFormat) -> Result<()> {
    let category = app
        .vocabulary()
        .add_category(name, icon)
        .context("Failed to add category")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&category)?),
        OutputFormat::Plain => println!("Added category #{} {}", category.id, category_label(&category)),
    }

    Ok(())
}

pub fn run_rename(
    app: &App,
    id: i64,
    name: Option<String>,
    icon: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let category = app
        .vocabulary()
        .rename_category(id, name, icon)
        .with_context(|| format!("Failed to update category {}", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&category)?),
        OutputFormat::Plain => println!("Updated category #{} {}", category.id, category_label(&category)),
    }

    Ok(())
}

pub fn run_rm(app: &App, id: i64, format: &OutputFormat) -> Result<()> {
    let moved = app
        .vocabulary()
        .delete_category(id)
        .with_context(|| format!("Failed to delete category {}", id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": id, "movedWords": moved }));
        }
        OutputFormat::Plain => {
            println!("Deleted category {}, {} words moved to General", id, moved);
        }
    }

    Ok(())
}

pub fn run_ls(app: &App, format: &OutputFormat) -> Result<()> {
    let categories = app
        .vocabulary()
        .list_categories()
        .context("Failed to list categories")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        OutputFormat::Plain => {
            let name_width = categories
                .iter()
                .map(|c| category_label(c).chars().count())
                .max()
                .unwrap_or(4)
                .clamp(4, 40);

            println!("{:<5} {:<nw$} {:>6}", "Id", "Name", "Words", nw = name_width);
            for category in &categories {
                let preloaded = if category.provenance.is_preloaded() { " *" } else { "" };
                println!(
                    "{:<5} {:<nw$} {:>6}{}",
                    category.id,
                    category_label(category),
                    category.word_count,
                    preloaded,
                    nw = name_width
                );
            }
        }
    }

    Ok(())
}
