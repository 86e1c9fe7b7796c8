//! Folder and tag commands
//!
//! Both share one subcommand shape; only the store operations differ.

use super::{require_text, resolve_folder_id, resolve_tag_id, short_id, Session};
use crate::cli::LabelCommand;
use crate::error::Result;
use crate::store::{LabelUpdate, PromptStore};
use colored::Colorize;
use prettytable::{format, Table};

fn print_labels(heading: &str, rows: Vec<(String, String, Option<String>, usize)>) {
    if rows.is_empty() {
        println!("{}", format!("No {} yet.", heading.to_lowercase()).yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Color".bold(),
        "Prompts".bold()
    ]);
    for (id, name, color, count) in rows {
        table.add_row(prettytable::row![
            short_id(&id).cyan(),
            name,
            color.unwrap_or_else(|| "-".to_string()),
            count
        ]);
    }

    println!("\n{}:", heading);
    table.printstd();
    println!();
}

fn folder_rows(store: &PromptStore) -> Vec<(String, String, Option<String>, usize)> {
    let counts = store.library_counts();
    store
        .folders()
        .iter()
        .zip(counts.per_folder)
        .map(|(folder, (_, count))| {
            (
                folder.id.clone(),
                folder.name.clone(),
                folder.color.clone(),
                count,
            )
        })
        .collect()
}

fn tag_rows(store: &PromptStore) -> Vec<(String, String, Option<String>, usize)> {
    let counts = store.library_counts();
    store
        .tags()
        .iter()
        .zip(counts.per_tag)
        .map(|(tag, (_, count))| (tag.id.clone(), tag.name.clone(), tag.color.clone(), count))
        .collect()
}

/// Handle `folder` subcommands
pub async fn run_folder(session: &Session, command: LabelCommand) -> Result<()> {
    let mut store = session.store().lock().await;

    match command {
        LabelCommand::List => print_labels("Folders", folder_rows(&store)),
        LabelCommand::Add { name, color } => {
            let id = store.add_folder(require_text("Folder name", &name)?, color);
            tracing::info!(folder_id = %id, "Added folder");
            println!("{}", format!("Added folder {}", short_id(&id)).green());
        }
        LabelCommand::Rename { target, name } => {
            let name = require_text("Folder name", &name)?;
            let id = resolve_folder_id(&store, &target)?;
            store.update_folder(&id, LabelUpdate::rename(name.clone()));
            println!("{}", format!("Renamed folder to '{}'", name).green());
        }
        LabelCommand::Delete { target } => {
            let id = resolve_folder_id(&store, &target)?;
            let filed = store
                .prompts()
                .iter()
                .filter(|p| p.folder_id.as_deref() == Some(id.as_str()))
                .count();
            store.delete_folder(&id);
            tracing::info!(folder_id = %id, detached = filed, "Deleted folder");
            println!(
                "{}",
                format!("Deleted folder; {} prompt(s) moved out", filed).green()
            );
        }
    }

    Ok(())
}

/// Handle `tag` subcommands
///
/// Prompts reference tags by name, so renaming a tag leaves prompts carrying
/// the old name; deleting a tag strips its name from every prompt.
pub async fn run_tag(session: &Session, command: LabelCommand) -> Result<()> {
    let mut store = session.store().lock().await;

    match command {
        LabelCommand::List => print_labels("Tags", tag_rows(&store)),
        LabelCommand::Add { name, color } => {
            let id = store.add_tag(require_text("Tag name", &name)?, color);
            tracing::info!(tag_id = %id, "Added tag");
            println!("{}", format!("Added tag {}", short_id(&id)).green());
        }
        LabelCommand::Rename { target, name } => {
            let name = require_text("Tag name", &name)?;
            let id = resolve_tag_id(&store, &target)?;
            store.update_tag(&id, LabelUpdate::rename(name.clone()));
            println!("{}", format!("Renamed tag to '{}'", name).green());
        }
        LabelCommand::Delete { target } => {
            let id = resolve_tag_id(&store, &target)?;
            store.delete_tag(&id);
            tracing::info!(tag_id = %id, "Deleted tag");
            println!("{}", "Deleted tag".green());
        }
    }

    Ok(())
}
