//! Prompt commands: list, show, history, add, edit, delete, duplicate,
//! favorite and export

use super::{
    require_text, resolve_folder_id, resolve_prompt_id, resolve_tag_id, short_id, truncate,
    Session,
};
use crate::error::{PromptGrabError, Result};
use crate::export::write_export;
use crate::store::{NewPrompt, Prompt, PromptStore, PromptUpdate};
use colored::Colorize;
use prettytable::{format, Table};
use std::path::PathBuf;

/// Narrowing applied by `list`
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub folder: Option<String>,
    pub tag: Option<String>,
    pub favorites: bool,
}

/// Arguments of `add`
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub folder: Option<String>,
    pub favorite: bool,
}

/// Arguments of `edit`
#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub clear_tags: bool,
    pub folder: Option<String>,
    pub no_folder: bool,
}

fn folder_name(store: &PromptStore, prompt: &Prompt) -> String {
    prompt
        .folder_id
        .as_deref()
        .and_then(|id| store.folder_by_id(id))
        .map(|f| f.name.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Create any tag names the library does not know yet
fn ensure_tags(store: &mut PromptStore, names: &[String]) {
    for name in names {
        if !store.tags().iter().any(|t| &t.name == name) {
            store.add_tag(name.clone(), None);
            println!("{}", format!("Created tag '{}'", name).green());
        }
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Select the filter in the store and print the visible prompts
pub async fn list(session: &Session, filter: ListFilter, json: bool) -> Result<()> {
    let mut store = session.store().lock().await;

    let folder_id = filter
        .folder
        .as_deref()
        .map(|key| resolve_folder_id(&store, key))
        .transpose()?;
    let tag_id = filter
        .tag
        .as_deref()
        .map(|key| resolve_tag_id(&store, key))
        .transpose()?;

    store.set_search_query(filter.search.unwrap_or_default());
    store.set_selected_folder(folder_id);
    store.set_selected_tag(tag_id);

    let visible = if filter.favorites {
        store.favorite_prompts()
    } else {
        store.filtered_prompts()
    };
    tracing::info!(count = visible.len(), "Listing prompts");

    if json {
        let json = serde_json::to_string_pretty(&visible).map_err(PromptGrabError::from)?;
        println!("{}", json);
        return Ok(());
    }

    if visible.is_empty() {
        println!("{}", "No prompts found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Folder".bold(),
        "Tags".bold(),
        "Ver".bold(),
        "Updated".bold()
    ]);

    for prompt in &visible {
        let title = if prompt.is_favorite {
            format!("★ {}", truncate(&prompt.title, 38))
        } else {
            truncate(&prompt.title, 40)
        };
        table.add_row(prettytable::row![
            short_id(&prompt.id).cyan(),
            title,
            folder_name(&store, prompt),
            prompt.tags.join(", "),
            prompt.version,
            prompt.updated_at.format("%Y-%m-%d %H:%M").to_string()
        ]);
    }

    println!();
    table.printstd();
    println!("{} prompt(s)", visible.len());
    Ok(())
}

/// Print one prompt with its metadata
pub async fn show(session: &Session, key: &str) -> Result<()> {
    let mut store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    store.set_selected_prompt(Some(id));

    let prompt = store
        .selected_prompt()
        .ok_or_else(|| PromptGrabError::NotFound {
            kind: "Prompt",
            id: key.to_string(),
        })?;

    let star = if prompt.is_favorite { " ★" } else { "" };
    println!("\n{}{}", prompt.title.bold(), star.yellow());
    println!("{} {}", "ID:".dimmed(), prompt.id);
    println!("{} {}", "Folder:".dimmed(), folder_name(&store, prompt));
    println!("{} {}", "Tags:".dimmed(), prompt.tags.join(", "));
    println!("{} {}", "Version:".dimmed(), prompt.version);
    println!(
        "{} {}",
        "Created:".dimmed(),
        prompt.created_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "{} {}",
        "Updated:".dimmed(),
        prompt.updated_at.format("%Y-%m-%d %H:%M")
    );
    println!("\n{}\n", prompt.content);
    Ok(())
}

/// Print the version history of a prompt, oldest first
pub async fn history(session: &Session, key: &str) -> Result<()> {
    let store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    let Some(prompt) = store.prompt_by_id(&id) else {
        return Err(PromptGrabError::NotFound {
            kind: "Prompt",
            id: key.to_string(),
        }
        .into());
    };

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Version".bold(),
        "Saved".bold(),
        "Content".bold()
    ]);
    for entry in &prompt.history {
        let first_line = entry.content.lines().next().unwrap_or("");
        table.add_row(prettytable::row![
            entry.version,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            truncate(first_line, 60)
        ]);
    }

    println!("\nHistory of {}:", prompt.title.bold());
    table.printstd();
    println!();
    Ok(())
}

/// Create a prompt from validated input
pub async fn add(session: &Session, args: AddArgs) -> Result<()> {
    let title = require_text("Title", &args.title)?;
    let content = require_text("Content", &args.content)?;
    let tags = clean_tags(args.tags);

    let mut store = session.store().lock().await;
    let folder_id = args
        .folder
        .as_deref()
        .map(|key| resolve_folder_id(&store, key))
        .transpose()?;
    ensure_tags(&mut store, &tags);

    let mut draft = NewPrompt::new(title, content)
        .with_tags(tags)
        .favorite(args.favorite);
    if let Some(folder_id) = folder_id {
        draft = draft.in_folder(folder_id);
    }

    let id = store.add_prompt(draft);
    tracing::info!(prompt_id = %id, "Added prompt");
    println!("{}", format!("Added prompt {}", short_id(&id)).green());
    Ok(())
}

/// Apply an edit through the autosave path and commit it straight away
pub async fn edit(session: &Session, key: &str, args: EditArgs) -> Result<()> {
    let (id, update) = {
        let mut store = session.store().lock().await;
        let id = resolve_prompt_id(&store, key)?;

        let mut update = PromptUpdate::new();
        if let Some(title) = &args.title {
            update = update.title(require_text("Title", title)?);
        }
        if let Some(content) = args.content {
            update = update.content(content);
        }
        if args.clear_tags {
            update = update.tags(Vec::<String>::new());
        } else if !args.tags.is_empty() {
            let tags = clean_tags(args.tags);
            ensure_tags(&mut store, &tags);
            update = update.tags(tags);
        }
        if args.no_folder {
            update = update.folder(None);
        } else if let Some(key) = &args.folder {
            update = update.folder(Some(resolve_folder_id(&store, key)?));
        }

        if update.is_empty() {
            return Err(PromptGrabError::InvalidInput("Nothing to change".to_string()).into());
        }
        (id, update)
    };

    let autosave = session.autosave();
    autosave.schedule(&id, update);
    if !autosave.flush().await {
        return Err(PromptGrabError::NotFound {
            kind: "Prompt",
            id: key.to_string(),
        }
        .into());
    }

    let store = session.store().lock().await;
    if let Some(prompt) = store.prompt_by_id(&id) {
        tracing::info!(prompt_id = %id, version = prompt.version, "Edited prompt");
        println!(
            "{}",
            format!("Updated {} (version {})", short_id(&id), prompt.version).green()
        );
    }
    Ok(())
}

pub async fn delete(session: &Session, key: &str) -> Result<()> {
    let mut store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    store.delete_prompt(&id);
    tracing::info!(prompt_id = %id, "Deleted prompt");
    println!("{}", format!("Deleted prompt {}", short_id(&id)).green());
    Ok(())
}

pub async fn duplicate(session: &Session, key: &str) -> Result<()> {
    let mut store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    let copy = store
        .duplicate_prompt(&id)
        .ok_or_else(|| PromptGrabError::NotFound {
            kind: "Prompt",
            id: key.to_string(),
        })?;
    tracing::info!(source_id = %id, prompt_id = %copy, "Duplicated prompt");
    println!("{}", format!("Created copy {}", short_id(&copy)).green());
    Ok(())
}

pub async fn favorite(session: &Session, key: &str) -> Result<()> {
    let mut store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    match store.toggle_favorite(&id) {
        Some(true) => println!("{}", "Marked as favorite".green()),
        Some(false) => println!("{}", "Removed from favorites".green()),
        None => {
            return Err(PromptGrabError::NotFound {
                kind: "Prompt",
                id: key.to_string(),
            }
            .into())
        }
    }
    Ok(())
}

/// Write the prompt's export file into `output` or the working directory
pub async fn export(session: &Session, key: &str, output: Option<PathBuf>) -> Result<()> {
    let store = session.store().lock().await;
    let id = resolve_prompt_id(&store, key)?;
    let prompt = store
        .prompt_by_id(&id)
        .ok_or_else(|| PromptGrabError::NotFound {
            kind: "Prompt",
            id: key.to_string(),
        })?;

    let dir = output.unwrap_or_else(|| PathBuf::from("."));
    let path = write_export(prompt, &dir)?;
    println!("{}", format!("Exported to {}", path.display()).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_session;
    use super::*;
    use crate::test_utils::{assert_error_contains, temp_dir};

    async fn first_prompt_id(session: &Session) -> String {
        session.store().lock().await.prompts()[0].id.clone()
    }

    #[tokio::test]
    async fn test_add_rejects_blank_title() {
        let (session, _) = memory_session();
        let args = AddArgs {
            title: "   ".to_string(),
            content: "body".to_string(),
            ..AddArgs::default()
        };
        assert_error_contains(add(&session, args).await, "Title cannot be empty");
        assert_eq!(session.store().lock().await.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_add_trims_and_files_prompt() {
        let (session, _) = memory_session();
        let args = AddArgs {
            title: "  Release notes ".to_string(),
            content: "Summarize the changes".to_string(),
            tags: vec!["writing".to_string(), "release".to_string()],
            folder: Some("work".to_string()),
            favorite: true,
        };
        add(&session, args).await.unwrap();

        let store = session.store().lock().await;
        let prompt = store.selected_prompt().unwrap();
        assert_eq!(prompt.title, "Release notes");
        assert_eq!(prompt.folder_id.as_deref(), Some("1"));
        assert!(prompt.is_favorite);
        assert!(store.tags().iter().any(|t| t.name == "release"));
        assert_eq!(store.tags().len(), 5);
    }

    #[tokio::test]
    async fn test_add_with_unknown_folder_fails() {
        let (session, _) = memory_session();
        let args = AddArgs {
            title: "T".to_string(),
            content: "C".to_string(),
            folder: Some("Archive".to_string()),
            ..AddArgs::default()
        };
        assert_error_contains(add(&session, args).await, "Folder not found: Archive");
    }

    #[tokio::test]
    async fn test_edit_content_records_version() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        let args = EditArgs {
            content: Some("Rewritten".to_string()),
            ..EditArgs::default()
        };
        edit(&session, &id, args).await.unwrap();

        let store = session.store().lock().await;
        let prompt = store.prompt_by_id(&id).unwrap();
        assert_eq!(prompt.content, "Rewritten");
        assert_eq!(prompt.version, 2);
        assert_eq!(prompt.history.len(), 2);
        assert!(!session.autosave().has_pending());
    }

    #[tokio::test]
    async fn test_edit_keeps_content_as_typed() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        let args = EditArgs {
            content: Some("  indented body\n".to_string()),
            ..EditArgs::default()
        };
        edit(&session, &id, args).await.unwrap();

        let store = session.store().lock().await;
        let prompt = store.prompt_by_id(&id).unwrap();
        assert_eq!(prompt.content, "  indented body\n");
        assert_eq!(prompt.history[1].content, "  indented body\n");
    }

    #[tokio::test]
    async fn test_edit_without_changes_is_rejected() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        assert_error_contains(
            edit(&session, &id, EditArgs::default()).await,
            "Nothing to change",
        );
    }

    #[tokio::test]
    async fn test_edit_moves_out_of_folder_and_clears_tags() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        let args = EditArgs {
            clear_tags: true,
            no_folder: true,
            ..EditArgs::default()
        };
        edit(&session, &id, args).await.unwrap();

        let store = session.store().lock().await;
        let prompt = store.prompt_by_id(&id).unwrap();
        assert!(prompt.tags.is_empty());
        assert_eq!(prompt.folder_id, None);
        assert_eq!(prompt.history.len(), 1);
    }

    #[tokio::test]
    async fn test_list_with_unknown_tag_fails() {
        let (session, _) = memory_session();
        let filter = ListFilter {
            tag: Some("nope".to_string()),
            ..ListFilter::default()
        };
        assert_error_contains(list(&session, filter, false).await, "Tag not found");
    }

    #[tokio::test]
    async fn test_list_sets_selection() {
        let (session, _) = memory_session();
        let filter = ListFilter {
            search: Some("review".to_string()),
            folder: Some("Work".to_string()),
            ..ListFilter::default()
        };
        list(&session, filter, true).await.unwrap();

        let store = session.store().lock().await;
        assert_eq!(store.selection().search_query, "review");
        assert_eq!(store.selection().folder_id.as_deref(), Some("1"));
        assert_eq!(store.filtered_prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_and_favorite() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        duplicate(&session, &id).await.unwrap();
        favorite(&session, &id).await.unwrap();

        let store = session.store().lock().await;
        assert_eq!(store.prompts().len(), 4);
        assert!(store.prompts()[3].title.ends_with(" (Copy)"));
        assert_ne!(
            store.prompt_by_id(&id).unwrap().is_favorite,
            store.prompts()[3].is_favorite
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_prompt_fails() {
        let (session, _) = memory_session();
        assert_error_contains(delete(&session, "nothing-here").await, "Prompt not found");
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let (session, _) = memory_session();
        let id = first_prompt_id(&session).await;
        let dir = temp_dir();
        export(&session, &id, Some(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert!(dir.path().join("code_review_assistant.json").exists());
    }
}
