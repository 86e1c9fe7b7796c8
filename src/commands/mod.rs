//! Command handlers for the `promptgrab` binary
//!
//! Every invocation opens a [`Session`]: the store is built, hydrated once
//! from the configured backend and wired to a background writer. One command
//! is applied, then the session is closed, which commits any pending edit
//! and waits for the writer to drain.

use crate::autosave::{Autosave, SharedStore};
use crate::cli::Commands;
use crate::config::Config;
use crate::error::{PromptGrabError, Result};
use crate::persistence::{PersistWriter, Persistence};
use crate::store::PromptStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub mod library;
pub mod prompts;
pub mod settings;

/// Shortest id prefix accepted in place of a full id
pub const MIN_ID_PREFIX: usize = 8;

/// A hydrated store plus the tasks that persist it
#[derive(Debug)]
pub struct Session {
    store: SharedStore,
    autosave: Autosave,
    writer: PersistWriter,
    writer_task: JoinHandle<()>,
}

impl Session {
    /// Open a session on the backend named by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be opened or its stored state
    /// cannot be read.
    pub fn open(config: &Config) -> Result<Self> {
        let backend = config.storage.open_backend()?;
        Self::with_backend(config, backend)
    }

    /// Open a session on an explicit backend
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_backend(config: &Config, backend: Arc<dyn Persistence>) -> Result<Self> {
        let ids = config.ids.format.generator();
        let mut store = if config.library.seed_sample_data {
            PromptStore::with_sample_data(ids)
        } else {
            PromptStore::new(ids)
        };

        store.hydrate(backend.as_ref())?;
        store.subscribe(|event, state| {
            tracing::trace!(?event, prompts = state.prompts.len(), "Store event");
        });

        let (writer, writer_task) = PersistWriter::spawn(backend);
        store.attach_writer(writer.clone());

        let store = Arc::new(Mutex::new(store));
        let autosave = Autosave::new(Arc::clone(&store), config.autosave.debounce());

        Ok(Self {
            store,
            autosave,
            writer,
            writer_task,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    /// Commit pending edits and wait until every snapshot has been written
    ///
    /// # Errors
    ///
    /// Returns a storage error if any snapshot failed to write during the
    /// session. The changes were applied in memory but are not on disk.
    pub async fn close(self) -> Result<()> {
        self.autosave.flush().await;
        self.writer.shutdown().await;
        if let Err(e) = self.writer_task.await {
            tracing::warn!(error = %e, "Persistence writer task failed");
        }

        match self.writer.failed() {
            0 => Ok(()),
            failed => Err(PromptGrabError::Storage(format!(
                "{} snapshot(s) could not be saved",
                failed
            ))
            .into()),
        }
    }
}

/// Apply one CLI command to a freshly opened session
pub async fn run(config: &Config, command: Commands) -> Result<()> {
    let session = Session::open(config)?;
    let outcome = dispatch(&session, command).await;
    let closed = session.close().await;
    outcome.and(closed)
}

/// Route a command to its handler
pub async fn dispatch(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            search,
            folder,
            tag,
            favorites,
            json,
        } => {
            let filter = prompts::ListFilter {
                search,
                folder,
                tag,
                favorites,
            };
            prompts::list(session, filter, json).await
        }
        Commands::Show { id } => prompts::show(session, &id).await,
        Commands::History { id } => prompts::history(session, &id).await,
        Commands::Add {
            title,
            content,
            tags,
            folder,
            favorite,
        } => {
            let draft = prompts::AddArgs {
                title,
                content,
                tags,
                folder,
                favorite,
            };
            prompts::add(session, draft).await
        }
        Commands::Edit {
            id,
            title,
            content,
            tags,
            clear_tags,
            folder,
            no_folder,
        } => {
            let edit = prompts::EditArgs {
                title,
                content,
                tags,
                clear_tags,
                folder,
                no_folder,
            };
            prompts::edit(session, &id, edit).await
        }
        Commands::Delete { id } => prompts::delete(session, &id).await,
        Commands::Duplicate { id } => prompts::duplicate(session, &id).await,
        Commands::Favorite { id } => prompts::favorite(session, &id).await,
        Commands::Export { id, output } => prompts::export(session, &id, output).await,
        Commands::Folder { command } => library::run_folder(session, command).await,
        Commands::Tag { command } => library::run_tag(session, command).await,
        Commands::Theme { command } => settings::theme(session, command).await,
        Commands::View { mode } => settings::view(session, mode).await,
    }
}

/// Resolve a user-supplied key against `(id, name)` entries
///
/// An exact id wins, then a case-insensitive name, then a unique id prefix
/// of at least [`MIN_ID_PREFIX`] characters.
fn resolve_key<'a, I>(kind: &'static str, key: &str, entries: I) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let entries: Vec<(&str, Option<&str>)> = entries.into_iter().collect();

    if let Some((id, _)) = entries.iter().find(|(id, _)| *id == key) {
        return Ok(id.to_string());
    }

    let by_name: Vec<&str> = entries
        .iter()
        .filter(|(_, name)| name.is_some_and(|n| n.eq_ignore_ascii_case(key)))
        .map(|(id, _)| *id)
        .collect();
    match by_name.as_slice() {
        [id] => return Ok(id.to_string()),
        [] => {}
        many => {
            return Err(PromptGrabError::AmbiguousId {
                kind,
                id: key.to_string(),
                matches: many.len(),
            }
            .into())
        }
    }

    if key.len() >= MIN_ID_PREFIX {
        let by_prefix: Vec<&str> = entries
            .iter()
            .filter(|(id, _)| id.starts_with(key))
            .map(|(id, _)| *id)
            .collect();
        match by_prefix.as_slice() {
            [id] => return Ok(id.to_string()),
            [] => {}
            many => {
                return Err(PromptGrabError::AmbiguousId {
                    kind,
                    id: key.to_string(),
                    matches: many.len(),
                }
                .into())
            }
        }
    }

    Err(PromptGrabError::NotFound {
        kind,
        id: key.to_string(),
    }
    .into())
}

/// Full id of the prompt named by `key` (id or unique prefix)
pub fn resolve_prompt_id(store: &PromptStore, key: &str) -> Result<String> {
    resolve_key(
        "Prompt",
        key,
        store.prompts().iter().map(|p| (p.id.as_str(), None)),
    )
}

/// Full id of the folder named by `key` (id, name or unique prefix)
pub fn resolve_folder_id(store: &PromptStore, key: &str) -> Result<String> {
    resolve_key(
        "Folder",
        key,
        store
            .folders()
            .iter()
            .map(|f| (f.id.as_str(), Some(f.name.as_str()))),
    )
}

/// Full id of the tag named by `key` (id, name or unique prefix)
pub fn resolve_tag_id(store: &PromptStore, key: &str) -> Result<String> {
    resolve_key(
        "Tag",
        key,
        store
            .tags()
            .iter()
            .map(|t| (t.id.as_str(), Some(t.name.as_str()))),
    )
}

/// Trimmed `value`, or an input error naming `field` when nothing is left
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PromptGrabError::InvalidInput(format!("{} cannot be empty", field)).into());
    }
    Ok(trimmed.to_string())
}

/// First eight characters of an id, for tables
pub(crate) fn short_id(id: &str) -> &str {
    match id.char_indices().nth(MIN_ID_PREFIX) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// `text` cut to `max` characters with a trailing ellipsis
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::Config;
    use crate::persistence::MemoryPersistence;

    /// Session over an in-memory backend with the sample library
    pub fn memory_session() -> (Session, Arc<MemoryPersistence>) {
        let backend = Arc::new(MemoryPersistence::new());
        let session = Session::with_backend(&Config::default(), backend.clone())
            .expect("session should open");
        (session, backend)
    }
}
