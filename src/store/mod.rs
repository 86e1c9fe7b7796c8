//! The prompt store
//!
//! [`PromptStore`] owns every prompt, folder and tag together with the
//! selection state the UI filters by. Mutations are synchronous and atomic:
//! each one runs to completion, then observers are notified with the fully
//! updated state, then a snapshot of the persisted subset is handed to the
//! background writer (if one is attached) without waiting for it.
//!
//! Mutations aimed at an id that does not exist are no-ops. They return
//! `false` / `None` so callers can tell, but they never fail. Deletes still
//! clear selections and folder references left dangling on that id.
//!
//! Collections are copy-on-write (`Arc::make_mut`): a [`StoreState`]
//! snapshot taken before a mutation keeps seeing the old collections.

use crate::error::Result;
use crate::persistence::{PersistWriter, Persistence};
use chrono::Utc;
use std::sync::Arc;

pub mod filter;
pub mod ids;
pub mod observer;
pub mod sample;
pub mod types;

pub use filter::PromptFilter;
pub use ids::{IdFormat, IdGenerator, UlidIds, UuidIds};
pub use observer::{ObserverRegistry, StoreEvent, SubscriptionId};
pub use types::{
    Folder, FolderUpdate, LabelUpdate, LibraryCounts, NewPrompt, PersistedState, Prompt,
    PromptUpdate, PromptVersion, Selection, StoreState, Tag, TagUpdate, ViewMode,
};

/// Suffix appended to the title of a duplicated prompt
pub const COPY_SUFFIX: &str = " (Copy)";

/// In-memory prompt library with versioning and filtered views
///
/// # Examples
///
/// ```
/// use promptgrab::store::{NewPrompt, PromptStore, PromptUpdate, UuidIds};
///
/// let mut store = PromptStore::new(Box::new(UuidIds));
/// let id = store.add_prompt(NewPrompt::new("Greeting", "hello"));
/// store.update_prompt(&id, PromptUpdate::new().content("hello there"));
///
/// let prompt = store.prompt_by_id(&id).unwrap();
/// assert_eq!(prompt.version, 2);
/// assert_eq!(prompt.history.len(), 2);
/// ```
pub struct PromptStore {
    state: StoreState,
    ids: Box<dyn IdGenerator>,
    observers: ObserverRegistry,
    writer: Option<PersistWriter>,
}

impl std::fmt::Debug for PromptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptStore")
            .field("prompts", &self.state.prompts.len())
            .field("folders", &self.state.folders.len())
            .field("tags", &self.state.tags.len())
            .field("selection", &self.state.selection)
            .field("observers", &self.observers)
            .field("persisting", &self.writer.is_some())
            .finish()
    }
}

impl PromptStore {
    /// Create an empty store
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self::with_state(StoreState::default(), ids)
    }

    /// Create a store seeded with the starter library
    pub fn with_sample_data(ids: Box<dyn IdGenerator>) -> Self {
        Self::with_state(sample::sample_state(), ids)
    }

    /// Create a store around an existing state
    pub fn with_state(state: StoreState, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            state,
            ids,
            observers: ObserverRegistry::new(),
            writer: None,
        }
    }

    /// Route a snapshot of the persisted subset to `writer` after every mutation
    pub fn attach_writer(&mut self, writer: PersistWriter) {
        self.writer = Some(writer);
    }

    /// Stop scheduling writes and hand back the writer
    pub fn detach_writer(&mut self) -> Option<PersistWriter> {
        self.writer.take()
    }

    /// Replace the persisted subset with what `backend` holds
    ///
    /// Selection and search are reset to their defaults. When the backend
    /// has nothing stored yet the current state is kept and `Ok(false)` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored blob
    /// cannot be decoded. The in-memory state is left untouched in that case.
    pub fn hydrate(&mut self, backend: &dyn Persistence) -> Result<bool> {
        match backend.load()? {
            Some(persisted) => {
                self.state = StoreState::from_persisted(persisted);
                tracing::info!(
                    prompts = self.state.prompts.len(),
                    folders = self.state.folders.len(),
                    tags = self.state.tags.len(),
                    "Hydrated prompt store"
                );
                self.observers.notify(&StoreEvent::Hydrated, &self.state);
                Ok(true)
            }
            None => {
                tracing::info!("No persisted state found, keeping initial library");
                Ok(false)
            }
        }
    }

    /// Register `observer` to run after every applied mutation
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent, &StoreState) + Send + Sync + 'static,
    {
        self.observers.subscribe(observer)
    }

    /// Remove an observer; `false` if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Borrow the current state
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Cheap owned copy of the current state, unaffected by later mutations
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    fn commit(&mut self, event: StoreEvent) {
        tracing::debug!(?event, "Store mutation applied");
        self.observers.notify(&event, &self.state);
        if let Some(writer) = &self.writer {
            writer.schedule(self.state.to_persisted());
        }
    }

    fn prompt_index(&self, id: &str) -> Option<usize> {
        self.state.prompts.iter().position(|p| p.id == id)
    }

    fn prompts_mut(&mut self) -> &mut Vec<Prompt> {
        Arc::make_mut(&mut self.state.prompts)
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    /// Create a prompt at version 1 and select it
    ///
    /// No validation is applied: empty titles or content are stored as given.
    ///
    /// # Returns
    ///
    /// The id of the new prompt
    pub fn add_prompt(&mut self, draft: NewPrompt) -> String {
        let now = Utc::now();
        let id = self.ids.new_id();
        let prompt = Prompt {
            id: id.clone(),
            history: vec![PromptVersion {
                id: self.ids.new_id(),
                content: draft.content.clone(),
                timestamp: now,
                version: 1,
            }],
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            folder_id: draft.folder_id,
            is_favorite: draft.is_favorite,
            created_at: now,
            updated_at: now,
            version: 1,
        };

        self.prompts_mut().push(prompt);
        self.state.selection.prompt_id = Some(id.clone());
        self.commit(StoreEvent::PromptAdded { id: id.clone() });
        id
    }

    /// Merge `update` over the prompt, bump its version and touch `updated_at`
    ///
    /// The version is bumped even when nothing actually changed. A history
    /// entry is appended only when `update.content` differs from the
    /// current content.
    ///
    /// # Returns
    ///
    /// `false` if no prompt has this id
    pub fn update_prompt(&mut self, id: &str, update: PromptUpdate) -> bool {
        let Some(index) = self.prompt_index(id) else {
            tracing::debug!(id, "update_prompt: no such prompt");
            return false;
        };

        let now = Utc::now();
        let new_content_id = self.ids.new_id();
        let prompt = &mut self.prompts_mut()[index];
        let version = prompt.version.saturating_add(1);
        let changed_content = update
            .content
            .as_ref()
            .filter(|content| **content != prompt.content)
            .cloned();

        if let Some(title) = update.title {
            prompt.title = title;
        }
        if let Some(content) = update.content {
            prompt.content = content;
        }
        if let Some(tags) = update.tags {
            prompt.tags = tags;
        }
        if let Some(folder_id) = update.folder_id {
            prompt.folder_id = folder_id;
        }
        if let Some(is_favorite) = update.is_favorite {
            prompt.is_favorite = is_favorite;
        }
        prompt.updated_at = now;
        prompt.version = version;

        let history_appended = match changed_content {
            Some(content) => {
                prompt.history.push(PromptVersion {
                    id: new_content_id,
                    content,
                    timestamp: now,
                    version,
                });
                true
            }
            None => false,
        };

        self.commit(StoreEvent::PromptUpdated {
            id: id.to_string(),
            version,
            history_appended,
        });
        true
    }

    /// Remove a prompt, clearing the selection if it pointed at it
    pub fn delete_prompt(&mut self, id: &str) -> bool {
        let removed = match self.prompt_index(id) {
            Some(index) => {
                self.prompts_mut().remove(index);
                true
            }
            None => false,
        };

        let was_selected = self.state.selection.prompt_id.as_deref() == Some(id);
        if was_selected {
            self.state.selection.prompt_id = None;
        }

        if !removed && !was_selected {
            tracing::debug!(id, "delete_prompt: no such prompt");
            return false;
        }

        self.commit(StoreEvent::PromptDeleted { id: id.to_string() });
        removed
    }

    /// Copy a prompt under a new id with a fresh history, and select the copy
    ///
    /// The copy's title gets [`COPY_SUFFIX`] appended; its history restarts
    /// at version 1 from the source's current content.
    ///
    /// # Returns
    ///
    /// The id of the copy, or `None` if the source does not exist
    pub fn duplicate_prompt(&mut self, id: &str) -> Option<String> {
        let Some(source) = self.prompt_by_id(id) else {
            tracing::debug!(id, "duplicate_prompt: no such prompt");
            return None;
        };

        let now = Utc::now();
        let copy_id = self.ids.new_id();
        let copy = Prompt {
            id: copy_id.clone(),
            title: format!("{}{}", source.title, COPY_SUFFIX),
            created_at: now,
            updated_at: now,
            version: 1,
            history: vec![PromptVersion {
                id: self.ids.new_id(),
                content: source.content.clone(),
                timestamp: now,
                version: 1,
            }],
            ..source.clone()
        };

        self.prompts_mut().push(copy);
        self.state.selection.prompt_id = Some(copy_id.clone());
        self.commit(StoreEvent::PromptDuplicated {
            source_id: id.to_string(),
            id: copy_id.clone(),
        });
        Some(copy_id)
    }

    /// Flip the favorite flag
    ///
    /// Unlike `update_prompt` this leaves `version` and `updated_at` alone.
    ///
    /// # Returns
    ///
    /// The new flag value, or `None` if the prompt does not exist
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let Some(index) = self.prompt_index(id) else {
            tracing::debug!(id, "toggle_favorite: no such prompt");
            return None;
        };

        let prompt = &mut self.prompts_mut()[index];
        prompt.is_favorite = !prompt.is_favorite;
        let is_favorite = prompt.is_favorite;

        self.commit(StoreEvent::FavoriteToggled {
            id: id.to_string(),
            is_favorite,
        });
        Some(is_favorite)
    }

    // ------------------------------------------------------------------
    // Folders
    // ------------------------------------------------------------------

    /// Create a folder and return its id
    pub fn add_folder(&mut self, name: impl Into<String>, color: Option<String>) -> String {
        let id = self.ids.new_id();
        Arc::make_mut(&mut self.state.folders).push(Folder {
            id: id.clone(),
            name: name.into(),
            color,
            created_at: Utc::now(),
        });
        self.commit(StoreEvent::FolderAdded { id: id.clone() });
        id
    }

    /// Merge `update` over the folder; prompts are unaffected
    pub fn update_folder(&mut self, id: &str, update: FolderUpdate) -> bool {
        let Some(index) = self.state.folders.iter().position(|f| f.id == id) else {
            tracing::debug!(id, "update_folder: no such folder");
            return false;
        };

        let folder = &mut Arc::make_mut(&mut self.state.folders)[index];
        if let Some(name) = update.name {
            folder.name = name;
        }
        if let Some(color) = update.color {
            folder.color = color;
        }
        self.commit(StoreEvent::FolderUpdated { id: id.to_string() });
        true
    }

    /// Remove a folder and move its prompts to "no folder"
    ///
    /// Prompts are never deleted along with their folder. Prompts and the
    /// folder selection still pointing at `id` are cleared even when the
    /// folder itself is already gone.
    ///
    /// # Returns
    ///
    /// `true` if a folder was removed
    pub fn delete_folder(&mut self, id: &str) -> bool {
        let removed = match self.state.folders.iter().position(|f| f.id == id) {
            Some(index) => {
                Arc::make_mut(&mut self.state.folders).remove(index);
                true
            }
            None => false,
        };

        let mut detached = 0;
        if self
            .state
            .prompts
            .iter()
            .any(|p| p.folder_id.as_deref() == Some(id))
        {
            for prompt in self.prompts_mut().iter_mut() {
                if prompt.folder_id.as_deref() == Some(id) {
                    prompt.folder_id = None;
                    detached += 1;
                }
            }
        }

        let was_selected = self.state.selection.folder_id.as_deref() == Some(id);
        if was_selected {
            self.state.selection.folder_id = None;
        }

        if !removed && detached == 0 && !was_selected {
            tracing::debug!(id, "delete_folder: no such folder");
            return false;
        }

        self.commit(StoreEvent::FolderDeleted {
            id: id.to_string(),
            detached,
        });
        removed
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Create a tag and return its id
    pub fn add_tag(&mut self, name: impl Into<String>, color: Option<String>) -> String {
        let id = self.ids.new_id();
        Arc::make_mut(&mut self.state.tags).push(Tag {
            id: id.clone(),
            name: name.into(),
            color,
            created_at: Utc::now(),
        });
        self.commit(StoreEvent::TagAdded { id: id.clone() });
        id
    }

    /// Merge `update` over the tag
    ///
    /// Renaming does not touch prompts: prompts that carried the old name
    /// keep the old name.
    pub fn update_tag(&mut self, id: &str, update: TagUpdate) -> bool {
        let Some(index) = self.state.tags.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "update_tag: no such tag");
            return false;
        };

        let tag = &mut Arc::make_mut(&mut self.state.tags)[index];
        if let Some(name) = update.name {
            tag.name = name;
        }
        if let Some(color) = update.color {
            tag.color = color;
        }
        self.commit(StoreEvent::TagUpdated { id: id.to_string() });
        true
    }

    /// Remove a tag and strip its name from every prompt
    pub fn delete_tag(&mut self, id: &str) -> bool {
        let Some(index) = self.state.tags.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "delete_tag: no such tag");
            return false;
        };

        let removed = Arc::make_mut(&mut self.state.tags).remove(index);

        let mut untagged = 0;
        if self.state.prompts.iter().any(|p| p.has_tag(&removed.name)) {
            for prompt in self.prompts_mut().iter_mut() {
                let before = prompt.tags.len();
                prompt.tags.retain(|name| *name != removed.name);
                if prompt.tags.len() != before {
                    untagged += 1;
                }
            }
        }

        self.commit(StoreEvent::TagDeleted {
            id: id.to_string(),
            name: removed.name,
            untagged,
        });
        true
    }

    // ------------------------------------------------------------------
    // Selection and display settings
    // ------------------------------------------------------------------

    /// Select a prompt, or clear the selection with `None`
    pub fn set_selected_prompt(&mut self, id: Option<String>) {
        self.state.selection.prompt_id = id;
        self.commit(StoreEvent::SelectionChanged);
    }

    /// Select a folder filter. Clearing a tag filter is left to the caller.
    pub fn set_selected_folder(&mut self, id: Option<String>) {
        self.state.selection.folder_id = id;
        self.commit(StoreEvent::SelectionChanged);
    }

    /// Select a tag filter. Clearing a folder filter is left to the caller.
    pub fn set_selected_tag(&mut self, id: Option<String>) {
        self.state.selection.tag_id = id;
        self.commit(StoreEvent::SelectionChanged);
    }

    /// Replace the search text used by the filtered view
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.selection.search_query = query.into();
        self.commit(StoreEvent::SearchChanged);
    }

    /// Returns the new dark mode flag
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.is_dark_mode = !self.state.is_dark_mode;
        let is_dark_mode = self.state.is_dark_mode;
        self.commit(StoreEvent::DarkModeToggled { is_dark_mode });
        is_dark_mode
    }

    /// Switch between list and grid display
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
        self.commit(StoreEvent::ViewModeChanged { mode });
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// All prompts in insertion order
    pub fn prompts(&self) -> &[Prompt] {
        &self.state.prompts
    }

    /// All folders in insertion order
    pub fn folders(&self) -> &[Folder] {
        &self.state.folders
    }

    /// All tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.state.tags
    }

    /// Current selection and search text
    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    /// Whether the dark theme is on
    pub fn is_dark_mode(&self) -> bool {
        self.state.is_dark_mode
    }

    /// Current display mode
    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode
    }

    /// Prompts matching the search text, folder and tag selection, in
    /// insertion order
    pub fn filtered_prompts(&self) -> Vec<&Prompt> {
        PromptFilter::from_state(&self.state).apply(&self.state.prompts)
    }

    /// The filtered view restricted to favorites
    pub fn favorite_prompts(&self) -> Vec<&Prompt> {
        self.filtered_prompts()
            .into_iter()
            .filter(|p| p.is_favorite)
            .collect()
    }

    /// Totals for the sidebar, all computed over the filtered view
    pub fn library_counts(&self) -> LibraryCounts {
        let visible = self.filtered_prompts();
        LibraryCounts {
            total: visible.len(),
            favorites: visible.iter().filter(|p| p.is_favorite).count(),
            per_folder: self
                .state
                .folders
                .iter()
                .map(|folder| {
                    let count = visible
                        .iter()
                        .filter(|p| p.folder_id.as_deref() == Some(folder.id.as_str()))
                        .count();
                    (folder.id.clone(), count)
                })
                .collect(),
            per_tag: self
                .state
                .tags
                .iter()
                .map(|tag| {
                    let count = visible.iter().filter(|p| p.has_tag(&tag.name)).count();
                    (tag.id.clone(), count)
                })
                .collect(),
        }
    }

    /// Look up a prompt by exact id
    pub fn prompt_by_id(&self, id: &str) -> Option<&Prompt> {
        self.state.prompts.iter().find(|p| p.id == id)
    }

    /// Look up a folder by exact id
    pub fn folder_by_id(&self, id: &str) -> Option<&Folder> {
        self.state.folders.iter().find(|f| f.id == id)
    }

    /// Look up a tag by exact id
    pub fn tag_by_id(&self, id: &str) -> Option<&Tag> {
        self.state.tags.iter().find(|t| t.id == id)
    }

    /// The selected prompt, if it still exists
    pub fn selected_prompt(&self) -> Option<&Prompt> {
        self.state
            .selection
            .prompt_id
            .as_deref()
            .and_then(|id| self.prompt_by_id(id))
    }
}
