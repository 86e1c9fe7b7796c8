//! Domain types held by the prompt store
//!
//! Field names serialize in camelCase so the persisted blob keeps the same
//! shape as the library's established storage format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A saved piece of prompt text with its edit history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier, assigned at creation
    pub id: String,
    /// Display title
    pub title: String,
    /// Prompt body
    pub content: String,
    /// Tag names (not tag ids)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Folder this prompt is filed under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Whether the prompt is starred
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time, never changes
    pub created_at: DateTime<Utc>,
    /// Time of the last versioned update
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, bumped by exactly one on every `update_prompt`
    pub version: u32,
    /// Content snapshots in chronological order, never empty
    pub history: Vec<PromptVersion>,
}

impl Prompt {
    /// Returns true if the prompt carries the given tag name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// The most recent history snapshot
    pub fn latest_version(&self) -> Option<&PromptVersion> {
        self.history.last()
    }
}

/// Immutable snapshot of a prompt's content at one version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptVersion {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub version: u32,
}

/// Single-level named grouping of prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Named label; prompts reference tags by `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// How the prompt collection is laid out by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::List => write!(f, "list"),
            ViewMode::Grid => write!(f, "grid"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "grid" => Ok(ViewMode::Grid),
            other => Err(format!("unknown view mode '{}', expected list or grid", other)),
        }
    }
}

/// Fields supplied by the caller when creating a prompt
///
/// # Examples
///
/// ```
/// use promptgrab::store::NewPrompt;
///
/// let draft = NewPrompt::new("Summarize", "Summarize the following text")
///     .with_tags(["writing"])
///     .favorite(true);
/// assert_eq!(draft.tags, vec!["writing".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub folder_id: Option<String>,
    pub is_favorite: bool,
}

impl NewPrompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}

/// Partial update merged over an existing prompt
///
/// `None` leaves a field untouched. `folder_id` is doubly optional so a
/// caller can distinguish "keep the folder" from "move to no folder".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<Option<String>>,
    pub is_favorite: Option<bool>,
}

impl PromptUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn folder(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.folder_id.is_none()
            && self.is_favorite.is_none()
    }

    /// Layers `later` over `self`, later fields winning
    pub fn merge(mut self, later: PromptUpdate) -> Self {
        if later.title.is_some() {
            self.title = later.title;
        }
        if later.content.is_some() {
            self.content = later.content;
        }
        if later.tags.is_some() {
            self.tags = later.tags;
        }
        if later.folder_id.is_some() {
            self.folder_id = later.folder_id;
        }
        if later.is_favorite.is_some() {
            self.is_favorite = later.is_favorite;
        }
        self
    }
}

/// Partial update for a folder or tag: both carry a name and an optional color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelUpdate {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
}

impl LabelUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            color: None,
        }
    }

    pub fn recolor(color: Option<String>) -> Self {
        Self {
            name: None,
            color: Some(color),
        }
    }
}

pub type FolderUpdate = LabelUpdate;
pub type TagUpdate = LabelUpdate;

/// Ephemeral selection and search state, never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub prompt_id: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
    pub search_query: String,
}

/// The full state tree owned by the store
///
/// Collections sit behind `Arc` so a snapshot handed to readers is cheap
/// and can never observe a later mutation: every mutation builds a new
/// collection and swaps the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub prompts: Arc<Vec<Prompt>>,
    pub folders: Arc<Vec<Folder>>,
    pub tags: Arc<Vec<Tag>>,
    pub selection: Selection,
    pub is_dark_mode: bool,
    pub view_mode: ViewMode,
}

impl StoreState {
    /// Rebuild a state tree from its persisted subset, with default selection
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            prompts: persisted.prompts,
            folders: persisted.folders,
            tags: persisted.tags,
            selection: Selection::default(),
            is_dark_mode: persisted.is_dark_mode,
            view_mode: persisted.view_mode,
        }
    }

    /// The subset of state that is written to storage
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            prompts: Arc::clone(&self.prompts),
            folders: Arc::clone(&self.folders),
            tags: Arc::clone(&self.tags),
            is_dark_mode: self.is_dark_mode,
            view_mode: self.view_mode,
        }
    }
}

/// Persisted subset of the store: collections plus theme and layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub prompts: Arc<Vec<Prompt>>,
    #[serde(default)]
    pub folders: Arc<Vec<Folder>>,
    #[serde(default)]
    pub tags: Arc<Vec<Tag>>,
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub view_mode: ViewMode,
}

/// Counts shown next to each sidebar entry, computed over the filtered view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryCounts {
    pub total: usize,
    pub favorites: usize,
    /// (folder id, count) in folder order
    pub per_folder: Vec<(String, usize)>,
    /// (tag id, count) in tag order
    pub per_tag: Vec<(String, usize)>,
}
