//! Export a single prompt as a standalone JSON document

use crate::error::{PromptGrabError, Result};
use crate::store::Prompt;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The exported shape: the prompt's text and metadata, without history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptExport {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Prompt> for PromptExport {
    fn from(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            tags: prompt.tags.clone(),
            created_at: prompt.created_at,
            updated_at: prompt.updated_at,
        }
    }
}

/// Pretty-printed JSON for `prompt`
pub fn export_prompt(prompt: &Prompt) -> Result<String> {
    serde_json::to_string_pretty(&PromptExport::from(prompt))
        .map_err(|e| PromptGrabError::Export(format!("Failed to serialize prompt: {}", e)).into())
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"(?i)[^a-z0-9]").expect("static regex is valid"))
}

/// File name for an exported prompt: every character outside `[a-z0-9]`
/// becomes `_`, then the whole name is lowercased
///
/// # Examples
///
/// ```
/// use promptgrab::export::export_file_name;
///
/// assert_eq!(export_file_name("Code Review Assistant!"), "code_review_assistant_.json");
/// ```
pub fn export_file_name(title: &str) -> String {
    format!("{}.json", unsafe_chars().replace_all(title, "_").to_lowercase())
}

/// Write the export of `prompt` into `dir`, returning the file path
pub fn write_export(prompt: &Prompt, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(&prompt.title));
    let json = export_prompt(prompt)?;
    std::fs::write(&path, json).map_err(|e| {
        PromptGrabError::Export(format!("Failed to write {}: {}", path.display(), e))
    })?;
    tracing::info!(path = %path.display(), "Exported prompt");
    Ok(path)
}
