//! Single JSON file backend

use super::{decode_state, encode_state, Persistence};
use crate::error::{PromptGrabError, Result};
use crate::store::PersistedState;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Stores the envelope in one file, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Use `path` for storage, creating its parent directory if needed
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for state file")
                    .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<PersistedState>> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => decode_state(&blob).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PromptGrabError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
            .into()),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let blob = encode_state(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, blob)
            .with_context(|| format!("Failed to write {}", tmp.display()))
            .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))
            .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
        Ok(())
    }
}
