//! SQLite key-value backend
//!
//! A single `storage` table maps a key to the encoded envelope, the same way
//! a browser's local storage would. Several libraries can share one database
//! file under different keys.

use super::{decode_state, encode_state, Persistence, DEFAULT_STORAGE_KEY};
use crate::error::{PromptGrabError, Result};
use crate::store::PersistedState;
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Storage backend keeping the state blob in an SQLite database
#[derive(Debug, Clone)]
pub struct SqlitePersistence {
    db_path: PathBuf,
    key: String,
}

impl SqlitePersistence {
    /// Open the database in the user's data directory
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "promptgrab", "promptgrab")
            .ok_or_else(|| PromptGrabError::Storage("Could not determine data directory".into()))?;
        Self::new_with_path(proj_dirs.data_dir().join("promptgrab.db"), DEFAULT_STORAGE_KEY)
    }

    /// Open (or create) the database at `db_path`, reading and writing `key`
    ///
    /// # Examples
    ///
    /// ```
    /// use promptgrab::persistence::{Persistence, SqlitePersistence};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let backend = SqlitePersistence::new_with_path(dir.path().join("lib.db"), "prompt-grab-storage").unwrap();
    /// assert!(backend.load().unwrap().is_none());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P, key: impl Into<String>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for database")
                    .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
            }
        }

        let storage = Self {
            db_path,
            key: key.into(),
        };
        storage.init()?;
        Ok(storage)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| PromptGrabError::Storage(e.to_string()).into())
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Drop the stored blob for this key
    pub fn clear(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM storage WHERE key = ?", params![self.key])
            .context("Failed to clear stored state")
            .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl Persistence for SqlitePersistence {
    fn load(&self) -> Result<Option<PersistedState>> {
        let conn = self.open()?;
        let blob: Option<String> = conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?",
                params![self.key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query stored state")
            .map_err(|e| PromptGrabError::Storage(e.to_string()))?;

        blob.as_deref().map(decode_state).transpose()
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let blob = encode_state(state)?;
        let now = Utc::now().to_rfc3339();
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.key, blob, now],
        )
        .context("Failed to write stored state")
        .map_err(|e| PromptGrabError::Storage(e.to_string()))?;
        Ok(())
    }
}
