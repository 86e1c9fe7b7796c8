//! In-process backend, mainly for tests and `storage.backend: memory`

use super::{decode_state, encode_state, Persistence};
use crate::error::{PromptGrabError, Result};
use crate::store::PersistedState;
use std::sync::Mutex;

/// Keeps the encoded blob in memory so saves go through the same
/// serialization path as the durable backends
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blob: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored envelope, if any
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Option<PersistedState>> {
        let guard = self
            .blob
            .lock()
            .map_err(|_| PromptGrabError::Storage("memory backend lock poisoned".into()))?;
        guard.as_deref().map(decode_state).transpose()
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let blob = encode_state(state)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| PromptGrabError::Storage("memory backend lock poisoned".into()))?;
        *guard = Some(blob);
        Ok(())
    }
}
