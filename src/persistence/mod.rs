//! Persistence capability for the prompt store
//!
//! The store never touches storage directly. Hosts hand it a
//! [`Persistence`] backend for the one explicit hydration, and a
//! [`PersistWriter`] that writes snapshots in the background.
//!
//! Every backend stores the same opaque blob: a JSON envelope
//!
//! ```json
//! { "state": { "prompts": [], "folders": [], "tags": [], "isDarkMode": false, "viewMode": "list" }, "version": 0 }
//! ```
//!
//! Timestamps are RFC 3339 with sub-second precision, so they round-trip
//! without loss.

use crate::error::{PromptGrabError, Result};
use crate::store::PersistedState;
use serde::{Deserialize, Serialize};

pub mod json_file;
pub mod memory;
pub mod sqlite;
pub mod writer;

pub use json_file::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use sqlite::SqlitePersistence;
pub use writer::PersistWriter;

/// Default key the blob is stored under
pub const DEFAULT_STORAGE_KEY: &str = "prompt-grab-storage";

/// Newest envelope version this build can read
pub const STATE_FORMAT_VERSION: u32 = 0;

/// Load/save capability for the persisted subset of store state
#[cfg_attr(test, mockall::automock)]
pub trait Persistence: Send + Sync {
    /// Read the stored state, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<PersistedState>>;

    /// Replace the stored state
    fn save(&self, state: &PersistedState) -> Result<()>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Serialize state into the storage envelope
pub fn encode_state(state: &PersistedState) -> Result<String> {
    let envelope = EnvelopeRef {
        state,
        version: STATE_FORMAT_VERSION,
    };
    serde_json::to_string(&envelope)
        .map_err(|e| PromptGrabError::Storage(format!("Failed to encode state: {}", e)).into())
}

/// Parse a storage envelope back into state
///
/// # Errors
///
/// Returns `PromptGrabError::Storage` when the blob is not valid JSON, does
/// not match the expected shape, or was written by a newer format version.
pub fn decode_state(blob: &str) -> Result<PersistedState> {
    let envelope: Envelope = serde_json::from_str(blob)
        .map_err(|e| PromptGrabError::Storage(format!("Failed to decode state: {}", e)))?;

    if envelope.version > STATE_FORMAT_VERSION {
        return Err(PromptGrabError::Storage(format!(
            "Stored state has format version {}, newest supported is {}",
            envelope.version, STATE_FORMAT_VERSION
        ))
        .into());
    }

    Ok(envelope.state)
}
