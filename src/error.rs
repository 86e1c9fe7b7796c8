//! Error types for PromptGrab
//!
//! This module defines the error types used by the host application and the
//! persistence layer, using `thiserror` for ergonomic error handling.
//!
//! The prompt store itself never returns these: mutations aimed at unknown
//! ids are no-ops and malformed input is accepted as given.

use thiserror::Error;

/// Main error type for PromptGrab operations
#[derive(Error, Debug)]
pub enum PromptGrabError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence backend errors (open, read, write, format)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Prompt export errors
    #[error("Export error: {0}")]
    Export(String),

    /// A host-side lookup did not resolve to exactly one entity
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up ("prompt", "folder", "tag")
        kind: &'static str,
        /// The id or id prefix that was requested
        id: String,
    },

    /// An id prefix matched more than one entity
    #[error("Ambiguous {kind} id '{id}': matches {matches} entries")]
    AmbiguousId {
        /// Kind of entity that was looked up
        kind: &'static str,
        /// The id prefix that was requested
        id: String,
        /// Number of entities matching the prefix
        matches: usize,
    },

    /// Input rejected by the host before reaching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for PromptGrab operations
///
/// Uses `anyhow::Error` so callers can attach context while propagating.
pub type Result<T> = anyhow::Result<T>;
