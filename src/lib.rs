//! PromptGrab - local prompt library
//!
//! This library provides a prompt store with folders, tags and a version
//! history of every content change, plus the persistence, autosave and
//! configuration around it.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: The prompt store, its data model, filtering and observers
//! - `persistence`: Storage backends and the background snapshot writer
//! - `autosave`: Debounced commits of in-progress edits
//! - `export`: Single-prompt JSON export
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and its handlers
//!
//! # Example
//!
//! ```no_run
//! use promptgrab::store::{NewPrompt, PromptStore};
//! use promptgrab::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let backend = config.storage.open_backend()?;
//!     let mut store = PromptStore::with_sample_data(config.ids.format.generator());
//!     store.hydrate(backend.as_ref())?;
//!     store.add_prompt(NewPrompt::new("Summarize", "Summarize the text below."));
//!     Ok(())
//! }
//! ```

pub mod autosave;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod persistence;
pub mod store;

// Re-export commonly used types
pub use autosave::Autosave;
pub use config::Config;
pub use error::{PromptGrabError, Result};
pub use persistence::{PersistWriter, Persistence};
pub use store::PromptStore;

#[cfg(test)]
pub mod test_utils;
