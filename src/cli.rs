//! Command-line interface definition for PromptGrab
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for prompts, folders, tags and display settings.

use crate::config::StorageBackend;
use crate::store::ViewMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PromptGrab - local prompt library
///
/// Keep prompts organized in folders and tags, with a version history of
/// every content change.
#[derive(Parser, Debug, Clone)]
#[command(name = "promptgrab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the storage file location
    #[arg(long, global = true)]
    pub storage_path: Option<String>,

    /// Override the storage backend (sqlite, json, memory)
    #[arg(long, global = true)]
    pub backend: Option<StorageBackend>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for PromptGrab
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List prompts, narrowed by search, folder, tag or favorites
    List {
        /// Case-insensitive text matched against title, content and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Folder name or id
        #[arg(short, long)]
        folder: Option<String>,

        /// Tag name or id
        #[arg(short, long)]
        tag: Option<String>,

        /// Only favorite prompts
        #[arg(long)]
        favorites: bool,

        /// Print the listed prompts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a prompt in full
    Show {
        /// Prompt id (or unique prefix of at least 8 characters)
        id: String,
    },

    /// Show the version history of a prompt
    History {
        /// Prompt id (or unique prefix)
        id: String,
    },

    /// Create a prompt
    Add {
        /// Prompt title
        title: String,

        /// Prompt content
        content: String,

        /// Tag name, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Folder name or id
        #[arg(short, long)]
        folder: Option<String>,

        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// Change a prompt; a content change records a new version
    Edit {
        /// Prompt id (or unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Replace the tags, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        /// Move into this folder (name or id)
        #[arg(short, long)]
        folder: Option<String>,

        /// Move out of any folder
        #[arg(long, conflicts_with = "folder")]
        no_folder: bool,
    },

    /// Delete a prompt
    Delete {
        /// Prompt id (or unique prefix)
        id: String,
    },

    /// Copy a prompt, starting a fresh history
    Duplicate {
        /// Prompt id (or unique prefix)
        id: String,
    },

    /// Toggle the favorite flag of a prompt
    Favorite {
        /// Prompt id (or unique prefix)
        id: String,
    },

    /// Export a prompt as a JSON file
    Export {
        /// Prompt id (or unique prefix)
        id: String,

        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage folders
    Folder {
        #[command(subcommand)]
        command: LabelCommand,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: LabelCommand,
    },

    /// Light or dark theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },

    /// Set the layout prompts are shown in (list, grid)
    View {
        mode: ViewMode,
    },
}

/// Folder and tag management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LabelCommand {
    /// List with prompt counts
    List,

    /// Create a new entry
    Add {
        name: String,

        /// Display color, e.g. "#3b82f6"
        #[arg(long)]
        color: Option<String>,
    },

    /// Rename an entry
    Rename {
        /// Name or id
        target: String,

        /// New name
        name: String,
    },

    /// Delete an entry
    Delete {
        /// Name or id
        target: String,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Switch between light and dark
    Toggle,
    /// Print the current theme
    Show,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            backend: None,
            command: Commands::List {
                search: None,
                folder: None,
                tag: None,
                favorites: false,
                json: false,
            },
        }
    }
}
