//! Configuration management for PromptGrab
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{PromptGrabError, Result};
use crate::persistence::{
    JsonFilePersistence, MemoryPersistence, Persistence, SqlitePersistence, DEFAULT_STORAGE_KEY,
};
use crate::store::IdFormat;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Main configuration structure for PromptGrab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the library is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Id generation settings
    #[serde(default)]
    pub ids: IdsConfig,

    /// Debounced edit commits
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Initial library contents
    #[serde(default)]
    pub library: LibraryConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persistence backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite key-value table
    #[default]
    Sqlite,
    /// One JSON file
    Json,
    /// Nothing survives the process
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "json" => Ok(StorageBackend::Json),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Explicit file path; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<String>,

    /// Key the state blob is stored under (SQLite backend)
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// The file the configured backend reads and writes, if any
    pub fn resolved_path(&self) -> Result<Option<PathBuf>> {
        if self.backend == StorageBackend::Memory {
            return Ok(None);
        }
        if let Some(path) = &self.path {
            return Ok(Some(PathBuf::from(path)));
        }

        let proj_dirs = ProjectDirs::from("com", "promptgrab", "promptgrab").ok_or_else(|| {
            PromptGrabError::Storage("Could not determine data directory".into())
        })?;
        let file = match self.backend {
            StorageBackend::Json => "promptgrab.json",
            _ => "promptgrab.db",
        };
        Ok(Some(proj_dirs.data_dir().join(file)))
    }

    /// Build the configured backend
    pub fn open_backend(&self) -> Result<Arc<dyn Persistence>> {
        let backend: Arc<dyn Persistence> = match (self.backend, self.resolved_path()?) {
            (StorageBackend::Sqlite, Some(path)) => {
                Arc::new(SqlitePersistence::new_with_path(path, self.key.clone())?)
            }
            (StorageBackend::Json, Some(path)) => Arc::new(JsonFilePersistence::new(path)?),
            _ => Arc::new(MemoryPersistence::new()),
        };
        Ok(backend)
    }
}

/// Id generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdsConfig {
    #[serde(default)]
    pub format: IdFormat,
}

/// Debounced autosave configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Idle time after the last edit before it is committed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Initial library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Start from the sample library when nothing has been stored yet
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

fn default_seed_sample_data() -> bool {
    true
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: default_seed_sample_data(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,

    /// Also append logs to this file
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_log_level() -> String {
    "promptgrab=warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(PromptGrabError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(PromptGrabError::from)
            .with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(backend) = std::env::var("PROMPTGRAB_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(e) => tracing::warn!("Invalid PROMPTGRAB_STORAGE_BACKEND: {}", e),
            }
        }

        if let Ok(path) = std::env::var("PROMPTGRAB_STORAGE_PATH") {
            self.storage.path = Some(path);
        }

        if let Ok(format) = std::env::var("PROMPTGRAB_ID_FORMAT") {
            self.ids.format = match format.to_lowercase().as_str() {
                "uuid" => IdFormat::Uuid,
                "ulid" => IdFormat::Ulid,
                _ => {
                    tracing::warn!("Invalid id format: {}, using default", format);
                    IdFormat::default()
                }
            };
        }

        if let Ok(debounce) = std::env::var("PROMPTGRAB_AUTOSAVE_DEBOUNCE_MS") {
            if let Ok(value) = debounce.parse() {
                self.autosave.debounce_ms = value;
            } else {
                tracing::warn!("Invalid PROMPTGRAB_AUTOSAVE_DEBOUNCE_MS: {}", debounce);
            }
        }

        if let Ok(seed) = std::env::var("PROMPTGRAB_SEED_SAMPLE_DATA") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.library.seed_sample_data = true,
                "0" | "false" | "no" => self.library.seed_sample_data = false,
                _ => tracing::warn!("Invalid PROMPTGRAB_SEED_SAMPLE_DATA: {}", seed),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
        if let Some(backend) = cli.backend {
            self.storage.backend = backend;
        }
        if cli.verbose {
            self.logging.level = "promptgrab=debug".to_string();
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(PromptGrabError::Config("storage.key cannot be empty".to_string()).into());
        }

        if let Some(path) = &self.storage.path {
            if path.trim().is_empty() {
                return Err(
                    PromptGrabError::Config("storage.path cannot be empty".to_string()).into(),
                );
            }
        }

        if self.autosave.debounce_ms == 0 {
            return Err(PromptGrabError::Config(
                "autosave.debounce_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.autosave.debounce_ms > 60_000 {
            return Err(PromptGrabError::Config(
                "autosave.debounce_ms must be less than or equal to 60000".to_string(),
            )
            .into());
        }

        if self.logging.level.trim().is_empty() {
            return Err(PromptGrabError::Config("logging.level cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
