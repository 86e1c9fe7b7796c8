use promptgrab::persistence::{JsonFilePersistence, SqlitePersistence, DEFAULT_STORAGE_KEY};
use promptgrab::store::{PromptStore, UuidIds};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn empty_store() -> PromptStore {
    PromptStore::new(Box::new(UuidIds))
}

#[allow(dead_code)]
pub fn create_temp_sqlite() -> (SqlitePersistence, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("library.db");
    let storage = SqlitePersistence::new_with_path(db_path, DEFAULT_STORAGE_KEY)
        .expect("failed to create sqlite storage with path");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn create_temp_json() -> (JsonFilePersistence, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = JsonFilePersistence::new(tmp.path().join("library.json"))
        .expect("failed to create json storage");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
