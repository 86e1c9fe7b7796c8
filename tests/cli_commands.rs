//! End-to-end tests for the `promptgrab` binary
//!
//! Each test points the binary at its own temporary JSON library so runs
//! never touch the user's data directory.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

struct Library {
    dir: TempDir,
    config: PathBuf,
}

impl Library {
    fn new() -> Self {
        Self::with_config("library:\n  seed_sample_data: true\n")
    }

    fn with_config(yaml: &str) -> Self {
        let (dir, config) = common::temp_config_file(yaml);
        Self { dir, config }
    }

    fn storage(&self) -> PathBuf {
        self.dir.path().join("library.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("promptgrab").unwrap();
        cmd.env_remove("RUST_LOG")
            .env_remove("PROMPTGRAB_STORAGE_BACKEND")
            .env_remove("PROMPTGRAB_STORAGE_PATH")
            .env_remove("PROMPTGRAB_SEED_SAMPLE_DATA")
            .arg("--config")
            .arg(&self.config)
            .arg("--backend")
            .arg("json")
            .arg("--storage-path")
            .arg(self.storage());
        cmd
    }

    fn list_json(&self, extra: &[&str]) -> Vec<serde_json::Value> {
        let output = self
            .cmd()
            .arg("list")
            .arg("--json")
            .args(extra)
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("list --json prints a JSON array")
    }
}

#[test]
fn test_fresh_library_lists_sample_prompts() {
    let lib = Library::new();
    let prompts = lib.list_json(&[]);
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[0]["title"], "Code Review Assistant");
}

#[test]
fn test_seeding_can_be_disabled() {
    let lib = Library::with_config("library:\n  seed_sample_data: false\n");
    assert!(lib.list_json(&[]).is_empty());
}

#[test]
fn test_added_prompt_is_persisted() {
    let lib = Library::new();
    lib.cmd()
        .args(["add", "Standup notes", "Summarize yesterday", "--tag", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created tag 'work'"))
        .stdout(predicate::str::contains("Added prompt"));
    assert!(lib.storage().exists());

    let found = lib.list_json(&["--search", "standup"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["version"], 1);
    assert_eq!(found[0]["tags"], serde_json::json!(["work"]));
}

#[test]
fn test_blank_title_is_rejected() {
    let lib = Library::new();
    lib.cmd()
        .args(["add", "   ", "content"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title cannot be empty"));
    assert!(!lib.storage().exists());
}

#[test]
fn test_edit_content_adds_history_entry() {
    let lib = Library::new();
    lib.cmd()
        .args(["edit", "1", "--content", "Be brief."])
        .assert()
        .success()
        .stdout(predicate::str::contains("version 2"));

    lib.cmd()
        .args(["history", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Be brief."));
}

#[test]
fn test_filter_by_folder_name() {
    let lib = Library::new();
    let work = lib.list_json(&["--folder", "work"]);
    assert_eq!(work.len(), 2);

    let favorites = lib.list_json(&["--folder", "Work", "--favorites"]);
    assert_eq!(favorites.len(), 2);
}

#[test]
fn test_unknown_prompt_reports_not_found() {
    let lib = Library::new();
    lib.cmd()
        .args(["show", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt not found: does-not-exist"));
}

#[test]
fn test_theme_toggle_survives_restart() {
    let lib = Library::new();
    lib.cmd().args(["theme", "toggle"]).assert().success();
    lib.cmd()
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));
}

#[test]
fn test_export_writes_named_file() {
    let lib = Library::new();
    let out = TempDir::new().unwrap();
    lib.cmd()
        .args(["export", "2", "--output"])
        .arg(out.path())
        .assert()
        .success();

    let path = out.path().join("creative_writing_prompts.json");
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(exported["title"], "Creative Writing Prompts");
    assert!(exported.get("history").is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let lib = Library::with_config("autosave:\n  debounce_ms: 0\n");
    lib.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_invalid_env_override_is_reported() {
    let lib = Library::new();
    lib.cmd()
        .env("PROMPTGRAB_STORAGE_BACKEND", "floppy")
        .env("PROMPTGRAB_AUTOSAVE_DEBOUNCE_MS", "soon")
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"))
        .stderr(predicate::str::contains("Invalid PROMPTGRAB_STORAGE_BACKEND"))
        .stderr(predicate::str::contains("Invalid PROMPTGRAB_AUTOSAVE_DEBOUNCE_MS"));
}
