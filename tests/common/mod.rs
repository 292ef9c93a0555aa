//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary actions directory with the given command files
pub fn create_actions_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let commands_dir = temp_dir.path().join("commands");
    fs::create_dir_all(&commands_dir).unwrap();

    for (name, content) in files {
        fs::write(commands_dir.join(name), content).unwrap();
    }

    temp_dir
}

/// Create a single command file and return its path
pub fn create_command_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("command.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// A binary invocation pointed at `actions_dir`, with a clean environment
pub fn cli(actions_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("project-actions").unwrap();
    cmd.env("PROJECT_ACTIONS_DIR", actions_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DEBUG");
    cmd
}
