//! Process environment: container detection, actions directory and logging

use std::env;
use std::path::{Path, PathBuf};

/// Files whose presence means we are running inside a container
pub const CONTAINER_MARKERS: &[&str] = &["/.dockerenv", "/run/.containerenv"];

/// Environment variable overriding the actions directory
pub const ACTIONS_DIR_ENV: &str = "PROJECT_ACTIONS_DIR";

/// Actions directory used when [`ACTIONS_DIR_ENV`] is unset
pub const DEFAULT_ACTIONS_DIR: &str = "./project";

/// Whether this process runs on the host rather than inside a container
pub fn is_outside_container() -> bool {
    is_outside_container_with(CONTAINER_MARKERS)
}

/// Same as [`is_outside_container`] with explicit marker files
pub fn is_outside_container_with<P: AsRef<Path>>(markers: &[P]) -> bool {
    !markers.iter().any(|marker| marker.as_ref().exists())
}

/// The actions directory, from the environment or the default
pub fn actions_dir() -> PathBuf {
    actions_dir_from(env::var(ACTIONS_DIR_ENV).ok())
}

fn actions_dir_from(value: Option<String>) -> PathBuf {
    match value {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_ACTIONS_DIR),
    }
}

/// Initialize logging
///
/// Warnings are shown by default; `verbose` or `DEBUG=true` enables debug
/// output. `RUST_LOG` takes precedence over both.
pub fn init_logging(verbose: bool) {
    let debug = verbose || env::var("DEBUG").map(|v| v == "true").unwrap_or(false);
    let level = if debug { "debug" } else { "warn" };

    // A second initialization (e.g. from tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
