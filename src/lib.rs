//! project-actions - a YAML-based project command runner
//!
//! Commands are defined as YAML files in `<actions-dir>/commands`, each one
//! becoming a subcommand of the CLI. Their steps run in a local shell or,
//! when the command asks for it, inside a compose service.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Error, Result};

/// Current version of project-actions
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
