//! CLI interface and argument parsing
//!
//! This module builds the command tree from the discovered command files
//! and detects the environment the commands run in.

pub mod app;
pub mod env;

// Re-export main types
pub use app::*;
