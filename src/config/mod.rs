//! Command definitions
//!
//! This module handles parsing of command files and discovery of the
//! commands in an actions directory.

pub mod parse;
pub mod types;

// Re-export main types
pub use parse::*;
pub use types::*;
