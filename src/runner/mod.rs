//! Command execution engine
//!
//! This module resolves where a command runs and executes its steps, either
//! in a local shell or inside a compose service.

pub mod compose;
pub mod context;
pub mod dispatch;
pub mod shell;

// Re-export main types
pub use compose::*;
pub use context::*;
pub use dispatch::*;
pub use shell::*;
