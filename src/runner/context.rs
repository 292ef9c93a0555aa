//! Execution context resolution
//!
//! Decides once per invocation where a command's steps run, from the
//! command's declared `context` and whether we are outside a container.

use crate::error::{ExecutionError, ExecutionResult};
use std::fmt;

/// Context that may only run on the host
pub const OUTSIDE_CONTAINER: &str = "outside-container";

/// Prefix of contexts that run inside a compose service
pub const INSIDE_CONTAINER: &str = "inside-container";

/// Where the steps of a command execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Local `sh -c`
    Shell,

    /// `exec` into the named compose service
    ContainerService(String),
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Shell => write!(f, "shell"),
            ExecutionContext::ContainerService(service) => write!(f, "service '{}'", service),
        }
    }
}

/// Outcome of resolving a declared context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The command cannot run in this environment
    Refuse,

    /// Run the steps in this context
    Run(ExecutionContext),
}

/// Resolve a declared context string
pub fn resolve_context(context: &str, is_outside_container: bool) -> ExecutionResult<Resolution> {
    if context == OUTSIDE_CONTAINER && !is_outside_container {
        return Ok(Resolution::Refuse);
    }

    if context.starts_with(INSIDE_CONTAINER) && is_outside_container {
        let service = context
            .split_once(':')
            .map(|(_, service)| service)
            .filter(|service| !service.is_empty())
            .ok_or_else(|| ExecutionError::MissingService(context.to_string()))?;

        return Ok(Resolution::Run(ExecutionContext::ContainerService(
            service.to_string(),
        )));
    }

    // Already inside the container, on the host, or no preference
    Ok(Resolution::Run(ExecutionContext::Shell))
}
