//! Compose tool detection and the action registry

use crate::error::{ExecutionError, ExecutionResult};
use std::collections::HashMap;
use std::fmt;
use std::process::{Command as StdCommand, Stdio};

/// Compose invocations to try, in order of preference
pub const COMPOSE_CANDIDATES: &[&[&str]] = &[
    &["docker", "compose"],
    &["docker-compose"],
    &["podman", "compose"],
    &["podman-compose"],
];

/// A compose-style CLI, e.g. `docker compose` or `podman-compose`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeTool {
    /// Program and leading arguments
    argv: Vec<String>,
}

impl ComposeTool {
    /// Create a compose tool from a program and its leading arguments
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComposeTool {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Find the first compose tool that answers `--version`
    pub fn detect() -> ExecutionResult<Self> {
        Self::detect_from(COMPOSE_CANDIDATES)
    }

    /// Find the first of `candidates` that answers `--version`
    pub fn detect_from(candidates: &[&[&str]]) -> ExecutionResult<Self> {
        for candidate in candidates {
            let tool = ComposeTool::new(candidate.iter().copied());
            if tool.probe() {
                log::debug!("Using compose tool: {}", tool);
                return Ok(tool);
            }
            log::debug!("Compose tool not available: {}", tool);
        }

        Err(ExecutionError::ComposeNotFound)
    }

    /// Check whether `<tool> --version` succeeds
    fn probe(&self) -> bool {
        let Some((program, args)) = self.argv.split_first() else {
            return false;
        };

        StdCommand::new(program)
            .args(args)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Program and leading arguments
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Full argument vector for running the tool with `args`
    pub fn invocation<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv
            .iter()
            .cloned()
            .chain(args.into_iter().map(Into::into))
            .collect()
    }
}

impl fmt::Display for ComposeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// A named zero-argument operation
pub type ActionFunc = Box<dyn Fn() -> anyhow::Result<()>>;

/// Registry of named actions
///
/// Built by the caller and handed to the runner, so each run sees exactly
/// the actions it was given.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionFunc>,
}

impl ActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the compose up/down/stop actions under their
    /// `compose-*`, `docker-compose-*` and `podman-compose-*` names
    pub fn with_compose_actions() -> Self {
        let mut registry = Self::new();

        for (verb, args) in [
            ("up", &["up", "-d"][..]),
            ("down", &["down"][..]),
            ("stop", &["stop"][..]),
        ] {
            for prefix in ["compose", "docker-compose", "podman-compose"] {
                registry.register(format!("{}-{}", prefix, verb), compose_with_arguments(args));
            }
        }

        registry
    }

    /// Register an action, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, action: ActionFunc) {
        self.actions.insert(name.into(), action);
    }

    /// Whether an action with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered action names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run an action by name
    pub fn run(&self, name: &str) -> anyhow::Result<()> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown action: {}", name))?;
        action()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

/// Action that runs the detected compose tool with a fixed argument tail
pub fn compose_with_arguments(args: &[&str]) -> ActionFunc {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    Box::new(move || -> anyhow::Result<()> {
        let tool = ComposeTool::detect()?;
        let argv = tool.invocation(args.iter().cloned());
        log::debug!("Running compose action: {}", argv.join(" "));
        crate::runner::shell::run_argv(&argv)?;
        Ok(())
    })
}
