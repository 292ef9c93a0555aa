//! Core command definition types
//!
//! This module defines the data structures that represent a single command
//! file, e.g. `project/commands/up.yml`.

use serde::{Deserialize, Deserializer, Serialize};

/// A parsed command file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandDefinition {
    /// Help text and listing order
    #[serde(deserialize_with = "null_as_default")]
    pub help: Help,

    /// Where the steps run, e.g. `inside-container:app`
    #[serde(deserialize_with = "null_as_default")]
    pub context: String,

    /// Steps to execute, in file order
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
}

/// Help metadata shown by the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Help {
    /// Shown on the command list screen
    #[serde(deserialize_with = "null_as_default")]
    pub short: String,

    /// Shown on the command help screen
    #[serde(deserialize_with = "null_as_default")]
    pub long: String,

    /// Sort key for the command list
    #[serde(deserialize_with = "null_as_default")]
    pub order: i64,
}

/// A single step of a command
///
/// Only one field is expected per step. When a file sets several, the first
/// of `action`, `run`, `echo`, `command` wins (see [`Step::kind`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Step {
    /// Named built-in action (e.g. `compose-up`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Shell snippet to execute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    /// Literal text to print
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,

    /// Another command to call by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// The behavior a step selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind<'a> {
    Action(&'a str),
    Run(&'a str),
    Echo(&'a str),
    Command(&'a str),
}

impl Step {
    /// Create a `run` step
    pub fn run(snippet: impl Into<String>) -> Self {
        Step {
            run: Some(snippet.into()),
            ..Default::default()
        }
    }

    /// Create an `echo` step
    pub fn echo(text: impl Into<String>) -> Self {
        Step {
            echo: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create an `action` step
    pub fn action(name: impl Into<String>) -> Self {
        Step {
            action: Some(name.into()),
            ..Default::default()
        }
    }

    /// Create a `command` step
    pub fn command(name: impl Into<String>) -> Self {
        Step {
            command: Some(name.into()),
            ..Default::default()
        }
    }

    /// The kind this step dispatches to, or `None` for an empty step
    pub fn kind(&self) -> Option<StepKind<'_>> {
        if let Some(name) = &self.action {
            return Some(StepKind::Action(name));
        }
        if let Some(snippet) = &self.run {
            return Some(StepKind::Run(snippet));
        }
        if let Some(text) = &self.echo {
            return Some(StepKind::Echo(text));
        }
        self.command.as_deref().map(StepKind::Command)
    }
}

/// A command definition together with the name it is invoked by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCommand {
    pub name: String,
    pub definition: CommandDefinition,
}

/// Treat an explicit YAML `null` (e.g. `steps:` with nothing after it) like
/// a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
