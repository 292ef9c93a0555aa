//! Error types for project-actions

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for project-actions operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Command file parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A subcommand with no matching command definition
    #[error("Command '{0}' is not defined")]
    CommandNotFound(String),
}

/// Errors raised while reading or deserializing a command file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid command file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Command '{name}' from '{path}' is already defined by '{kept}'")]
    Duplicate {
        name: String,
        path: PathBuf,
        kept: PathBuf,
    },

    #[error("Invalid command definition: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

/// Errors raised while running a command
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// An `inside-container` context without a service, evaluated outside a container
    #[error("Context '{0}' does not have a service specified (expected 'inside-container:<service>')")]
    MissingService(String),

    #[error("Command `{command}` {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("No compose tool found (tried: docker compose, docker-compose, podman compose, podman-compose)")]
    ComposeNotFound,
}

/// How a failed child process ended, for error messages
fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("failed with exit code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Specialized result type for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
