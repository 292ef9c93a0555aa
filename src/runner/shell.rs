//! Shell invocation
//!
//! Runs a step's shell snippet either locally or inside a compose service,
//! with the child's stdio attached to ours.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{ComposeTool, ExecutionContext};
use std::process::{Command as StdCommand, Stdio};

/// Shell used for every snippet, locally and inside containers
pub const SHELL: &[&str] = &["sh", "-c"];

/// Build the argument vector that runs `snippet` in `context`
///
/// `compose` is only consulted for [`ExecutionContext::ContainerService`].
pub fn build_invocation(
    snippet: &str,
    context: &ExecutionContext,
    compose: Option<&ComposeTool>,
) -> ExecutionResult<Vec<String>> {
    let shell = SHELL.iter().map(|s| s.to_string()).chain([snippet.to_string()]);

    match context {
        ExecutionContext::Shell => Ok(shell.collect()),
        ExecutionContext::ContainerService(service) => {
            let compose = compose.ok_or(ExecutionError::ComposeNotFound)?;
            Ok(compose.invocation(
                ["exec".to_string(), service.clone()].into_iter().chain(shell),
            ))
        }
    }
}

/// Run `snippet` in `context`, streaming its output
pub fn run_in_context(
    snippet: &str,
    context: &ExecutionContext,
    compose: Option<&ComposeTool>,
) -> ExecutionResult<()> {
    let argv = build_invocation(snippet, context, compose)?;
    run_argv(&argv)
}

/// Run an argument vector with inherited stdio and fail on non-zero exit
pub fn run_argv(argv: &[String]) -> ExecutionResult<()> {
    let Some((program, args)) = argv.split_first() else {
        return Err(ExecutionError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    log::debug!("Executing: {:?}", argv);

    let status = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ExecutionError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            command: argv.join(" "),
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_invocation() {
        let argv = build_invocation("echo hi", &ExecutionContext::Shell, None).unwrap();
        assert_eq!(argv, vec!["sh", "-c", "echo hi"]);
    }

    #[test]
    fn test_shell_invocation_ignores_compose() {
        let compose = ComposeTool::new(["docker", "compose"]);
        let argv = build_invocation("ls", &ExecutionContext::Shell, Some(&compose)).unwrap();
        assert_eq!(argv, vec!["sh", "-c", "ls"]);
    }

    #[test]
    fn test_container_invocation() {
        let compose = ComposeTool::new(["docker-compose"]);
        let context = ExecutionContext::ContainerService("svcX".to_string());

        let argv = build_invocation("make test", &context, Some(&compose)).unwrap();
        assert_eq!(
            argv,
            vec!["docker-compose", "exec", "svcX", "sh", "-c", "make test"]
        );
    }

    #[test]
    fn test_container_invocation_without_compose() {
        let context = ExecutionContext::ContainerService("app".to_string());
        let result = build_invocation("ls", &context, None);
        assert!(matches!(result, Err(ExecutionError::ComposeNotFound)));
    }

    #[test]
    fn test_run_simple_snippet() {
        assert!(run_in_context("echo test", &ExecutionContext::Shell, None).is_ok());
    }

    #[test]
    fn test_run_failing_snippet() {
        let result = run_in_context("exit 3", &ExecutionContext::Shell, None);
        match result {
            Err(ExecutionError::CommandFailed { code, command }) => {
                assert_eq!(code, Some(3));
                assert_eq!(command, "sh -c exit 3");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_run_missing_program() {
        let argv = vec!["definitely-not-a-real-program".to_string()];
        assert!(matches!(
            run_argv(&argv),
            Err(ExecutionError::Spawn { .. })
        ));
    }

    #[test]
    fn test_run_empty_argv() {
        assert!(matches!(run_argv(&[]), Err(ExecutionError::Spawn { .. })));
    }

    #[test]
    fn test_container_run_uses_compose_tool() {
        // `sh -c 'exit 0' exec svc sh -c ...` stands in for a compose tool
        let compose = ComposeTool::new(["sh", "-c", "exit 0"]);
        let context = ExecutionContext::ContainerService("svc".to_string());
        assert!(run_in_context("exit 1", &context, Some(&compose)).is_ok());
    }
}
