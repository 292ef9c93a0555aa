//! Command execution
//!
//! Resolves a command's context and dispatches its steps in order.

use crate::config::{CommandDefinition, Step, StepKind};
use crate::error::ExecutionResult;
use crate::runner::{
    resolve_context, run_in_context, ActionRegistry, ComposeTool, ExecutionContext, Resolution,
    COMPOSE_CANDIDATES,
};
use colored::Colorize;

/// How a command invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All steps were dispatched
    Completed,

    /// The command does not apply here; no step ran
    Refused,
}

/// Runs command definitions
#[derive(Debug)]
pub struct Runner {
    /// Whether we are running on the host rather than in a container
    is_outside_container: bool,

    /// Known actions
    actions: ActionRegistry,

    /// Compose tool for container contexts; detected on demand when unset
    compose: Option<ComposeTool>,

    /// Compose invocations tried when detecting
    compose_candidates: Vec<Vec<String>>,
}

impl Runner {
    /// Create a runner with the default compose actions
    pub fn new(is_outside_container: bool) -> Self {
        Runner {
            is_outside_container,
            actions: ActionRegistry::with_compose_actions(),
            compose: None,
            compose_candidates: COMPOSE_CANDIDATES
                .iter()
                .map(|argv| argv.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    /// Replace the action registry
    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Use a fixed compose tool instead of detecting one
    pub fn with_compose_tool(mut self, compose: ComposeTool) -> Self {
        self.compose = Some(compose);
        self
    }

    /// Replace the compose invocations tried during detection
    pub fn with_compose_candidates(mut self, candidates: Vec<Vec<String>>) -> Self {
        self.compose_candidates = candidates;
        self
    }

    /// Run a command
    ///
    /// A refusal is reported and is not an error. The first failing `run`
    /// step stops the command and its error is returned.
    pub fn run_command(&self, name: &str, command: &CommandDefinition) -> ExecutionResult<RunOutcome> {
        let context = match resolve_context(&command.context, self.is_outside_container)? {
            Resolution::Refuse => {
                println!("{}", format!("{} must be run outside a container", name).yellow());
                return Ok(RunOutcome::Refused);
            }
            Resolution::Run(context) => context,
        };

        log::debug!("Running command '{}' in {}", name, context);

        // Detected at the first `run` step, then reused
        let mut compose = None;

        for (index, step) in command.steps.iter().enumerate() {
            self.run_step(index, step, &context, &mut compose)?;
        }

        log::debug!("Command '{}' completed", name);
        Ok(RunOutcome::Completed)
    }

    fn run_step(
        &self,
        index: usize,
        step: &Step,
        context: &ExecutionContext,
        compose: &mut Option<ComposeTool>,
    ) -> ExecutionResult<()> {
        let Some(kind) = step.kind() else {
            log::debug!("Step {} is empty, skipping", index + 1);
            return Ok(());
        };

        log::debug!("Step {}: {:?}", index + 1, kind);

        match kind {
            StepKind::Action(name) => {
                if !self.actions.contains(name) {
                    log::debug!("Action '{}' is not registered", name);
                }
                println!("{} {}", "Action not implemented yet:".yellow(), name);
            }
            StepKind::Run(snippet) => {
                if matches!(context, ExecutionContext::ContainerService(_)) && compose.is_none() {
                    *compose = Some(self.compose_tool()?);
                }
                run_in_context(snippet, context, compose.as_ref())?;
            }
            StepKind::Echo(text) => println!("{}", text),
            StepKind::Command(name) => {
                println!(
                    "{} {}",
                    "Calling other commands is not implemented yet:".yellow(),
                    name
                );
            }
        }

        Ok(())
    }

    fn compose_tool(&self) -> ExecutionResult<ComposeTool> {
        match &self.compose {
            Some(compose) => Ok(compose.clone()),
            None => {
                let argvs: Vec<Vec<&str>> = self
                    .compose_candidates
                    .iter()
                    .map(|argv| argv.iter().map(String::as_str).collect())
                    .collect();
                let candidates: Vec<&[&str]> = argvs.iter().map(Vec::as_slice).collect();
                ComposeTool::detect_from(&candidates)
            }
        }
    }
}

/// Run a command with the default runner
pub fn run_command(
    name: &str,
    command: &CommandDefinition,
    is_outside_container: bool,
) -> ExecutionResult<()> {
    Runner::new(is_outside_container).run_command(name, command)?;
    Ok(())
}
