//! Main CLI application

use crate::cli::env::{actions_dir, init_logging, is_outside_container};
use crate::config::{discover_commands, Discovery, NamedCommand};
use crate::error::Error;
use crate::runner::{RunOutcome, Runner};
use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Name used when the program name cannot be derived from `argv[0]`
const DEFAULT_PROGRAM_NAME: &str = "project-actions";

/// Hidden subcommand printing shell completions
const COMPLETION_SUBCOMMAND: &str = "completion";

/// Subcommand names the CLI defines itself; clap adds `help`
const RESERVED_NAMES: &[&str] = &[COMPLETION_SUBCOMMAND, "help"];

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Commands discovered in the actions directory
    discovery: Discovery,
    /// Whether we are running on the host
    is_outside_container: bool,
}

impl App {
    /// Create a new app from the environment
    pub fn new(program_name: String) -> Self {
        Self::with_actions_dir(program_name, &actions_dir(), is_outside_container())
    }

    /// Create an app for a specific actions directory
    pub fn with_actions_dir(program_name: String, dir: &Path, is_outside_container: bool) -> Self {
        log::debug!("Loading commands from {}", dir.display());
        let discovery = discover_commands(dir);
        let command = build_command(program_name, &discovery);

        App {
            command,
            discovery,
            is_outside_container,
        }
    }

    /// Discovered commands, in listing order
    pub fn commands(&self) -> &[NamedCommand] {
        &self.discovery.commands
    }

    /// Run the application with command line arguments
    pub fn run<I, T>(mut self, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        let (name, sub_matches) = match matches.subcommand() {
            Some(subcommand) => subcommand,
            None => {
                // No command specified, show help
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        if name == COMPLETION_SUBCOMMAND {
            if let Some(shell) = sub_matches.get_one::<Shell>("shell").copied() {
                let bin_name = self.command.get_name().to_string();
                clap_complete::generate(shell, &mut self.command, bin_name, &mut io::stdout());
            }
            return Ok(());
        }

        let command = self
            .discovery
            .get(name)
            .ok_or_else(|| Error::CommandNotFound(name.to_string()))?;

        let runner = Runner::new(self.is_outside_container);
        if runner.run_command(&command.name, &command.definition)? == RunOutcome::Refused {
            log::debug!("Command '{}' refused in this environment", command.name);
        }

        Ok(())
    }
}

/// Build the clap command from discovered commands
fn build_command(program_name: String, discovery: &Discovery) -> Command {
    let mut cmd = Command::new(program_name)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Project Actions Command Runner")
        .long_about(
            "Project Actions Command Runner\n\n\
             Runs the commands defined as YAML files in the project actions directory.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase output verbosity")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new(COMPLETION_SUBCOMMAND)
                .about("Generate shell completions")
                .hide(true)
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        );

    // Add subcommands in listing order
    for named in &discovery.commands {
        if RESERVED_NAMES.contains(&named.name.as_str()) {
            log::warn!("Command '{}' is reserved and was skipped", named.name);
            continue;
        }

        let help = &named.definition.help;
        let mut sub = Command::new(named.name.clone()).about(help.short.clone());

        if !help.long.is_empty() {
            sub = sub.long_about(help.long.clone());
        }

        cmd = cmd.subcommand(sub);
    }

    cmd
}

/// Program name from `argv[0]`, without any leading path
fn program_name(args: &[OsString]) -> String {
    args.first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PROGRAM_NAME)
        .to_string()
}

/// Check for the verbose flag before clap parsing, so discovery can log
fn extract_verbose_flag(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .any(|arg| arg == "-v" || arg == "--verbose")
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), Error> {
    let args: Vec<OsString> = std::env::args_os().collect();
    init_logging(extract_verbose_flag(&args));

    App::new(program_name(&args)).run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COMMANDS_SUBDIR;
    use std::fs;
    use tempfile::TempDir;

    fn actions_dir_with(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let commands_dir = temp_dir.path().join(COMMANDS_SUBDIR);
        fs::create_dir_all(&commands_dir).unwrap();
        for (name, content) in files {
            fs::write(commands_dir.join(name), content).unwrap();
        }
        temp_dir
    }

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_program_name_strips_path() {
        assert_eq!(program_name(&os_args(&["/usr/local/bin/pa"])), "pa");
        assert_eq!(program_name(&os_args(&["project-actions"])), "project-actions");
        assert_eq!(program_name(&[]), DEFAULT_PROGRAM_NAME);
    }

    #[test]
    fn test_extract_verbose_flag() {
        assert!(extract_verbose_flag(&os_args(&["pa", "-v", "up"])));
        assert!(extract_verbose_flag(&os_args(&["pa", "up", "--verbose"])));
        assert!(!extract_verbose_flag(&os_args(&["pa", "up"])));
        assert!(!extract_verbose_flag(&os_args(&["-v"])));
        assert!(!extract_verbose_flag(&os_args(&["pa", "up", "--", "-v"])));
    }

    #[test]
    fn test_subcommands_follow_order() {
        let dir = actions_dir_with(&[
            ("down.yml", "help:\n  short: Stop it\n  order: 2\n"),
            ("up.yml", "help:\n  short: Start it\n  long: Starts everything\n  order: 1\n"),
        ]);

        let app = App::with_actions_dir("pa".to_string(), dir.path(), true);
        let names: Vec<&str> = app
            .command
            .get_subcommands()
            .map(|c| c.get_name())
            .filter(|name| *name != COMPLETION_SUBCOMMAND)
            .collect();
        assert_eq!(names, vec!["up", "down"]);

        let up = app.command.find_subcommand("up").unwrap();
        assert_eq!(up.get_about().map(|s| s.to_string()), Some("Start it".to_string()));
        assert_eq!(
            up.get_long_about().map(|s| s.to_string()),
            Some("Starts everything".to_string())
        );
        assert!(app.command.find_subcommand("down").unwrap().get_long_about().is_none());
    }

    #[test]
    fn test_reserved_name_skipped() {
        let dir = actions_dir_with(&[
            ("completion.yml", "steps:\n  - echo: hi\n"),
            ("help.yml", "steps:\n  - echo: from help file\n"),
            ("up.yml", "steps:\n  - echo: up\n"),
        ]);
        let app = App::with_actions_dir("pa".to_string(), dir.path(), true);

        // Panics on duplicated subcommand names
        app.command.clone().debug_assert();

        let completion = app.command.find_subcommand(COMPLETION_SUBCOMMAND).unwrap();
        assert!(completion.is_hide_set());
        assert!(app.command.find_subcommand("help").is_none());
        assert!(app.command.find_subcommand("up").is_some());
        assert_eq!(app.commands().len(), 3);
    }

    #[test]
    fn test_same_stem_registers_one_subcommand() {
        let dir = actions_dir_with(&[
            ("up.yml", "steps:\n  - echo: yml\n"),
            ("up.yaml", "steps:\n  - echo: yaml\n"),
        ]);
        let app = App::with_actions_dir("pa".to_string(), dir.path(), true);

        app.command.clone().debug_assert();

        let names: Vec<&str> = app.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["up"]);
        assert!(app.run(["pa", "up"]).is_ok());
    }

    #[test]
    fn test_run_selected_command() {
        let dir = actions_dir_with(&[("hello.yml", "steps:\n  - run: echo hi\n  - echo: Hello World\n")]);
        let app = App::with_actions_dir("pa".to_string(), dir.path(), true);
        assert!(app.run(["pa", "hello"]).is_ok());
    }

    #[test]
    fn test_run_failing_command() {
        let dir = actions_dir_with(&[("fail.yml", "steps:\n  - run: exit 4\n")]);
        let app = App::with_actions_dir("pa".to_string(), dir.path(), true);
        assert!(matches!(app.run(["pa", "fail"]), Err(Error::Execution(_))));
    }

    #[test]
    fn test_run_refused_command_succeeds() {
        let dir = actions_dir_with(&[(
            "up.yml",
            "context: outside-container\nsteps:\n  - run: exit 1\n",
        )]);
        let app = App::with_actions_dir("pa".to_string(), dir.path(), false);
        assert!(app.run(["pa", "up"]).is_ok());
    }
}
