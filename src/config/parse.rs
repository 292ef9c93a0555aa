//! Command file parsing and discovery

use crate::config::types::{CommandDefinition, NamedCommand};
use crate::error::{ParseError, ParseResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as command files
const COMMAND_FILE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Subdirectory of the actions directory holding the command files
pub const COMMANDS_SUBDIR: &str = "commands";

/// Parse a command file from a path
pub fn parse_command_file(path: &Path) -> ParseResult<CommandDefinition> {
    let contents = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_command(&contents).map_err(|e| match e {
        ParseError::Invalid(source) => ParseError::Yaml {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse a command definition from a string
pub fn parse_command(yaml: &str) -> ParseResult<CommandDefinition> {
    // An empty file is a command with no help and no steps
    if yaml.trim().is_empty() {
        return Ok(CommandDefinition::default());
    }

    Ok(serde_yaml::from_str(yaml)?)
}

/// Result of scanning an actions directory
#[derive(Debug, Default)]
pub struct Discovery {
    /// Parsed commands, sorted by `help.order`
    pub commands: Vec<NamedCommand>,

    /// Files that could not be parsed or whose name was already taken
    pub failures: Vec<ParseError>,
}

impl Discovery {
    /// Look up a command by name
    pub fn get(&self, name: &str) -> Option<&NamedCommand> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// Discover all command files under `<actions_dir>/commands`
///
/// A missing directory yields an empty discovery. A file that fails to
/// parse, or whose stem names an already discovered command, is recorded
/// in [`Discovery::failures`] and the scan goes on.
pub fn discover_commands(actions_dir: &Path) -> Discovery {
    let commands_dir = actions_dir.join(COMMANDS_SUBDIR);
    let mut discovery = Discovery::default();
    let mut sources: HashMap<String, PathBuf> = HashMap::new();

    for path in command_files(&commands_dir) {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let definition = match parse_command_file(&path) {
            Ok(definition) => definition,
            Err(e) => {
                log::warn!("Skipping command file: {}", e);
                discovery.failures.push(e);
                continue;
            }
        };

        // `up.yml` and `up.yaml` both name `up`; the first parsed file wins
        if let Some(kept) = sources.get(name) {
            let e = ParseError::Duplicate {
                name: name.to_string(),
                path: path.clone(),
                kept: kept.clone(),
            };
            log::warn!("Skipping command file: {}", e);
            discovery.failures.push(e);
            continue;
        }

        log::debug!("Discovered command '{}' from {}", name, path.display());
        sources.insert(name.to_string(), path.clone());
        discovery.commands.push(NamedCommand {
            name: name.to_string(),
            definition,
        });
    }

    // Stable sort: ties keep file-name order
    discovery
        .commands
        .sort_by_key(|c| c.definition.help.order);

    discovery
}

/// List the command files in a directory, sorted by file name
fn command_files(commands_dir: &Path) -> Vec<PathBuf> {
    let Some(dir) = commands_dir.to_str() else {
        log::warn!("Commands directory is not valid UTF-8: {}", commands_dir.display());
        return Vec::new();
    };
    let dir = glob::Pattern::escape(dir);

    let mut files = Vec::new();

    for ext in COMMAND_FILE_EXTENSIONS {
        let entries = match glob::glob(&format!("{}/*.{}", dir, ext)) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Invalid commands directory pattern: {}", e);
                return Vec::new();
            }
        };

        files.extend(entries.filter_map(|entry| entry.ok()).filter(|p| p.is_file()));
    }

    files.sort();
    files
}
