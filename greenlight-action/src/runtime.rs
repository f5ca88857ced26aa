//! Workflow runtime
//!
//! Talks to the GitHub Actions runner through its file and stdout workflow
//! commands: step outputs, saved state shared between the pre and post
//! phases of an action, and log annotations.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Environment prefix under which the runner exposes saved state
const STATE_ENV_PREFIX: &str = "STATE_";

/// Handle on the runner's workflow command channels
#[derive(Debug, Clone, Default)]
pub struct WorkflowRuntime {
    /// File behind `GITHUB_OUTPUT`
    output_file: Option<PathBuf>,

    /// File behind `GITHUB_STATE`
    state_file: Option<PathBuf>,

    /// State saved by an earlier phase of this action
    state: HashMap<String, String>,
}

impl WorkflowRuntime {
    /// Creates a runtime writing to the given command files
    ///
    /// When a file is `None`, the matching stdout workflow command is used
    /// instead.
    pub fn new(output_file: Option<PathBuf>, state_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            state_file,
            state: HashMap::new(),
        }
    }

    /// Creates a runtime from the runner's environment
    pub fn from_env() -> Self {
        let file_from_env = |name: &str| {
            std::env::var_os(name)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        let state = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(STATE_ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect();

        Self {
            state,
            ..Self::new(file_from_env("GITHUB_OUTPUT"), file_from_env("GITHUB_STATE"))
        }
    }

    /// Adds a saved state value, as if an earlier phase had saved it
    #[cfg(test)]
    pub fn with_state(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.state.insert(name.into(), value.into());
        self
    }

    /// Returns a state value saved by an earlier phase
    ///
    /// Empty values count as unset.
    pub fn get_state(&self, name: &str) -> Option<&str> {
        self.state
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Saves a state value for later phases of this action
    pub fn save_state(&self, name: &str, value: &str) -> io::Result<()> {
        match &self.state_file {
            Some(path) => append_file_command(path, name, value),
            None => {
                issue_command("save-state", &[("name", name)], value);
                Ok(())
            }
        }
    }

    /// Sets a step output
    pub fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        match &self.output_file {
            Some(path) => append_file_command(path, name, value),
            None => {
                issue_command("set-output", &[("name", name)], value);
                Ok(())
            }
        }
    }
}

/// Emits a warning annotation
pub fn warning(message: &str) {
    issue_command("warning", &[], message);
}

/// Emits an error annotation
pub fn error(message: &str) {
    issue_command("error", &[], message);
}

/// Appends `name<<delimiter` heredoc syntax to a command file
fn append_file_command(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());

    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value of {:?} contains the command delimiter", name),
        ));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Prints a `::command key=value::message` line to stdout
fn issue_command(command: &str, properties: &[(&str, &str)], message: &str) {
    println!("{}", format_command(command, properties, message));
}

fn format_command(command: &str, properties: &[(&str, &str)], message: &str) -> String {
    let mut line = format!("::{}", command);

    if !properties.is_empty() {
        let props = properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, escape_property(value)))
            .collect::<Vec<_>>()
            .join(",");
        line.push(' ');
        line.push_str(&props);
    }

    line.push_str("::");
    line.push_str(&escape_data(message));
    line
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_file_commands(content: &str) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        let mut lines = content.lines();

        while let Some(header) = lines.next() {
            let (name, delimiter) = header.split_once("<<").unwrap();
            let mut value = Vec::new();
            for line in lines.by_ref() {
                if line == delimiter {
                    break;
                }
                value.push(line);
            }
            entries.push((name.to_string(), value.join("\n")));
        }

        entries
    }

    #[test]
    fn test_set_output_appends_heredoc_entries() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let runtime = WorkflowRuntime::new(Some(output.clone()), None);

        runtime
            .set_output("tarball_url", "https://example.test/tarball")
            .unwrap();
        runtime.set_output("notes", "line one\nline two").unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("ghadelimiter_"));
        assert_eq!(
            parse_file_commands(&content),
            vec![
                (
                    "tarball_url".to_string(),
                    "https://example.test/tarball".to_string()
                ),
                ("notes".to_string(), "line one\nline two".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_state_writes_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        let runtime = WorkflowRuntime::new(None, Some(state.clone()));

        runtime.save_state("isPost", "true").unwrap();

        let content = std::fs::read_to_string(&state).unwrap();
        assert_eq!(
            parse_file_commands(&content),
            vec![("isPost".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_get_state_ignores_empty_values() {
        let runtime = WorkflowRuntime::default()
            .with_state("isPost", "true")
            .with_state("other", "");

        assert_eq!(runtime.get_state("isPost"), Some("true"));
        assert_eq!(runtime.get_state("other"), None);
        assert_eq!(runtime.get_state("missing"), None);
    }

    #[test]
    fn test_format_command_escapes() {
        assert_eq!(
            format_command("warning", &[], "50% done\nnext"),
            "::warning::50%25 done%0Anext"
        );
        assert_eq!(
            format_command("set-output", &[("name", "a:b,c")], "value"),
            "::set-output name=a%3Ab%2Cc::value"
        );
    }
}
