//! ROBOT command lines and their execution
//!
//! ROBOT chains verbs on one command line, each verb followed by its own
//! options: `robot merge --input a.owl extract --method MIREOT ...`. Commands
//! are handed to a [`CommandExecutor`] as one shell string.

use ontosheets_core::error::{OntoError, Result};
use std::fmt;
use std::process::Command;
use tracing::{debug, info, warn};

/// ROBOT subcommands used by the wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotVerb {
    /// Merge input ontologies
    Merge,
    /// Extract a module
    Extract,
    /// Build an ontology from a template
    Template,
    /// Annotate the ontology header
    Annotate,
    /// Remove axioms
    Remove,
    /// Convert between formats
    Convert,
    /// Export a table
    Export,
}

impl RobotVerb {
    /// Verb as written on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Extract => "extract",
            Self::Template => "template",
            Self::Annotate => "annotate",
            Self::Remove => "remove",
            Self::Convert => "convert",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for RobotVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ROBOT invocation under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotCommand {
    program: String,
    args: Vec<String>,
}

impl RobotCommand {
    /// Start a command line for the ROBOT program
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a verb
    #[must_use]
    pub fn verb(mut self, verb: RobotVerb) -> Self {
        self.args.push(verb.as_str().to_string());
        self
    }

    /// Append an option and its value
    #[must_use]
    pub fn arg(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    /// Append an option without a value
    #[must_use]
    pub fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.to_string());
        self
    }

    /// Append an option whose value is double-quoted for the shell
    #[must_use]
    pub fn quoted_arg(self, flag: &str, value: &str) -> Self {
        self.arg(flag, format!("\"{value}\""))
    }

    /// Append an option once per value
    #[must_use]
    pub fn repeated_arg<I, S>(mut self, flag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.arg(flag, value);
        }
        self
    }

    /// Append an option only when a value is present
    #[must_use]
    pub fn optional_arg(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.arg(flag, value),
            None => self,
        }
    }

    /// Program followed by every argument
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Single space-joined command line
    #[must_use]
    pub fn to_command_string(&self) -> String {
        self.parts().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_string())
    }
}

/// Runs command lines
pub trait CommandExecutor: Send + Sync {
    /// Run a command line and return its combined output
    ///
    /// # Errors
    ///
    /// Returns `OntoError::CommandError` when the command cannot be started.
    fn execute(&self, command: &str) -> Result<String>;
}

/// Runs command lines through `sh -c`
///
/// The combined output is logged at info. A non-zero exit status is logged
/// as a warning together with the output, not returned as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<String> {
        debug!("Executing command: {command}");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| OntoError::command(command, e.to_string()))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            warn!(
                "Command '{command}' exited with {}:\n{}",
                output.status,
                text.trim_end()
            );
        } else if !text.trim().is_empty() {
            info!("{}", text.trim_end());
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_string() {
        let command = RobotCommand::new("robot")
            .verb(RobotVerb::Merge)
            .quoted_arg("--input", "temp/bfo.owl")
            .verb(RobotVerb::Extract)
            .arg("--method", "MIREOT")
            .optional_arg("--prefix", None)
            .repeated_arg("--lower-term", ["BFO:1", "BFO:2"]);

        assert_eq!(
            command.to_command_string(),
            "robot merge --input \"temp/bfo.owl\" extract --method MIREOT \
             --lower-term BFO:1 --lower-term BFO:2"
        );
        assert_eq!(command.to_string(), command.to_command_string());
    }

    #[test]
    fn test_shell_executor_captures_output() {
        let output = ShellExecutor.execute("echo out; echo err 1>&2").unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[test]
    fn test_shell_executor_non_zero_exit_is_not_an_error() {
        let output = ShellExecutor.execute("echo failing; exit 3").unwrap();
        assert!(output.contains("failing"));
    }
}
