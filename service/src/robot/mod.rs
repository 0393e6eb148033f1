//! ROBOT invocation
//!
//! [`Robot`] pairs the configured ROBOT command with a [`CommandExecutor`].
//! The submodules add the template build, import handling and subset
//! extraction on top of it.

pub mod command;
pub mod imports;
pub mod subset;
pub mod template;

pub use command::{CommandExecutor, RobotCommand, RobotVerb, ShellExecutor};
pub use imports::{import_from_row, imports_from_rows, read_imports};
pub use subset::SubsetRequest;
pub use template::{IMPORTS_FILE, TemplateBuild, imports_document, parse_dependencies};

use ontosheets_core::RobotConfig;
use ontosheets_core::error::Result;
use std::path::Path;

/// Wrap a value in double quotes for the shell when it contains whitespace
#[must_use]
pub fn shell_quote_if_needed(value: &str) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if !already_quoted && value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Path as a command line argument
#[must_use]
pub fn path_arg(path: &Path) -> String {
    shell_quote_if_needed(&path.display().to_string())
}

/// ROBOT with its settings and executor
#[derive(Debug, Clone)]
pub struct Robot<E: CommandExecutor = ShellExecutor> {
    config: RobotConfig,
    executor: E,
}

impl Robot<ShellExecutor> {
    /// ROBOT run through the shell
    #[must_use]
    pub fn new(config: &RobotConfig) -> Self {
        Self::with_executor(config, ShellExecutor)
    }
}

impl<E: CommandExecutor> Robot<E> {
    /// ROBOT run through a custom executor
    pub fn with_executor(config: &RobotConfig, executor: E) -> Self {
        Self {
            config: config.clone(),
            executor,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Executor in use
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Empty command line for the configured program
    #[must_use]
    pub fn command(&self) -> RobotCommand {
        RobotCommand::new(self.config.command.as_str())
    }

    /// Run a command line
    ///
    /// # Errors
    ///
    /// Returns the executor's error when the command cannot be started.
    pub fn run(&self, command: &RobotCommand) -> Result<String> {
        self.executor.execute(&command.to_command_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::CommandExecutor;
    use ontosheets_core::error::Result;
    use std::sync::Mutex;

    /// Records command lines instead of running them
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        pub commands: Mutex<Vec<String>>,
    }

    impl RecordingExecutor {
        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, command: &str) -> Result<String> {
            self.commands.lock().unwrap().push(command.to_string());
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_if_needed() {
        assert_eq!(shell_quote_if_needed("a.owl"), "a.owl");
        assert_eq!(shell_quote_if_needed("my file.owl"), "\"my file.owl\"");
        assert_eq!(shell_quote_if_needed("\"quoted value\""), "\"quoted value\"");
    }

    #[test]
    fn test_run_uses_configured_program() {
        let config = RobotConfig {
            command: "/opt/robot/robot".to_string(),
            ..RobotConfig::default()
        };
        let robot = Robot::with_executor(&config, testing::RecordingExecutor::default());
        robot
            .run(&robot.command().verb(RobotVerb::Convert))
            .unwrap();
        assert_eq!(robot.executor().commands(), vec!["/opt/robot/robot convert"]);
    }
}
