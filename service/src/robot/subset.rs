//! Subsets of an ontology below one term

use super::command::{CommandExecutor, RobotCommand, RobotVerb};
use super::{Robot, path_arg, shell_quote_if_needed};
use ontosheets_core::error::Result;
use std::path::PathBuf;
use tracing::info;

/// Inputs of a subset extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetRequest {
    /// Ontology to extract from
    pub input: PathBuf,
    /// OWL file, or table when `export_headers` is set
    pub output: PathBuf,
    /// Term the extracted branch starts from
    pub root_id: String,
    /// `--prefix` argument
    pub id_prefix: String,
    /// `|`-separated column headers of an exported table
    pub export_headers: Option<String>,
    /// Sort column of an exported table
    pub export_sort: Option<String>,
}

impl<E: CommandExecutor> Robot<E> {
    /// Command line of a subset extraction
    #[must_use]
    pub fn subset_command(&self, request: &SubsetRequest) -> RobotCommand {
        let prefix = shell_quote_if_needed(&request.id_prefix);
        let command = self
            .command()
            .verb(RobotVerb::Merge)
            .arg("--input", path_arg(&request.input))
            .verb(RobotVerb::Extract)
            .arg("--method", "MIREOT")
            .arg("--prefix", prefix.as_str())
            .arg("--annotate-with-source", "true")
            .arg("--branch-from-term", request.root_id.as_str())
            .arg("--intermediates", "all");

        match request.export_headers.as_deref().filter(|h| !h.is_empty()) {
            Some(headers) => command
                .verb(RobotVerb::Export)
                .quoted_arg("--header", headers)
                .arg("--prefix", prefix.as_str())
                .quoted_arg("--split", "; ")
                .arg("--export", path_arg(&request.output))
                .optional_arg(
                    "--sort",
                    request
                        .export_sort
                        .as_deref()
                        .filter(|s| !s.is_empty())
                        .map(|s| format!("\"{s}\""))
                        .as_deref(),
                ),
            None => command.arg("--output", path_arg(&request.output)),
        }
    }

    /// Extract the branch below a term, as OWL or as an exported table.
    /// Returns ROBOT's output.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started.
    pub fn create_subset(&self, request: &SubsetRequest) -> Result<String> {
        let output = self.run(&self.subset_command(request))?;
        info!(
            "Extracted subset from '{}' below '{}' into '{}'",
            request.input.display(),
            request.root_id,
            request.output.display()
        );
        Ok(output)
    }
}
