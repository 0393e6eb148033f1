//! Ontosheets CLI application.

use super::types::{OntosheetsCli, OntosheetsCommand};
use crate::config::load_ontosheets_config;
use crate::robot::{Robot, SubsetRequest, TemplateBuild, parse_dependencies, read_imports};
use crate::sheet::WorkbookReader;
use crate::template::TemplateBuilder;
use clap::Parser;
use colored::Colorize;
use ontosheets_core::OntosheetsConfig;
use ontosheets_core::error::{OntoError, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Main ontosheets CLI application
pub struct OntosheetsApp {
    cli: OntosheetsCli,
}

impl OntosheetsApp {
    /// Create the application from the process arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self::new(OntosheetsCli::parse())
    }

    /// Create the application from parsed arguments
    #[must_use]
    pub fn new(cli: OntosheetsCli) -> Self {
        Self { cli }
    }

    /// Run the application
    ///
    /// # Errors
    ///
    /// Returns the error of the failed command.
    pub fn run(self) -> Result<()> {
        self.init_logging();
        info!("Starting ontosheets");

        match self.execute_command() {
            Ok(()) => {
                info!("Command completed successfully");
                Ok(())
            }
            Err(err) => {
                error!("Command failed: {}", err);
                if !self.cli.quiet {
                    eprintln!("{}: {err}", "Error".red());
                }
                Err(err)
            }
        }
    }

    /// Log level selected by the CLI flags
    fn log_level(&self) -> &'static str {
        if self.cli.quiet {
            "error"
        } else if self.cli.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Configure tracing subscriber based on CLI flags
    fn init_logging(&self) {
        // RUST_LOG overrides the flags
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    fn execute_command(&self) -> Result<()> {
        let config = load_ontosheets_config(self.cli.config.as_deref())?;

        match &self.cli.command {
            OntosheetsCommand::Template {
                inputs,
                output_dir,
                strict,
            } => self.template_command(&config, inputs, output_dir.as_deref(), *strict),
            OntosheetsCommand::Relations { input, output } => {
                self.relations_command(&config, input, output)
            }
            OntosheetsCommand::Export {
                classes,
                relations,
                lucidchart,
                id_column,
                output,
            } => self.export_command(
                &config,
                classes,
                relations.as_deref(),
                lucidchart.as_deref(),
                id_column.as_deref(),
                output,
            ),
            OntosheetsCommand::Build {
                template,
                output,
                ontology_iri,
                prefixes,
                dependencies,
                iri_prefix,
            } => {
                let build = TemplateBuild {
                    template: template.clone(),
                    dependencies: dependencies
                        .as_deref()
                        .map(parse_dependencies)
                        .unwrap_or_default(),
                    iri_prefix: iri_prefix.clone(),
                    id_prefixes: prefixes.clone(),
                    ontology_iri: ontology_iri.clone(),
                    output: output.clone(),
                };
                Robot::new(&config.robot).build_from_template(&build)?;
                self.report(&format!("Built '{}'", output.display()));
                Ok(())
            }
            OntosheetsCommand::Imports {
                input,
                merged_iri,
                name,
                output,
                additional_content,
                remove_metadata,
                obo,
            } => self.imports_command(
                &config,
                input,
                merged_iri,
                name,
                output,
                additional_content.as_deref(),
                remove_metadata.as_deref(),
                *obo,
            ),
            OntosheetsCommand::Subset {
                input,
                output,
                root,
                prefix,
                export_headers,
                sort,
            } => {
                let request = SubsetRequest {
                    input: input.clone(),
                    output: output.clone(),
                    root_id: root.clone(),
                    id_prefix: prefix.clone(),
                    export_headers: export_headers.clone(),
                    export_sort: sort.clone(),
                };
                Robot::new(&config.robot).create_subset(&request)?;
                self.report(&format!("Wrote subset below {root} to '{}'", output.display()));
                Ok(())
            }
        }
    }

    fn template_command(
        &self,
        config: &OntosheetsConfig,
        inputs: &[PathBuf],
        output_dir: Option<&Path>,
        strict: bool,
    ) -> Result<()> {
        let mut template_config = config.template.clone();
        template_config.strict_headers |= strict;

        let mut builder = TemplateBuilder::new(&template_config);
        for input in inputs {
            let csv_file = template_path(input, output_dir)?;
            let summary = builder.add_classes_from_excel(input, Some(&csv_file))?;
            if summary.skipped > 0 {
                warn!(
                    "Skipped {} rows without a label in '{}'",
                    summary.skipped,
                    input.display()
                );
            }
            self.report(&format!(
                "Wrote {} classes ({} obsolete) from '{}' to '{}'",
                summary.table.rows.len(),
                summary.obsolete,
                input.display(),
                csv_file.display()
            ));
        }
        Ok(())
    }

    fn relations_command(
        &self,
        config: &OntosheetsConfig,
        input: &Path,
        output: &Path,
    ) -> Result<()> {
        let mut builder = TemplateBuilder::new(&config.template);
        let count = builder.add_relations_from_excel(input)?;
        builder.write_relation_template(output)?;
        self.report(&format!(
            "Wrote {count} relations from '{}' to '{}'",
            input.display(),
            output.display()
        ));
        Ok(())
    }

    fn export_command(
        &self,
        config: &OntosheetsConfig,
        classes: &[PathBuf],
        relations: Option<&Path>,
        lucidchart: Option<&Path>,
        id_column: Option<&str>,
        output: &Path,
    ) -> Result<()> {
        let mut template_config = config.template.clone();
        if let Some(id_column) = id_column {
            template_config.id_column_name = id_column.to_string();
        }

        let mut builder = TemplateBuilder::new(&template_config);
        if let Some(relations) = relations {
            builder.add_relations_from_excel(relations)?;
        }
        for class_file in classes {
            builder.add_classes_from_excel(class_file, None)?;
        }
        if let Some(lucidchart) = lucidchart {
            let report = builder.merge_lucidchart(lucidchart)?;
            info!("Attached {} relation links from the diagram", report.attached);
        }

        builder.write_spreadsheet(output)?;
        self.report(&format!(
            "Wrote {} entities to '{}'",
            builder.store().len(),
            output.display()
        ));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn imports_command(
        &self,
        config: &OntosheetsConfig,
        input: &Path,
        merged_iri: &str,
        name: &str,
        output: &Path,
        additional_content: Option<&Path>,
        remove_metadata: Option<&Path>,
        obo: bool,
    ) -> Result<()> {
        let imports = read_imports(&WorkbookReader, input)?;
        if imports.is_empty() {
            return Err(OntoError::load(
                input.display().to_string(),
                "no complete import rows",
            ));
        }

        let robot = Robot::new(&config.robot);
        robot.process_imports(&imports, merged_iri, output, name)?;

        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        if let Some(template) = additional_content {
            robot.add_additional_content(template, merged_iri, dir)?;
        }
        if let Some(term_file) = remove_metadata {
            robot.remove_problem_metadata(output, term_file)?;
        }
        if obo {
            robot.create_obo_file(merged_iri, dir)?;
        }

        self.report(&format!(
            "Merged {} imports into '{}'",
            imports.len(),
            output.display()
        ));
        Ok(())
    }

    fn report(&self, message: &str) {
        if !self.cli.quiet {
            println!("{} {message}", "✓".green());
        }
    }
}

/// CSV template path of a class spreadsheet
fn template_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        OntoError::load(input.display().to_string(), "input path has no file name")
    })?;
    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    Ok(dir.join(format!("{}.csv", stem.to_string_lossy())))
}
