//! Imports from external ontologies
//!
//! The imports sheet lists one external ontology per row: ontology id, purl,
//! root term, `;`-separated imported terms, intermediates mode and an
//! optional prefix. Terms are written as `label [ID]`; only the id is used.
//!
//! Each ontology is downloaded into the download directory and a MIREOT slim
//! module is extracted from it; both steps run one task per import on a
//! bounded worker pool. The slims are then merged into one annotated
//! ontology.

use super::command::{CommandExecutor, RobotCommand, RobotVerb};
use super::{Robot, path_arg, shell_quote_if_needed};
use crate::sheet::{Row, SheetReader, cell};
use ontosheets_core::error::{OntoError, Result};
use ontosheets_core::utils::bracketed_id_or_value;
use ontosheets_core::{Intermediates, OntologyImport};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Import described by one imports sheet row
///
/// Rows without an ontology id or purl yield `None`.
#[must_use]
pub fn import_from_row(row: &Row) -> Option<OntologyImport> {
    let ontology_id = cell(row, 0)?.trim();
    let purl = cell(row, 1)?.trim();
    if ontology_id.is_empty() || purl.is_empty() {
        return None;
    }

    let imported_terms = cell(row, 3)
        .unwrap_or_default()
        .split(';')
        .map(bracketed_id_or_value)
        .filter(|term| !term.is_empty())
        .map(ToString::to_string)
        .collect();
    let short_name = purl.rsplit('/').next().unwrap_or(purl);

    Some(OntologyImport {
        ontology_id: ontology_id.to_string(),
        purl: purl.to_string(),
        root_id: bracketed_id_or_value(cell(row, 2).unwrap_or_default()).to_string(),
        imported_terms,
        intermediates: Intermediates::from_cell(cell(row, 4)),
        short_name: short_name.to_string(),
        prefix: cell(row, 5)
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(ToString::to_string),
    })
}

/// Imports of an imports sheet, header row excluded
#[must_use]
pub fn imports_from_rows(rows: &[Row]) -> Vec<OntologyImport> {
    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let import = import_from_row(row);
            if import.is_none() && row.iter().any(Option::is_some) {
                warn!("Skipping imports row without ontology id or purl: {row:?}");
            }
            import
        })
        .collect()
}

/// Read an imports workbook
///
/// # Errors
///
/// Returns `OntoError::LoadError` when the workbook cannot be read.
pub fn read_imports(reader: &impl SheetReader, path: &Path) -> Result<Vec<OntologyImport>> {
    let imports = imports_from_rows(&reader.read_rows(path)?);
    debug!("Read {} imports from '{}'", imports.len(), path.display());
    Ok(imports)
}

/// File name at the end of an IRI
#[must_use]
pub fn iri_file_name(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

impl<E: CommandExecutor> Robot<E> {
    /// Directory ontologies are downloaded to
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        PathBuf::from(&self.config().download_dir)
    }

    fn for_each_import<F>(&self, imports: &[OntologyImport], task: F) -> Result<()>
    where
        F: Fn(&OntologyImport) -> Result<()> + Send + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config().worker_count.max(1))
            .build()
            .map_err(|e| OntoError::config(format!("Failed to build worker pool: {e}")))?;
        pool.install(|| imports.par_iter().try_for_each(|import| task(import)))
    }

    /// Command line downloading an ontology, `None` when it is already present
    #[must_use]
    pub fn download_command(&self, import: &OntologyImport) -> Option<String> {
        let target = self.download_dir().join(&import.short_name);
        if target.exists() {
            debug!("'{}' already downloaded", target.display());
            return None;
        }
        Some(format!("curl -L \"{}\" > {}", import.purl, path_arg(&target)))
    }

    /// Download every ontology not yet in the download directory
    ///
    /// # Errors
    ///
    /// Returns `OntoError::IoError` when the download directory cannot be
    /// created and the executor's error when a download cannot be started.
    pub fn download_imports(&self, imports: &[OntologyImport]) -> Result<()> {
        std::fs::create_dir_all(self.download_dir())?;
        self.for_each_import(imports, |import| {
            if let Some(command) = self.download_command(import) {
                self.executor().execute(&command)?;
            }
            Ok(())
        })
    }

    /// Command line extracting the slim module of one import
    #[must_use]
    pub fn extract_slim_command(&self, import: &OntologyImport) -> RobotCommand {
        let dir = self.download_dir();
        self.command()
            .verb(RobotVerb::Merge)
            .quoted_arg("--input", &dir.join(&import.short_name).display().to_string())
            .verb(RobotVerb::Extract)
            .arg("--method", "MIREOT")
            .arg("--annotate-with-source", "true")
            .arg("--upper-term", import.root_id.as_str())
            .arg("--intermediates", import.intermediates.as_str())
            .arg("--output", path_arg(&dir.join(import.slim_file())))
            .repeated_arg("--prefix", import.prefix.as_deref().map(shell_quote_if_needed))
            .repeated_arg("--lower-term", import.imported_terms.iter().cloned())
    }

    /// Extract the slim module of every import
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started.
    pub fn extract_slims(&self, imports: &[OntologyImport]) -> Result<()> {
        self.for_each_import(imports, |import| {
            self.run(&self.extract_slim_command(import)).map(|_| ())
        })
    }

    /// Command line merging and annotating the slim modules
    #[must_use]
    pub fn merge_imports_command(
        &self,
        imports: &[OntologyImport],
        merged_iri: &str,
        merged_file: &Path,
        ontology_name: &str,
    ) -> RobotCommand {
        let dir = self.download_dir();
        self.command()
            .verb(RobotVerb::Merge)
            .repeated_arg(
                "--input",
                imports.iter().map(|import| path_arg(&dir.join(import.slim_file()))),
            )
            .verb(RobotVerb::Annotate)
            .arg("--ontology-iri", merged_iri)
            .arg("--version-iri", merged_iri)
            .arg(
                "--annotation",
                format!(
                    "rdfs:comment \"This file contains externally imported content for the \
                     {ontology_name}. It was prepared using ROBOT and a custom script from a \
                     spreadsheet of imported terms.\""
                ),
            )
            .arg("--output", path_arg(merged_file))
    }

    /// Merge the slim modules into one annotated ontology
    ///
    /// The download directory is removed afterwards when cleanup is on.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started and
    /// `OntoError::IoError` when the download directory cannot be removed.
    pub fn merge_imports(
        &self,
        imports: &[OntologyImport],
        merged_iri: &str,
        merged_file: &Path,
        ontology_name: &str,
    ) -> Result<()> {
        self.run(&self.merge_imports_command(imports, merged_iri, merged_file, ontology_name))?;

        let dir = self.download_dir();
        if self.config().cleanup && dir.exists() {
            debug!("Removing download directory '{}'", dir.display());
            std::fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Download, extract and merge every import of an imports sheet
    ///
    /// # Errors
    ///
    /// Returns the errors of the individual steps.
    pub fn process_imports(
        &self,
        imports: &[OntologyImport],
        merged_iri: &str,
        merged_file: &Path,
        ontology_name: &str,
    ) -> Result<()> {
        info!("Processing {} imports into '{}'", imports.len(), merged_file.display());
        self.download_imports(imports)?;
        self.extract_slims(imports)?;
        self.merge_imports(imports, merged_iri, merged_file, ontology_name)
    }

    /// Add the content of an extra template to the imports ontology
    ///
    /// The imports ontology is the file named by the last segment of
    /// `imports_iri` inside `dir`; it is overwritten.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started.
    pub fn add_additional_content(
        &self,
        template: &Path,
        imports_iri: &str,
        dir: &Path,
    ) -> Result<()> {
        let owl_name = iri_file_name(imports_iri);
        let owl_file = dir.join(owl_name);
        let temp_file = dir.join(owl_name.replace(".owl", "-temp.owl"));

        self.run(
            &self
                .command()
                .verb(RobotVerb::Template)
                .arg("--template", path_arg(template))
                .arg("--ontology-iri", imports_iri)
                .arg("--output", path_arg(&temp_file)),
        )?;
        self.run(
            &self
                .command()
                .verb(RobotVerb::Merge)
                .arg("--input", path_arg(&owl_file))
                .arg("--input", path_arg(&temp_file))
                .arg("--output", path_arg(&owl_file)),
        )?;
        Ok(())
    }

    /// Remove annotation axioms on the listed metadata terms, in place
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started.
    pub fn remove_problem_metadata(&self, owl_file: &Path, term_file: &Path) -> Result<()> {
        self.run(
            &self
                .command()
                .verb(RobotVerb::Remove)
                .arg("--input", path_arg(owl_file))
                .arg("--term-file", path_arg(term_file))
                .arg("--axioms", "annotation")
                .arg("--output", path_arg(owl_file)),
        )?;
        Ok(())
    }

    /// Write an OBO copy of the imports ontology next to it
    ///
    /// # Errors
    ///
    /// Returns the executor's error when ROBOT cannot be started.
    pub fn create_obo_file(&self, imports_iri: &str, dir: &Path) -> Result<()> {
        let owl_name = iri_file_name(imports_iri);
        self.run(
            &self
                .command()
                .verb(RobotVerb::Merge)
                .arg("--input", path_arg(&dir.join(owl_name)))
                .verb(RobotVerb::Convert)
                .arg("--output", path_arg(&dir.join(owl_name.replace(".owl", ".obo"))))
                .arg("--check", "false"),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::testing::RecordingExecutor;
    use ontosheets_core::RobotConfig;
    use pretty_assertions::assert_eq;

    fn row(values: &[Option<&str>]) -> Row {
        values.iter().map(|v| v.map(ToString::to_string)).collect()
    }

    fn bfo() -> OntologyImport {
        import_from_row(&row(&[
            Some("BFO"),
            Some("http://purl.obolibrary.org/obo/bfo.owl"),
            Some("entity [BFO:0000001]"),
            Some("process [BFO:0000015];role [BFO:0000023]"),
            None,
            None,
        ]))
        .unwrap()
    }

    #[test]
    fn test_import_from_row() {
        let import = bfo();
        assert_eq!(import.short_name, "bfo.owl");
        assert_eq!(import.root_id, "BFO:0000001");
        assert_eq!(import.imported_terms, vec!["BFO:0000015", "BFO:0000023"]);
        assert_eq!(import.intermediates, Intermediates::Minimal);
        assert_eq!(import.prefix, None);
    }

    #[test]
    fn test_imports_from_rows_skips_header_and_incomplete_rows() {
        let rows = vec![
            row(&[Some("ID"), Some("PURL")]),
            row(&[Some("UBERON"), None]),
            row(&[
                Some("RO"),
                Some("http://purl.obolibrary.org/obo/ro.owl"),
                Some("RO:0000000"),
                Some("RO:0000052"),
                Some("all"),
                Some("RO: http://purl.obolibrary.org/obo/RO_"),
            ]),
            row(&[]),
        ];
        let imports = imports_from_rows(&rows);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].intermediates, Intermediates::All);
        assert_eq!(
            imports[0].prefix.as_deref(),
            Some("RO: http://purl.obolibrary.org/obo/RO_")
        );
    }

    #[test]
    fn test_extract_slim_command() {
        let robot = Robot::with_executor(&RobotConfig::default(), RecordingExecutor::default());
        assert_eq!(
            robot.extract_slim_command(&bfo()).to_command_string(),
            "robot merge --input \"temp/bfo.owl\" extract --method MIREOT \
             --annotate-with-source true --upper-term BFO:0000001 --intermediates minimal \
             --output temp/BFO-slim.owl --lower-term BFO:0000015 --lower-term BFO:0000023"
        );
    }

    #[test]
    fn test_process_imports_runs_every_step() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RobotConfig {
            download_dir: dir.path().join("downloads").display().to_string(),
            worker_count: 2,
            cleanup: true,
            ..RobotConfig::default()
        };
        let robot = Robot::with_executor(&config, RecordingExecutor::default());
        let merged = dir.path().join("imports.owl");

        robot
            .process_imports(&[bfo()], "http://example.org/imports.owl", &merged, "BCIO")
            .unwrap();

        let commands = robot.executor().commands();
        assert_eq!(commands.len(), 3);
        assert!(commands[0].starts_with("curl -L \"http://purl.obolibrary.org/obo/bfo.owl\" > "));
        assert!(commands[1].contains("extract --method MIREOT"));
        assert!(commands[2].contains(" annotate --ontology-iri http://example.org/imports.owl"));
        assert!(commands[2].contains("--annotation rdfs:comment \"This file contains externally imported content for the BCIO."));
        assert!(!dir.path().join("downloads").exists());
    }

    #[test]
    fn test_existing_download_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("bfo.owl"), "").unwrap();
        let config = RobotConfig {
            download_dir: dir.path().display().to_string(),
            ..RobotConfig::default()
        };
        let robot = Robot::with_executor(&config, RecordingExecutor::default());
        assert_eq!(robot.download_command(&bfo()), None);
    }

    #[test]
    fn test_additional_content_and_obo() {
        let robot = Robot::with_executor(&RobotConfig::default(), RecordingExecutor::default());
        let dir = Path::new("out");
        robot
            .add_additional_content(Path::new("extra.csv"), "http://example.org/bcio_external.owl", dir)
            .unwrap();
        robot
            .remove_problem_metadata(&dir.join("bcio_external.owl"), Path::new("terms.txt"))
            .unwrap();
        robot
            .create_obo_file("http://example.org/bcio_external.owl", dir)
            .unwrap();

        assert_eq!(
            robot.executor().commands(),
            vec![
                "robot template --template extra.csv --ontology-iri http://example.org/bcio_external.owl \
                 --output out/bcio_external-temp.owl",
                "robot merge --input out/bcio_external.owl --input out/bcio_external-temp.owl \
                 --output out/bcio_external.owl",
                "robot remove --input out/bcio_external.owl --term-file terms.txt \
                 --axioms annotation --output out/bcio_external.owl",
                "robot merge --input out/bcio_external.owl convert --output out/bcio_external.obo \
                 --check false",
            ]
        );
    }
}
