//! Building an ontology from a ROBOT template
//!
//! Dependencies become `owl:imports` of a small generated ontology that is
//! merged in before the template is applied.

use super::command::{CommandExecutor, RobotVerb};
use super::{Robot, path_arg, shell_quote_if_needed};
use ontosheets_core::error::{OntoError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the generated imports ontology
pub const IMPORTS_FILE: &str = "imports.owl";

const NAMESPACES: [(&str, &str); 10] = [
    ("xmlns", "http://www.semanticweb.org/ontologies/temporary#"),
    ("xml:base", "http://www.semanticweb.org/ontologies/temporary"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:obo", "http://purl.obolibrary.org/obo/"),
    ("xmlns:owl", "http://www.w3.org/2002/07/owl#"),
    ("xmlns:rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("xmlns:xml", "http://www.w3.org/XML/1998/namespace"),
    ("xmlns:xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("xmlns:foaf", "http://xmlns.com/foaf/0.1/"),
    ("xmlns:rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
];

/// Inputs of a template build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateBuild {
    /// ROBOT template CSV
    pub template: PathBuf,
    /// Ontology files imported by the result, relative to `iri_prefix`
    pub dependencies: Vec<String>,
    /// IRI prefix the dependency file names are appended to
    pub iri_prefix: String,
    /// `--prefix` arguments, e.g. `BCIO: http://example.org/BCIO_`
    pub id_prefixes: Vec<String>,
    /// IRI of the built ontology
    pub ontology_iri: String,
    /// Output OWL file
    pub output: PathBuf,
}

impl TemplateBuild {
    /// Where the imports ontology is written: next to the output file
    #[must_use]
    pub fn imports_file(&self) -> PathBuf {
        self.output
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(IMPORTS_FILE)
    }
}

/// Split a comma-separated dependency list
#[must_use]
pub fn parse_dependencies(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|dependency| !dependency.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// RDF/XML ontology importing every dependency
///
/// # Errors
///
/// Returns `OntoError::SerializationError` when the document cannot be
/// written.
pub fn imports_document(
    ontology_iri: &str,
    iri_prefix: &str,
    dependencies: &[String],
) -> Result<String> {
    let xml_error = |e: quick_xml::Error| OntoError::serialization(e.to_string());
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("rdf:RDF").with_attributes(NAMESPACES),
        ))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("owl:Ontology").with_attributes([("rdf:about", ontology_iri)]),
        ))
        .map_err(xml_error)?;

    for dependency in dependencies {
        let resource = format!("{iri_prefix}{dependency}");
        writer
            .write_event(Event::Empty(
                BytesStart::new("owl:imports").with_attributes([("rdf:resource", resource.as_str())]),
            ))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("owl:Ontology")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("rdf:RDF")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(|e| OntoError::serialization(e.to_string()))
}

impl<E: CommandExecutor> Robot<E> {
    /// Command line of a template build
    #[must_use]
    pub fn template_command(&self, build: &TemplateBuild) -> super::RobotCommand {
        let mut command = self
            .command()
            .verb(RobotVerb::Template)
            .arg("--template", path_arg(&build.template))
            .repeated_arg(
                "--prefix",
                build.id_prefixes.iter().map(|p| shell_quote_if_needed(p)),
            )
            .arg("--ontology-iri", build.ontology_iri.as_str())
            .arg("--output", path_arg(&build.output));

        if !build.dependencies.is_empty() {
            command = command
                .arg("--input", path_arg(&build.imports_file()))
                .flag("--merge-before")
                .arg("--collapse-import-closure", "false");
        }
        command
    }

    /// Build an ontology from a template, writing the imports ontology first
    /// when there are dependencies. Returns ROBOT's output.
    ///
    /// # Errors
    ///
    /// Returns `OntoError::IoError` when the imports ontology cannot be
    /// written and the executor's error when ROBOT cannot be started.
    pub fn build_from_template(&self, build: &TemplateBuild) -> Result<String> {
        if !build.dependencies.is_empty() {
            debug!("Ontology dependencies: {:?}", build.dependencies);
            let document =
                imports_document(&build.ontology_iri, &build.iri_prefix, &build.dependencies)?;
            std::fs::write(build.imports_file(), document)?;
        }

        let output = self.run(&self.template_command(build))?;
        info!(
            "Built '{}' from template '{}'",
            build.output.display(),
            build.template.display()
        );
        Ok(output)
    }
}
