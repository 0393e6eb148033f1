//! Lucidchart diagram exports
//!
//! A Lucidchart CSV export lists shapes and lines in one table. `Process` and
//! `Connector` shapes are entities labelled by their first text area; `Line`
//! rows connect two shapes and carry the relation label. A line drawn with
//! its arrow head at the source end is read backwards.

use ontosheets_core::RelationFact;
use ontosheets_core::error::{OntoError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// One row of a Lucidchart CSV export
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LucidRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    shape: String,
    #[serde(rename = "Text Area 1")]
    text: String,
    #[serde(rename = "Line Source")]
    line_source: String,
    #[serde(rename = "Line Destination")]
    line_destination: String,
    #[serde(rename = "Source Arrow")]
    source_arrow: String,
    #[serde(rename = "Destination Arrow")]
    destination_arrow: String,
}

/// Shape exported from a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LucidShape {
    /// Lucidchart object id
    pub id: String,
    /// Shape label
    pub name: String,
}

/// Shapes and relation facts of a diagram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LucidDiagram {
    /// Entity shapes in export order
    pub shapes: Vec<LucidShape>,
    /// Facts drawn between shapes
    pub facts: Vec<RelationFact>,
}

/// Read a Lucidchart CSV export from a file
///
/// # Errors
///
/// Returns `OntoError::LoadError` when the file cannot be opened and
/// `OntoError::CsvError` when it is not a readable CSV export.
pub fn read_lucidchart_file(path: &Path) -> Result<LucidDiagram> {
    let file = std::fs::File::open(path)
        .map_err(|e| OntoError::load(path.display().to_string(), e.to_string()))?;
    read_lucidchart(file)
}

/// Read a Lucidchart CSV export
///
/// Shapes are collected before lines are resolved, so a line may precede the
/// shapes it connects. Lines with an unknown endpoint are skipped.
///
/// # Errors
///
/// Returns `OntoError::CsvError` when the input is not a readable CSV export.
pub fn read_lucidchart<R: Read>(input: R) -> Result<LucidDiagram> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: LucidRow =
            record.map_err(|e| OntoError::csv(format!("Failed to read Lucidchart row: {e}")))?;
        rows.push(row);
    }

    let mut diagram = LucidDiagram::default();
    let mut names: HashMap<&str, &str> = HashMap::new();
    for row in &rows {
        if matches!(row.shape.as_str(), "Process" | "Connector") {
            let name = row.text.trim();
            names.insert(row.id.as_str(), name);
            diagram.shapes.push(LucidShape {
                id: row.id.clone(),
                name: name.to_string(),
            });
        }
    }

    for row in rows.iter().filter(|row| row.shape == "Line") {
        let relation = row.text.trim();
        let (source, destination) =
            if row.source_arrow == "Arrow" && row.destination_arrow == "None" {
                debug!("Arrow needs reversing: '{relation}' on line {}", row.id);
                (&row.line_destination, &row.line_source)
            } else {
                (&row.line_source, &row.line_destination)
            };

        match (names.get(source.as_str()), names.get(destination.as_str())) {
            (Some(source), Some(target)) => {
                diagram
                    .facts
                    .push(RelationFact::new(*source, relation, *target));
            }
            _ => warn!(
                "Error parsing relation data: line {} '{relation}' from '{source}' to '{destination}'",
                row.id
            ),
        }
    }

    debug!(
        "Read {} shapes and {} relation facts from Lucidchart export",
        diagram.shapes.len(),
        diagram.facts.len()
    );
    Ok(diagram)
}
