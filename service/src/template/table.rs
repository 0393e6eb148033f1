//! ROBOT template tables
//!
//! A ROBOT template is a CSV file with two header rows: human readable column
//! names, then the template codes ROBOT interprets.

use ontosheets_core::error::{OntoError, Result};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Template rows ready to be written as CSV
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTable {
    /// Column names
    pub headers: Vec<String>,
    /// ROBOT template codes
    pub codes: Vec<String>,
    /// Data rows
    pub rows: Vec<Vec<String>>,
}

impl TemplateTable {
    /// Table with both header rows and no data
    #[must_use]
    pub fn new(headers: Vec<String>, codes: Vec<String>) -> Self {
        Self {
            headers,
            codes,
            rows: Vec::new(),
        }
    }

    /// Write the table as minimally quoted CSV
    ///
    /// # Errors
    ///
    /// Returns `OntoError::CsvError` when a record cannot be written.
    pub fn write_csv<W: Write>(&self, output: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .flexible(true)
            .from_writer(output);

        for record in [&self.headers, &self.codes].into_iter().chain(&self.rows) {
            writer
                .write_record(record)
                .map_err(|e| OntoError::csv(format!("Failed to write template row: {e}")))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table to a file
    ///
    /// # Errors
    ///
    /// Returns `OntoError::IoError` when the file cannot be created and
    /// `OntoError::CsvError` when a record cannot be written.
    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        debug!(
            "Wrote template with {} rows to '{}'",
            self.rows.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_quoting() {
        let mut table = TemplateTable::new(
            vec!["ID".to_string(), "Name".to_string()],
            vec!["ID".to_string(), "LABEL".to_string()],
        );
        table
            .rows
            .push(vec!["X:1".to_string(), "Foo, the \"first\"".to_string()]);
        table.rows.push(vec!["X:2".to_string(), String::new()]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID,Name\nID,LABEL\nX:1,\"Foo, the \"\"first\"\"\"\nX:2,\n"
        );
    }
}
