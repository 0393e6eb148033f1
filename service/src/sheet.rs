//! Spreadsheet reading
//!
//! Sheets are read whole into rows of optional cell strings. Only the first
//! worksheet of a workbook is read, matching the active sheet of the
//! workbooks the spreadsheets are authored in.

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use chrono::NaiveTime;
use ontosheets_core::error::{OntoError, Result};
use std::path::Path;
use tracing::{debug, error};

/// One sheet row; `None` is an empty cell
pub type Row = Vec<Option<String>>;

/// Source of sheet rows
pub trait SheetReader {
    /// Read every row of the first sheet, header row included
    ///
    /// # Errors
    ///
    /// Returns `OntoError::LoadError` naming the path when the file cannot be
    /// opened or parsed.
    fn read_rows(&self, path: &Path) -> Result<Vec<Row>>;
}

/// Reads xlsx, xls and ods workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

impl SheetReader for WorkbookReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<Row>> {
        let load_error = |reason: String| {
            error!("Failed to open excel sheet '{}': {reason}", path.display());
            OntoError::load(path.display().to_string(), reason)
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| load_error(e.to_string()))?;
        let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
            return Err(load_error("workbook has no sheets".to_string()));
        };
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| load_error(format!("failed to read sheet '{sheet_name}': {e}")))?;

        let rows: Vec<Row> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        debug!(
            "Read {} rows from sheet '{sheet_name}' of '{}'",
            rows.len(),
            path.display()
        );
        Ok(rows)
    }
}

/// Cell value as text; empty cells become `None`
#[must_use]
pub fn cell_to_string(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(date_time_text(dt)),
        Data::DateTimeIso(dt) => Some(dt.clone()),
        Data::DurationIso(d) => Some(d.clone()),
        Data::Error(e) => Some(format!("{e:?}")),
    }
}

/// Cell at `position`, treating short rows as empty
#[must_use]
pub fn cell(row: &Row, position: usize) -> Option<&str> {
    row.get(position).and_then(Option::as_deref)
}

/// Whether every cell of a row is empty or blank
#[must_use]
pub fn is_blank(row: &Row) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|value| value.trim().is_empty()))
}

/// Dates as `YYYY-MM-DD`, date-times as ISO 8601, durations as `H:MM:SS`
fn date_time_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return value.as_duration().map_or_else(
            || value.to_string(),
            |duration| {
                let seconds = duration.num_seconds();
                format!("{}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
            },
        );
    }
    match value.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => datetime.date().to_string(),
        Some(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String("Foo".into())), Some("Foo".to_string()));
        assert_eq!(cell_to_string(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(cell_to_string(&Data::Float(1.0)), Some("1".to_string()));
        assert_eq!(cell_to_string(&Data::Bool(true)), Some("true".to_string()));
    }

    #[test]
    fn test_date_cells() {
        use calamine::ExcelDateTimeType;

        let date = ExcelDateTime::new(45_322.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_string(&Data::DateTime(date)), Some("2024-01-31".to_string()));

        let noon = ExcelDateTime::new(45_322.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_to_string(&Data::DateTime(noon)),
            Some("2024-01-31T12:00:00".to_string())
        );

        let duration = ExcelDateTime::new(1.25, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(cell_to_string(&Data::DateTime(duration)), Some("30:00:00".to_string()));
    }

    #[test]
    fn test_cell_and_blank() {
        let row: Row = vec![Some("a".to_string()), None];
        assert_eq!(cell(&row, 0), Some("a"));
        assert_eq!(cell(&row, 1), None);
        assert_eq!(cell(&row, 5), None);
        assert!(!is_blank(&row));
        assert!(is_blank(&vec![None, Some("  ".to_string())]));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = WorkbookReader
            .read_rows(Path::new("does/not/exist.xlsx"))
            .unwrap_err();
        match err {
            OntoError::LoadError { path, .. } => assert!(path.contains("exist.xlsx")),
            other => panic!("Wrong error type: {other:?}"),
        }
    }
}
