//! Spreadsheet export
//!
//! Entities are written back in hierarchy order, one row each, with a column
//! per known relation. The resulting sheet reads back through the same
//! header table it was produced from.

use super::hierarchy::{HierarchyOrder, ParentRef, resolve_parent};
use crate::store::EntityStore;
use ontosheets_core::error::{OntoError, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

/// Columns written before the relation columns, after the id column
pub const EXPORT_COLUMNS: [&str; 5] = ["Name", "Parent", "Definition", "Synonyms", "Examples"];

/// Header row of an exported spreadsheet
#[must_use]
pub fn export_header(store: &EntityStore, id_column_name: &str) -> Vec<String> {
    std::iter::once(id_column_name.to_string())
        .chain(EXPORT_COLUMNS.iter().map(ToString::to_string))
        .chain(store.relations().map(|(_, relation)| relation.column_header()))
        .collect()
}

/// Header row followed by one row per entity in hierarchy order
#[must_use]
pub fn serialize(
    store: &EntityStore,
    hierarchy: &HierarchyOrder,
    id_column_name: &str,
) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(hierarchy.order.len() + 1);
    rows.push(export_header(store, id_column_name));

    for &key in &hierarchy.order {
        let entity = store.entity(key);
        let parent = match resolve_parent(store, key) {
            Some(ParentRef::Managed(parent)) => store.entity(parent).name_or_empty().to_string(),
            Some(ParentRef::Imported(parent)) => parent,
            None => String::new(),
        };

        let mut row = vec![
            entity.id.clone().unwrap_or_default(),
            entity.name_or_empty().to_string(),
            parent,
            entity.definition.clone().unwrap_or_default(),
            entity.synonyms.join(";"),
            entity.examples.clone().unwrap_or_default(),
        ];
        row.extend(store.relations().map(|(_, relation)| {
            entity
                .relation_targets(&relation.name)
                .iter()
                .map(|target| store.entity(*target).name_or_empty())
                .collect::<Vec<_>>()
                .join(";")
        }));
        rows.push(row);
    }

    rows
}

/// Excel column index for a position
///
/// # Errors
///
/// Returns `OntoError::WorkbookError` past Excel's last column.
pub fn column_index(position: usize) -> Result<u16> {
    const MAX_EXCEL_COLUMNS: usize = 16_384;

    if position >= MAX_EXCEL_COLUMNS {
        return Err(OntoError::workbook(format!(
            "Too many columns for Excel: {position} (max: {MAX_EXCEL_COLUMNS})"
        )));
    }
    u16::try_from(position)
        .map_err(|_| OntoError::workbook(format!("Column index {position} cannot fit in u16")))
}

/// Save rows as a one-sheet workbook; empty strings stay blank cells
///
/// # Errors
///
/// Returns `OntoError::WorkbookError` when a cell cannot be written or the
/// workbook cannot be saved.
pub fn write_workbook(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row_index, row) in rows.iter().enumerate() {
        let row_number = u32::try_from(row_index)
            .map_err(|_| OntoError::workbook(format!("Row index {row_index} cannot fit in u32")))?;
        for (position, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_number, column_index(position)?, value)
                .map_err(|e| OntoError::workbook(e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| OntoError::workbook(format!("Failed to save workbook: {e}")))?;
    debug!("Wrote {} rows to '{}'", rows.len(), path.display());
    Ok(())
}
