//! Shared fixtures for the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Write a one-sheet workbook; empty strings stay blank cells
pub fn write_sheet(dir: &Path, file_name: &str, rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row_index, row) in rows.iter().enumerate() {
        for (column_index, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(
                    u32::try_from(row_index).unwrap(),
                    u16::try_from(column_index).unwrap(),
                    *value,
                )
                .unwrap();
        }
    }

    workbook.save(&path).unwrap();
    path
}

/// Rows of a CSV file, header rows included
pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(ToString::to_string).collect())
        .collect()
}

/// Class sheet used by several tests
pub const CLASS_SHEET: &[&[&str]] = &[
    &["ID", "Name", "Parent", "Definition", "Synonyms", "Curation status"],
    &["BCIO:001", "Behaviour (B)", "", "An activity.", "conduct", ""],
    &["BCIO:002", "Diet", "Behaviour", "Eating.", "", ""],
    &["BCIO:003", "Old diet", "Diet", "", "", "Obsolete"],
];
