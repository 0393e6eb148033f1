//! Row interpretation
//!
//! A row is walked left to right over the resolved columns. The walk order is
//! part of the contract: a label cell resets the synonym list, so a
//! `Synonyms` column only contributes when it comes after the label column.
//!
//! Roles dispatch first; annotation columns are then told apart by their
//! canonical column name.

use crate::registry::ResolvedColumn;
use crate::sheet::{Row, cell};
use ontosheets_core::utils::first_parenthesized;
use ontosheets_core::{ColumnMapping, ColumnRole, OntologyEntity};

/// Result of interpreting one row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpretedRow {
    /// Template cells aligned with the resolved columns
    pub output: Vec<String>,
    /// Entity built from the row, `None` when the row carries no label
    pub entity: Option<OntologyEntity>,
    /// `(relation name, target name)` pairs read from relation columns
    pub relation_targets: Vec<(String, String)>,
}

/// Interprets rows against a fixed set of resolved columns
#[derive(Debug, Clone, Copy)]
pub struct RowInterpreter<'a> {
    columns: &'a [ResolvedColumn],
}

impl<'a> RowInterpreter<'a> {
    /// Create an interpreter for a header row's resolved columns
    #[must_use]
    pub fn new(columns: &'a [ResolvedColumn]) -> Self {
        Self { columns }
    }

    /// First template header row: the sheet's own header texts
    #[must_use]
    pub fn header_row(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// Second template header row: ROBOT template codes
    #[must_use]
    pub fn code_row(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.mapping.template_code())
            .collect()
    }

    /// Interpret one data row
    #[must_use]
    pub fn interpret(&self, row: &Row) -> InterpretedRow {
        let mut interpreted = InterpretedRow {
            output: Vec::with_capacity(self.columns.len()),
            ..InterpretedRow::default()
        };
        let mut entity = OntologyEntity::new();
        let mut labelled = false;

        for column in self.columns {
            let raw = cell(row, column.position);
            interpreted.output.push(column.mapping.transform_value(raw));

            let Some(value) = raw else {
                continue;
            };

            if let ColumnRole::Relation { name, .. } = &column.mapping.role {
                let relation = name.as_deref().unwrap_or(&column.mapping.source_header);
                interpreted.relation_targets.extend(
                    split_references(value).map(|target| (relation.to_string(), target)),
                );
                continue;
            }

            labelled |= matches!(column.mapping.role, ColumnRole::Label);
            apply_cell(&mut entity, &column.mapping, value);
        }

        if labelled {
            interpreted.entity = Some(entity);
        } else {
            interpreted.relation_targets.clear();
        }
        interpreted
    }
}

/// Update an entity from one non-empty cell
pub fn apply_cell(entity: &mut OntologyEntity, mapping: &ColumnMapping, value: &str) {
    match &mapping.role {
        ColumnRole::Id => entity.id = Some(value.to_string()),
        ColumnRole::Label => apply_label(entity, value),
        ColumnRole::Parent => entity.parent = clean_reference(value),
        ColumnRole::Annotation { .. } => match mapping.source_header.as_str() {
            "Synonyms" => entity
                .synonyms
                .extend(value.split(';').map(ToString::to_string)),
            "Definition" => entity.definition = Some(value.to_string()),
            "Examples" if !value.is_empty() => entity.examples = Some(value.to_string()),
            "Comment" if !value.is_empty() => entity.comment = Some(value.to_string()),
            "Curation status" => entity.curation_status = Some(value.to_string()),
            _ => {}
        },
        ColumnRole::Relation { .. } | ColumnRole::Disjoint | ColumnRole::Equivalence => {}
    }
}

/// `Foo (F)` becomes name `Foo` with synonym `F`
fn apply_label(entity: &mut OntologyEntity, value: &str) {
    entity.name = Some(value.to_string());
    entity.synonyms.clear();

    if value.contains(')')
        && let Some(open) = value.find('(')
        && let Some(synonym) = first_parenthesized(value)
        && !synonym.is_empty()
    {
        entity.name = Some(value[..open].trim().to_string());
        entity.synonyms.push(synonym.to_string());
    }
}

/// Reduce a class reference cell to a bare name
///
/// Only the text before the first `/` counts; anything from the first `(` and
/// then from the first `[` on is dropped. Blank results are `None`.
#[must_use]
pub fn clean_reference(value: &str) -> Option<String> {
    let mut reference = value.split('/').next().unwrap_or_default();
    if let Some(pos) = reference.find('(') {
        reference = &reference[..pos];
    }
    if let Some(pos) = reference.find('[') {
        reference = &reference[..pos];
    }

    let reference = reference.trim();
    (!reference.is_empty()).then(|| reference.to_string())
}

/// Names in a `;`-separated reference cell
fn split_references(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(';').filter_map(|part| {
        let part = part.trim();
        let cut = part.find(['(', '[']).map_or(part, |pos| &part[..pos]);
        let cut = cut.trim();
        (!cut.is_empty()).then(|| cut.to_string())
    })
}
