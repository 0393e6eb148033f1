//! Template builder
//!
//! Owns the mapping registry and the entity store across every sheet of a
//! run. Class sheets are turned into ROBOT templates as they are read; the
//! relations sheet, relation facts and spreadsheet export all work on the
//! same store.

use super::crosslink::{CrossLinkReport, MissingEntityPolicy, RelationCrossLinker};
use super::export::{serialize, write_workbook};
use super::hierarchy::{HierarchyOrder, HierarchyResolver};
use super::interpreter::RowInterpreter;
use super::lucid::read_lucidchart_file;
use super::relations::{relation_template, relations_from_rows};
use super::table::TemplateTable;
use crate::registry::ColumnMappingRegistry;
use crate::sheet::{Row, SheetReader, WorkbookReader, is_blank};
use crate::store::EntityStore;
use ontosheets_core::error::{OntoError, Result};
use ontosheets_core::utils::bracketed_id;
use ontosheets_core::{ColumnRole, EntityKey, OntologyRelation, RelationFact, TemplateConfig};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of reading one class sheet
#[derive(Debug, Clone, Default)]
pub struct ClassSheetSummary {
    /// ROBOT template for the sheet, obsolete rows left out
    pub table: TemplateTable,
    /// Entities committed from the sheet in row order
    pub entities: Vec<EntityKey>,
    /// Rows left out of the template for their curation status
    pub obsolete: usize,
    /// Non-blank rows without a label
    pub skipped: usize,
    /// Linking of the sheet's relation columns
    pub links: CrossLinkReport,
}

/// Builds ROBOT templates and spreadsheets from ontology sheets
#[derive(Debug)]
pub struct TemplateBuilder<R: SheetReader = WorkbookReader> {
    registry: ColumnMappingRegistry,
    store: EntityStore,
    reader: R,
    config: TemplateConfig,
    unresolved: Vec<RelationFact>,
}

impl TemplateBuilder<WorkbookReader> {
    /// Builder reading workbooks from disk
    #[must_use]
    pub fn new(config: &TemplateConfig) -> Self {
        Self::with_reader(config, WorkbookReader)
    }
}

impl Default for TemplateBuilder<WorkbookReader> {
    fn default() -> Self {
        Self::new(&TemplateConfig::default())
    }
}

impl<R: SheetReader> TemplateBuilder<R> {
    /// Builder with a custom sheet reader
    pub fn with_reader(config: &TemplateConfig, reader: R) -> Self {
        Self {
            registry: ColumnMappingRegistry::from_config(config),
            store: EntityStore::new(),
            reader,
            config: config.clone(),
            unresolved: Vec::new(),
        }
    }

    /// Mapping registry shared by every sheet
    pub fn registry(&self) -> &ColumnMappingRegistry {
        &self.registry
    }

    /// Mutable mapping registry
    pub fn registry_mut(&mut self) -> &mut ColumnMappingRegistry {
        &mut self.registry
    }

    /// Entities and relations read so far
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable store
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Relation column facts still waiting for an entity from a later sheet
    pub fn unresolved_facts(&self) -> &[RelationFact] {
        &self.unresolved
    }

    /// Read a class workbook, optionally writing its ROBOT template
    ///
    /// # Errors
    ///
    /// Returns `OntoError::LoadError` when the workbook cannot be read, in
    /// which case nothing is added to the store, and the errors of
    /// [`Self::add_classes_from_rows`] and of writing the template.
    pub fn add_classes_from_excel(
        &mut self,
        excel_file: &Path,
        csv_file: Option<&Path>,
    ) -> Result<ClassSheetSummary> {
        let rows = self.reader.read_rows(excel_file)?;
        let summary = self.add_classes_from_rows(&rows, &excel_file.display().to_string())?;

        if let Some(csv_file) = csv_file {
            summary.table.write_csv_file(csv_file)?;
        }
        debug!("Finished parsing all rows in '{}'", excel_file.display());
        Ok(summary)
    }

    /// Read class rows, header row first
    ///
    /// Blank rows are skipped, rows without a label are warned about and
    /// skipped. Obsolete rows stay in the store but not in the template.
    /// Relation columns are linked once the whole sheet is read. Facts
    /// naming an entity that is not known yet are kept and retried after
    /// every following sheet.
    ///
    /// # Errors
    ///
    /// Returns `OntoError::LoadError` for a sheet without a header row and
    /// `OntoError::UnmappedHeaders` for unmapped headers in strict mode.
    pub fn add_classes_from_rows(
        &mut self,
        rows: &[Row],
        source_name: &str,
    ) -> Result<ClassSheetSummary> {
        let Some((header, data)) = rows.split_first() else {
            return Err(OntoError::load(source_name, "sheet has no header row"));
        };

        let resolved = self.registry.resolve_headers(header, source_name)?;
        for column in &resolved.columns {
            if let ColumnRole::Relation {
                name: Some(name), ..
            } = &column.mapping.role
                && self.store.lookup_relation(name).is_none()
            {
                let id = bracketed_id(&column.header).unwrap_or_default();
                self.store.insert_relation(OntologyRelation::new(id, name.as_str()));
            }
        }

        let interpreter = RowInterpreter::new(&resolved.columns);
        let mut summary = ClassSheetSummary {
            table: TemplateTable::new(interpreter.header_row(), interpreter.code_row()),
            ..ClassSheetSummary::default()
        };
        let mut pending = std::mem::take(&mut self.unresolved);

        for (index, row) in data.iter().enumerate() {
            if is_blank(row) {
                continue;
            }

            let interpreted = interpreter.interpret(row);
            let Some(entity) = interpreted.entity else {
                warn!(
                    "Row {} of '{source_name}' has no label, skipping",
                    index + 2
                );
                summary.skipped += 1;
                continue;
            };

            if entity.has_status(&self.config.obsolete_status) {
                info!(
                    "Not writing row for entity '{}' to template due to obsolete status",
                    entity.name_or_empty()
                );
                summary.obsolete += 1;
            } else {
                summary.table.rows.push(interpreted.output);
            }

            let source = entity.name_or_empty().to_string();
            pending.extend(
                interpreted
                    .relation_targets
                    .into_iter()
                    .map(|(relation, target)| RelationFact::new(source.as_str(), relation, target)),
            );
            summary.entities.push(self.store.insert_entity(entity));
        }

        summary.links = RelationCrossLinker::with_policy(MissingEntityPolicy::Skip)
            .attach(&mut self.store, &pending)?;
        self.unresolved = pending
            .into_iter()
            .filter(|fact| RelationCrossLinker::is_unresolved(&self.store, fact))
            .collect();
        if !self.unresolved.is_empty() {
            debug!(
                "{} relation facts wait for entities from later sheets",
                self.unresolved.len()
            );
        }

        info!(
            "Read {} classes from '{source_name}' ({} obsolete, {} without label)",
            summary.entities.len(),
            summary.obsolete,
            summary.skipped
        );
        Ok(summary)
    }

    /// Read a relations workbook
    ///
    /// # Errors
    ///
    /// Returns `OntoError::LoadError` when the workbook cannot be read.
    pub fn add_relations_from_excel(&mut self, excel_file: &Path) -> Result<usize> {
        let rows = self.reader.read_rows(excel_file)?;
        Ok(self.add_relations_from_rows(&rows))
    }

    /// Register the relations of a relations sheet, header row first
    pub fn add_relations_from_rows(&mut self, rows: &[Row]) -> usize {
        if let Some(header) = rows.first() {
            debug!("Relations sheet header: {header:?}");
        }

        let relations = relations_from_rows(rows);
        let count = relations.len();
        for relation in relations {
            self.store.insert_relation(relation);
        }
        count
    }

    /// Relation creation template for every known relation
    #[must_use]
    pub fn relation_template(&self) -> TemplateTable {
        relation_template(self.store.relations().map(|(_, relation)| relation))
    }

    /// Write the relation creation template
    ///
    /// # Errors
    ///
    /// Returns the errors of [`TemplateTable::write_csv_file`].
    pub fn write_relation_template(&self, csv_file: &Path) -> Result<()> {
        self.relation_template().write_csv_file(csv_file)?;
        debug!(
            "Finished writing relation creation template at '{}'",
            csv_file.display()
        );
        Ok(())
    }

    /// Attach externally sourced relation facts
    ///
    /// # Errors
    ///
    /// Returns `OntoError::EntityNotFound` when a fact names an unknown
    /// entity; nothing is attached then.
    pub fn merge_relation_facts(&mut self, facts: &[RelationFact]) -> Result<CrossLinkReport> {
        RelationCrossLinker::new().attach(&mut self.store, facts)
    }

    /// Attach the relation facts drawn in a Lucidchart CSV export
    ///
    /// # Errors
    ///
    /// Returns the errors of reading the export and of
    /// [`Self::merge_relation_facts`].
    pub fn merge_lucidchart(&mut self, csv_file: &Path) -> Result<CrossLinkReport> {
        let diagram = read_lucidchart_file(csv_file)?;
        self.merge_relation_facts(&diagram.facts)
    }

    /// Depth-first order of every entity
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyOrder {
        HierarchyResolver::build_order(&self.store)
    }

    /// Exported rows, header row first
    #[must_use]
    pub fn export_rows(&self) -> Vec<Vec<String>> {
        serialize(&self.store, &self.hierarchy(), &self.config.id_column_name)
    }

    /// Write every entity to a one-sheet workbook
    ///
    /// # Errors
    ///
    /// Returns `OntoError::WorkbookError` when the workbook cannot be written.
    pub fn write_spreadsheet(&self, excel_file: &Path) -> Result<()> {
        write_workbook(&self.export_rows(), excel_file)
    }
}
