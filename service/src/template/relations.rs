//! Relations sheet and relation creation template
//!
//! The relations sheet has seven positional columns: id, name, equivalent,
//! parent, definition, domain and range. The header row is skipped.

use super::table::TemplateTable;
use crate::sheet::{Row, cell};
use ontosheets_core::OntologyRelation;
use ontosheets_core::utils::bracketed_id_or_value;

/// Header row of the relation creation template
pub const RELATION_TEMPLATE_HEADERS: [&str; 7] =
    ["Id", "Name", "Type", "Parent", "Def", "Domain", "Range"];

/// Template codes of the relation creation template
pub const RELATION_TEMPLATE_CODES: [&str; 7] =
    ["ID", "LABEL", "TYPE", "SP %", "A IAO:0000115", "DOMAIN", "RANGE"];

/// Relation described by one relations sheet row, `None` without a name
#[must_use]
pub fn relation_from_row(row: &Row) -> Option<OntologyRelation> {
    let name = cell(row, 1)?;
    let text = |position| cell(row, position).map(ToString::to_string);

    Some(OntologyRelation {
        id: cell(row, 0).unwrap_or_default().to_string(),
        name: name.to_string(),
        equivalent: text(2),
        parent: text(3),
        definition: text(4),
        domain: text(5),
        range: text(6),
    })
}

/// Relations described by a relations sheet, header row excluded
#[must_use]
pub fn relations_from_rows(rows: &[Row]) -> Vec<OntologyRelation> {
    rows.iter().skip(1).filter_map(relation_from_row).collect()
}

/// Relation creation template for a set of relations
#[must_use]
pub fn relation_template<'a>(
    relations: impl IntoIterator<Item = &'a OntologyRelation>,
) -> TemplateTable {
    let mut table = TemplateTable::new(
        RELATION_TEMPLATE_HEADERS.map(String::from).to_vec(),
        RELATION_TEMPLATE_CODES.map(String::from).to_vec(),
    );

    for relation in relations {
        let parent = relation
            .parent
            .as_deref()
            .map(bracketed_id_or_value)
            .unwrap_or_default();
        table.rows.push(vec![
            relation.id.clone(),
            relation.name.clone(),
            "object property".to_string(),
            parent.to_string(),
            relation.definition.clone().unwrap_or_default(),
            relation.domain.clone().unwrap_or_default(),
            relation.range.clone().unwrap_or_default(),
        ]);
    }

    table
}
