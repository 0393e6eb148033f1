//! Core type definitions for ontology entities, relations and imports

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Handle of an entity inside an entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(pub usize);

/// Handle of a relation inside an entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationKey(pub usize);

/// An ontology class authored from one spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyEntity {
    /// Term identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Label, without any parenthesized synonym
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Textual definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Raw parent reference before resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Synonyms in discovery order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,

    /// Usage examples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,

    /// Free-text comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Curation status, `Obsolete` rows are left out of templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation_status: Option<String>,

    /// Relation name to target entities, created on first use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<IndexMap<String, Vec<EntityKey>>>,
}

impl OntologyEntity {
    /// Create an empty entity
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Label or an empty string
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Whether the curation status matches `status`
    #[must_use]
    pub fn has_status(&self, status: &str) -> bool {
        self.curation_status.as_deref() == Some(status)
    }

    /// Targets recorded for a relation
    #[must_use]
    pub fn relation_targets(&self, relation_name: &str) -> &[EntityKey] {
        self.relations
            .as_ref()
            .and_then(|relations| relations.get(relation_name))
            .map_or(&[], Vec::as_slice)
    }

    /// Append a relation target, creating the mapping and sequence on first use
    pub fn add_relation_target(&mut self, relation_name: &str, target: EntityKey) {
        self.relations
            .get_or_insert_with(IndexMap::new)
            .entry(relation_name.to_string())
            .or_default()
            .push(target);
    }
}

/// An ontology object property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyRelation {
    /// Property identifier
    pub id: String,

    /// Property label
    pub name: String,

    /// Equivalent property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalent: Option<String>,

    /// Parent property, usually `label [ID]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Textual definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Domain class expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Range class expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl OntologyRelation {
    /// Create a relation with only id and name
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Header used for this relation in round-tripped spreadsheets
    #[must_use]
    pub fn column_header(&self) -> String {
        format!("REL '{}' [{}]", self.name, self.id)
    }
}

/// A binary fact `source --relation--> target` from an external source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFact {
    /// Source entity name
    pub source: String,
    /// Relation label, possibly with a trailing `(...)` qualifier
    pub relation: String,
    /// Target entity name
    pub target: String,
}

impl RelationFact {
    /// Create a new fact
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }
}

/// How many intermediate classes a MIREOT extraction keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intermediates {
    /// Every class between lower and upper terms
    All,
    /// Only classes needed to connect the terms
    #[default]
    Minimal,
}

impl Intermediates {
    /// Value passed to `--intermediates`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Minimal => "minimal",
        }
    }

    /// Parse a cell value; blank or unrecognised values fall back to minimal
    #[must_use]
    pub fn from_cell(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("all") => Self::All,
            Some("" | "minimal") | None => Self::Minimal,
            Some(other) => {
                warn!("Unrecognised intermediates value '{other}', using minimal");
                Self::Minimal
            }
        }
    }
}

/// Terms imported from an external ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyImport {
    /// Ontology identifier, e.g. `BFO`
    pub ontology_id: String,
    /// Download location
    pub purl: String,
    /// Upper term of the extraction
    pub root_id: String,
    /// Lower terms of the extraction
    pub imported_terms: Vec<String>,
    /// Intermediates mode
    pub intermediates: Intermediates,
    /// File name of the downloaded ontology
    pub short_name: String,
    /// Optional `--prefix` argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl OntologyImport {
    /// File name of the extracted slim module
    #[must_use]
    pub fn slim_file(&self) -> String {
        format!("{}-slim.owl", self.ontology_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_targets_created_lazily() {
        let mut entity = OntologyEntity::new();
        assert!(entity.relations.is_none());
        assert!(entity.relation_targets("part of").is_empty());

        entity.add_relation_target("part of", EntityKey(3));
        entity.add_relation_target("part of", EntityKey(3));
        entity.add_relation_target("has part", EntityKey(1));

        assert_eq!(entity.relation_targets("part of"), &[EntityKey(3), EntityKey(3)]);
        let names: Vec<&String> = entity.relations.as_ref().unwrap().keys().collect();
        assert_eq!(names, vec!["part of", "has part"]);
    }

    #[test]
    fn test_relation_column_header() {
        let relation = OntologyRelation::new("BFO:0000050", "part of");
        assert_eq!(relation.column_header(), "REL 'part of' [BFO:0000050]");
    }

    #[test]
    fn test_intermediates_from_cell() {
        assert_eq!(Intermediates::from_cell(None), Intermediates::Minimal);
        assert_eq!(Intermediates::from_cell(Some("all")), Intermediates::All);
        assert_eq!(Intermediates::from_cell(Some(" ALL ")), Intermediates::All);
        assert_eq!(Intermediates::from_cell(Some("")), Intermediates::Minimal);
    }

    #[test]
    fn test_slim_file() {
        let import = OntologyImport {
            ontology_id: "BFO".to_string(),
            purl: "http://purl.obolibrary.org/obo/bfo.owl".to_string(),
            root_id: "BFO:0000001".to_string(),
            imported_terms: vec![],
            intermediates: Intermediates::Minimal,
            short_name: "bfo.owl".to_string(),
            prefix: None,
        };
        assert_eq!(import.slim_file(), "BFO-slim.owl");
    }
}
