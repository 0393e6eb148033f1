//! Column mappings: the semantic role of a spreadsheet column
//!
//! A [`ColumnMapping`] binds a header to a [`ColumnRole`]. The role decides the
//! ROBOT template code written in the second header row of a template file and
//! how raw cell values are cleaned before they are written.
//!
//! ## Template codes
//!
//! | Role          | Code                        |
//! |---------------|-----------------------------|
//! | `Id`          | `ID`                        |
//! | `Label`       | `LABEL`                     |
//! | `Parent`      | `SC % SPLIT=;`              |
//! | `Relation`    | `SC <property> some % SPLIT=;` |
//! | `Annotation`  | `A <property> SPLIT=;`      |
//! | `Disjoint`    | `DC % SPLIT=;`              |
//! | `Equivalence` | `EC %`                      |

use crate::utils::quote_if_needed;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parenthesized segments removed from template values
static PAREN_SEGMENT: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\(.*?\)").expect("Valid parenthesis regex pattern")
});

/// Bracketed segments removed from template values
static BRACKET_SEGMENT: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\[.*?\]").expect("Valid bracket regex pattern")
});

/// Semantic role of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Term identifier
    Id,
    /// Term label
    Label,
    /// Named superclass
    Parent,
    /// Existential restriction on an object property
    Relation {
        /// Target property identifier, quoted when it contains whitespace
        property: String,
        /// Relation name taken from a `REL '<name>' [<id>]` header
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Annotation property
    Annotation {
        /// Target annotation property identifier
        property: String,
    },
    /// Disjoint classes
    Disjoint,
    /// Equivalent class expression
    Equivalence,
}

/// Header to role binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Canonical column name (several header spellings share one)
    pub source_header: String,
    /// Role of the column
    #[serde(flatten)]
    pub role: ColumnRole,
}

impl ColumnMapping {
    /// Create a mapping from a column name and role
    #[must_use]
    pub fn new(source_header: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            source_header: source_header.into(),
            role,
        }
    }

    /// Identifier column
    #[must_use]
    pub fn id(column: &str) -> Self {
        Self::new(column, ColumnRole::Id)
    }

    /// Label column
    #[must_use]
    pub fn label(column: &str) -> Self {
        Self::new(column, ColumnRole::Label)
    }

    /// Parent column
    #[must_use]
    pub fn parent(column: &str) -> Self {
        Self::new(column, ColumnRole::Parent)
    }

    /// Relation column; the column name doubles as property when none is given
    #[must_use]
    pub fn relation(column: &str, property: Option<&str>) -> Self {
        Self::new(
            column,
            ColumnRole::Relation {
                property: property.unwrap_or(column).to_string(),
                name: None,
            },
        )
    }

    /// Annotation column
    #[must_use]
    pub fn annotation(column: &str, property: &str) -> Self {
        Self::new(
            column,
            ColumnRole::Annotation {
                property: property.to_string(),
            },
        )
    }

    /// Disjoint classes column
    #[must_use]
    pub fn disjoint(column: &str) -> Self {
        Self::new(column, ColumnRole::Disjoint)
    }

    /// Logical definition column
    #[must_use]
    pub fn equivalence(column: &str) -> Self {
        Self::new(column, ColumnRole::Equivalence)
    }

    /// Property identifier for relation and annotation columns
    #[must_use]
    pub fn role_id(&self) -> Option<&str> {
        match &self.role {
            ColumnRole::Relation { property, .. } | ColumnRole::Annotation { property } => {
                Some(property)
            }
            _ => None,
        }
    }

    /// Whether values are quoted per `;`-separated part
    #[must_use]
    pub fn quote_required(&self) -> bool {
        matches!(self.role, ColumnRole::Disjoint)
    }

    /// ROBOT template code for the second header row
    #[must_use]
    pub fn template_code(&self) -> String {
        match &self.role {
            ColumnRole::Id => "ID".to_string(),
            ColumnRole::Label => "LABEL".to_string(),
            ColumnRole::Parent => "SC % SPLIT=;".to_string(),
            ColumnRole::Relation { property, .. } => format!("SC {property} some % SPLIT=;"),
            ColumnRole::Annotation { property } => format!("A {property} SPLIT=;"),
            ColumnRole::Disjoint => "DC % SPLIT=;".to_string(),
            ColumnRole::Equivalence => "EC %".to_string(),
        }
    }

    /// Clean a raw cell value for the template file
    ///
    /// Non-ASCII characters are dropped, `(...)` and `[...]` segments removed
    /// and the result trimmed. Quote-required columns additionally get each
    /// `;`-separated part trimmed and single-quoted when it contains whitespace.
    #[must_use]
    pub fn transform_value(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };

        let ascii: String = raw.chars().filter(char::is_ascii).collect();
        let without_parens = PAREN_SEGMENT.replace_all(&ascii, "");
        let without_brackets = BRACKET_SEGMENT.replace_all(&without_parens, "");
        let value = without_brackets.trim();

        if self.quote_required() {
            value
                .split(';')
                .map(|part| quote_if_needed(part.trim()))
                .collect::<Vec<_>>()
                .join(";")
        } else {
            value.to_string()
        }
    }
}

/// Header spellings understood without configuration
#[must_use]
pub fn default_header_mappings() -> Vec<(&'static str, ColumnMapping)> {
    vec![
        ("BCIO_ID", ColumnMapping::id("BCIO_ID")),
        ("ID", ColumnMapping::id("ID")),
        ("Name", ColumnMapping::label("Name")),
        ("Label", ColumnMapping::label("Label")),
        ("Label (synonym)", ColumnMapping::label("Label")),
        ("Parent", ColumnMapping::parent("Parent")),
        ("Parent class/ BFO class", ColumnMapping::parent("Parent")),
        (
            "Logical definition",
            ColumnMapping::equivalence("Logical definition"),
        ),
        ("Disjoint classes", ColumnMapping::disjoint("Disjoint classes")),
        (
            "Definition",
            ColumnMapping::annotation("Definition", "IAO:0000115"),
        ),
        (
            "Definition_ID",
            ColumnMapping::annotation("Definition_ID", "rdfs:isDefinedBy"),
        ),
        (
            "Definition_Source",
            ColumnMapping::annotation("Definition_source", "IAO:0000119"),
        ),
        (
            "Definition source",
            ColumnMapping::annotation("Definition source", "IAO:0000119"),
        ),
        ("Examples", ColumnMapping::annotation("Examples", "IAO:0000112")),
        (
            "Examples of usage",
            ColumnMapping::annotation("Examples", "IAO:0000112"),
        ),
        (
            "Elaboration",
            ColumnMapping::annotation("Elaboration", "IAO:0000112"),
        ),
        (
            "Curator note",
            ColumnMapping::annotation("Curator note", "IAO:0000232"),
        ),
        ("Synonyms", ColumnMapping::annotation("Synonyms", "IAO:0000118")),
        ("Comment", ColumnMapping::annotation("Comment", "rdfs:comment")),
        (
            "Curation status",
            ColumnMapping::annotation("Curation status", "IAO:0000078"),
        ),
    ]
}

/// Headers skipped without a warning
pub const DEFAULT_IGNORED_HEADERS: &[&str] =
    &["Structure", "BFO entity", "Sub-ontology", "Informal definition"];
