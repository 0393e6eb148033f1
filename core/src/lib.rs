//! # ontosheets core
//!
//! Core types for turning ontology spreadsheets into ROBOT templates.
//!
//! This crate holds the data model shared by the service crate: column
//! mappings and their value transforms, ontology entities and relations,
//! import records, configuration and the error type.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Core error types
pub mod error;

/// Column roles, template codes and cell value transforms
pub mod mapping;

/// Entity, relation and import types
pub mod types;

/// Configuration structures
pub mod configuration;

/// String helpers for the spreadsheet conventions
pub mod utils;

// Re-export commonly used types
pub use configuration::{HeaderMappingConfig, OntosheetsConfig, RobotConfig, TemplateConfig};
pub use error::{OntoError, Result};
pub use mapping::{ColumnMapping, ColumnRole};
pub use types::{
    EntityKey, Intermediates, OntologyEntity, OntologyImport, OntologyRelation, RelationFact,
    RelationKey,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::configuration::*;
    pub use crate::error::{OntoError, Result};
    pub use crate::mapping::*;
    pub use crate::types::*;
}
