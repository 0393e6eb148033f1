//! # ontosheets
//!
//! Ontology spreadsheets to ROBOT templates.
//!
//! Curators keep ontology classes in spreadsheets whose column headers say
//! what each column holds. This crate reads those sheets, maps every header
//! to a ROBOT template code and writes the template CSV that ROBOT turns
//! into OWL. It also builds the relation creation template, merges class
//! sheets with relation links from a Lucidchart export into one spreadsheet,
//! and drives ROBOT for template builds, imported terms and subsets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ontosheets_core::TemplateConfig;
//! use ontosheets_service::template::TemplateBuilder;
//! use std::path::Path;
//!
//! # fn main() -> ontosheets_core::Result<()> {
//! let mut builder = TemplateBuilder::new(&TemplateConfig::default());
//! let summary = builder.add_classes_from_excel(
//!     Path::new("Upper Level BCIO.xlsx"),
//!     Some(Path::new("Upper Level BCIO.csv")),
//! )?;
//! println!("{} classes", summary.table.rows.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Header to column mapping registry
pub mod registry;

/// Spreadsheet reading
pub mod sheet;

/// Entity and relation store with name and id indexes
pub mod store;

/// Template, hierarchy and spreadsheet generation
pub mod template;

/// ROBOT invocation
pub mod robot;

/// Configuration loading
pub mod config;

/// Command line interface
pub mod cli;

pub use config::{load_config, load_ontosheets_config};
pub use registry::{ColumnMappingRegistry, ResolvedColumn, ResolvedHeaders};
pub use robot::{Robot, RobotCommand, ShellExecutor};
pub use sheet::{Row, SheetReader, WorkbookReader};
pub use store::EntityStore;
pub use template::{TemplateBuilder, TemplateTable};
