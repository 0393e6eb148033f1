//! Spreadsheet to ROBOT template conversion
//!
//! Class sheets are interpreted row by row into entities held by an
//! [`EntityStore`](crate::store::EntityStore); the store then feeds the
//! relation cross-linker, the hierarchy resolver and the spreadsheet export.

pub mod builder;
pub mod crosslink;
pub mod export;
pub mod hierarchy;
pub mod interpreter;
pub mod lucid;
pub mod relations;
pub mod table;

pub use builder::{ClassSheetSummary, TemplateBuilder};
pub use crosslink::{CrossLinkReport, MissingEntityPolicy, RelationCrossLinker};
pub use export::{serialize, write_workbook};
pub use hierarchy::{HierarchyOrder, HierarchyResolver, ParentRef};
pub use interpreter::{InterpretedRow, RowInterpreter};
pub use lucid::{LucidDiagram, LucidShape, read_lucidchart, read_lucidchart_file};
pub use table::TemplateTable;
