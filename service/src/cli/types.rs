//! CLI type definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ontology spreadsheet tools
#[derive(Parser, Debug)]
#[command(
    name = "ontosheets",
    version,
    about = "Turn ontology spreadsheets into ROBOT templates and drive ROBOT"
)]
pub struct OntosheetsCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: OntosheetsCommand,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum OntosheetsCommand {
    /// Write a ROBOT template for each class spreadsheet
    Template {
        /// Class spreadsheets (.xlsx, .xls, .ods)
        #[arg(required = true, value_name = "EXCEL_FILE")]
        inputs: Vec<PathBuf>,

        /// Directory the templates are written to (defaults to each input's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Fail on headers without a mapping
        #[arg(long)]
        strict: bool,
    },

    /// Write the relation creation template of a relations spreadsheet
    Relations {
        /// Relations spreadsheet
        #[arg(value_name = "EXCEL_FILE")]
        input: PathBuf,

        /// Output template CSV
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Merge class spreadsheets, relations and diagram links into one spreadsheet
    Export {
        /// Class spreadsheets
        #[arg(required = true, value_name = "EXCEL_FILE")]
        classes: Vec<PathBuf>,

        /// Relations spreadsheet
        #[arg(short, long, value_name = "FILE")]
        relations: Option<PathBuf>,

        /// Lucidchart CSV export with relation links
        #[arg(short, long, value_name = "FILE")]
        lucidchart: Option<PathBuf>,

        /// Header of the id column (overrides the configuration)
        #[arg(long, value_name = "NAME")]
        id_column: Option<String>,

        /// Output spreadsheet
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Build an ontology from a ROBOT template
    Build {
        /// ROBOT template CSV
        #[arg(value_name = "CSV_FILE")]
        template: PathBuf,

        /// Output OWL file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// IRI of the built ontology
        #[arg(long, value_name = "IRI")]
        ontology_iri: String,

        /// ROBOT prefix, e.g. "BCIO: http://example.org/BCIO_"
        #[arg(long = "prefix", value_name = "PREFIX")]
        prefixes: Vec<String>,

        /// Comma-separated ontology files to import
        #[arg(long, value_name = "FILES")]
        dependencies: Option<String>,

        /// IRI prefix of the imported files
        #[arg(long, value_name = "IRI", default_value = "")]
        iri_prefix: String,
    },

    /// Download, extract and merge imported terms listed in an imports spreadsheet
    Imports {
        /// Imports spreadsheet
        #[arg(value_name = "EXCEL_FILE")]
        input: PathBuf,

        /// IRI of the merged imports ontology
        #[arg(long, value_name = "IRI")]
        merged_iri: String,

        /// Name of the importing ontology, used in the annotation
        #[arg(long, value_name = "NAME")]
        name: String,

        /// Merged output OWL file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Template with additional content for the imports ontology
        #[arg(long, value_name = "CSV_FILE")]
        additional_content: Option<PathBuf>,

        /// File listing metadata terms to strip from the imports ontology
        #[arg(long, value_name = "FILE")]
        remove_metadata: Option<PathBuf>,

        /// Also write an OBO copy
        #[arg(long)]
        obo: bool,
    },

    /// Extract the branch below a term
    Subset {
        /// Ontology to extract from
        #[arg(value_name = "OWL_FILE")]
        input: PathBuf,

        /// Output OWL file, or table with --export-headers
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Term the branch starts from
        #[arg(long, value_name = "ID")]
        root: String,

        /// ROBOT prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: String,

        /// Export a table with these `|`-separated headers instead of OWL
        #[arg(long, value_name = "HEADERS")]
        export_headers: Option<String>,

        /// Sort column of the exported table
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,
    },
}
