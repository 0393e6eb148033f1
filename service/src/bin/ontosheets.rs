//! `ontosheets` command-line interface
//!
//! Turns ontology spreadsheets into ROBOT templates and drives ROBOT for
//! builds, imports and subsets.

use ontosheets_service::cli;

fn main() -> anyhow::Result<()> {
    cli::run()?;
    Ok(())
}
