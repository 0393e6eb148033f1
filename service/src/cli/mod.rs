//! Command line interface for the ontosheets tools.

mod app;
mod types;

pub use app::OntosheetsApp;
pub use types::{OntosheetsCli, OntosheetsCommand};

/// Main entry point of the CLI
///
/// # Errors
///
/// Returns the error of the failed command.
pub fn run() -> ontosheets_core::error::Result<()> {
    OntosheetsApp::from_args().run()
}
