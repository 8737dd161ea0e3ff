//! # scaffold-purge CLI
//!
//! Trims a generated project scaffold down to the files one variant needs.
//!
//! ## Commands
//!
//! - **purge**: Classify the project against a variant manifest and delete
//!   everything that is neither kept nor protected
//! - **check**: Validate a manifest and compile its patterns
//! - **tree**: Print a project's directory tree
//!
//! ## Quick Start
//!
//! ```bash
//! # Preview what a purge would remove
//! scaffold-purge purge PyFast --project-dir my-service --dry-run
//!
//! # Purge, keep the kafka service, and commit the result
//! scaffold-purge purge PyFast --project-dir my-service --service kafka --git
//! ```
//!
//! ## Environment Variables
//!
//! - `SCAFFOLD_PURGE_MANIFEST_DIR`: Manifest directory (default: ./manifests)
//! - `SCAFFOLD_PURGE_PROJECT_DIR`: Project to purge (default: .)
//! - `SCAFFOLD_PURGE_SERVICES`: Comma-separated services to keep
//! - `SCAFFOLD_PURGE_VERBOSE`: Enable verbose output
//! - `SCAFFOLD_PURGE_QUIET`: Silence all output except errors

use std::io::IsTerminal;

use scaffold_purge::cli::Cli;

fn main() -> miette::Result<()> {
    // Install miette's fancy panic and error report handler
    miette::set_panic_hook();

    // Configure miette handler based on terminal capabilities
    // This provides better error formatting for both TTY and non-TTY environments
    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        // Use a simpler handler for non-TTY environments (CI, logs, etc.)
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Execute the appropriate command
    let result = scaffold_purge::commands::execute(&cli);

    // Convert our error type to miette's Result
    result.map_err(Into::into)
}
