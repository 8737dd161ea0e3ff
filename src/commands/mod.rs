//! Implementation of scaffold-purge subcommands.
//!
//! `mod.rs` is a thin dispatcher; command logic lives in dedicated modules
//! (`purge`, `check`, `tree`).

use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use crate::error::{PurgeError, Result};
use crate::logging::Logger;

pub(crate) mod check;
pub(crate) mod purge;
pub(crate) mod tree;

pub use check::check;
pub use purge::{PurgeCommand, PurgeCommandBuilder};
pub use tree::tree;


/// Execute commands based on the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    execute_with_dir(cli, None)
}

/// Execute commands with an explicit working directory.
///
/// Relative manifest and project paths are resolved against `working_dir`
/// (the process working directory when `None`).
pub fn execute_with_dir(cli: &Cli, working_dir: Option<&Path>) -> Result<()> {
    let quiet = cli.global_opts().quiet();
    let verbose = if quiet {
        0
    } else {
        cli.global_opts().verbose()
    };
    let log = Logger::new(verbose, quiet);

    let current_dir = if let Some(dir) = working_dir {
        dir.to_path_buf()
    } else {
        std::env::current_dir().map_err(|source| PurgeError::IoError {
            path: PathBuf::from("."),
            source,
        })?
    };

    let manifest_dir = resolve(&current_dir, cli.global_opts().manifest_dir());

    match cli.command() {
        Commands::Purge {
            variant,
            project_dir,
            services,
            dry_run,
            git,
            no_tree,
        } => {
            let project_dir = resolve(&current_dir, project_dir);
            PurgeCommand::builder()
                .manifest_dir(&manifest_dir)
                .variant(variant)
                .project_dir(&project_dir)
                .services(services)
                .dry_run(*dry_run)
                .git(*git)
                .print_tree(!*no_tree)
                .logger(log)
                .build()?
                .run()
        }
        Commands::Check { variant, services } => check(&manifest_dir, variant, services, &log),
        Commands::Tree { dir } => tree(&resolve(&current_dir, dir), &log),
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
