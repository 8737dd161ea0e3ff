//! Command-line interface definitions for scaffold-purge.
//!
//! This module defines the CLI structure using clap, including all subcommands
//! and their arguments. The main entry point is the [`Cli`] struct.
//!
//! # Example
//!
//! ```no_run
//! use scaffold_purge::cli::{Cli, Commands};
//!
//! // Parse command-line arguments
//! let cli = Cli::parse_args();
//!
//! // Access the parsed command
//! match cli.command() {
//!     Commands::Purge { variant, .. } => println!("Purging for {variant}"),
//!     _ => {}
//! }
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::{PurgeError, Result};


/// Main command-line interface for scaffold-purge.
///
/// This struct represents the top-level CLI configuration, containing both
/// global options that apply to all commands and the specific subcommand
/// to execute.
#[derive(Debug, Parser)]
#[command(
    name = "scaffold-purge",
    bin_name = "scaffold-purge",
    author,
    version,
    about = "Trim a generated project scaffold down to one variant",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Global options that apply to all scaffold-purge commands.
#[derive(Debug, Parser)]
pub struct GlobalOpts {
    /// Directory holding the `<variant>.yml` manifests
    #[arg(
        long,
        global = true,
        default_value = "manifests",
        env = "SCAFFOLD_PURGE_MANIFEST_DIR"
    )]
    manifest_dir: PathBuf,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = "SCAFFOLD_PURGE_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        env = "SCAFFOLD_PURGE_QUIET"
    )]
    quiet: bool,
}

impl GlobalOpts {
    /// Create a new builder for constructing `GlobalOpts` programmatically.
    pub fn builder() -> GlobalOptsBuilder {
        GlobalOptsBuilder::default()
    }

    /// Get the manifest directory
    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Builder for constructing `GlobalOpts` programmatically.
#[derive(Default)]
pub struct GlobalOptsBuilder {
    manifest_dir: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
}

impl GlobalOptsBuilder {
    /// Set the manifest directory.
    pub fn manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = Some(dir.into());
        self
    }

    /// Set the verbosity level (0 = normal, 1+ = verbose).
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable or disable quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the `GlobalOpts` instance with the configured values.
    pub fn build(self) -> GlobalOpts {
        GlobalOpts {
            manifest_dir: self
                .manifest_dir
                .unwrap_or_else(|| PathBuf::from("manifests")),
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    /// Get the global options
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    /// Get the command
    pub fn command(&self) -> &Commands {
        &self.command
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    manifest_dir: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
    command: Option<Commands>,
}

impl CliBuilder {
    /// Set the manifest directory
    pub fn manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = Some(dir.into());
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Set the command
    pub fn command(mut self, command: Commands) -> Self {
        self.command = Some(command);
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let command = self
            .command
            .ok_or_else(|| PurgeError::ConfigError("Command is required".to_string()))?;

        let mut global_opts = GlobalOpts::builder()
            .verbose(self.verbose)
            .quiet(self.quiet);
        if let Some(dir) = self.manifest_dir {
            global_opts = global_opts.manifest_dir(dir);
        }

        Ok(Cli {
            global_opts: global_opts.build(),
            command,
        })
    }
}

/// Available scaffold-purge subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Delete everything the variant's manifest does not keep
    ///
    /// Walks the project directory, classifies every path as keep, protected
    /// or delete, and removes the delete set:
    /// - Paths matching a `keep:` pattern (or an enabled service's patterns)
    ///   survive, along with every directory above them
    /// - Directories matching a `protected:` pattern survive with their
    ///   contents
    /// - Everything else is removed, files first, then directories deepest
    ///   first
    Purge {
        /// Variant whose manifest selects what to keep (e.g. "PyFast")
        variant: String,

        /// Root of the generated project
        #[arg(long, default_value = ".", env = "SCAFFOLD_PURGE_PROJECT_DIR")]
        project_dir: PathBuf,

        /// Enable a service's extra keep patterns (repeatable or comma-separated)
        #[arg(
            long = "service",
            value_delimiter = ',',
            env = "SCAFFOLD_PURGE_SERVICES"
        )]
        services: Vec<String>,

        /// Show what would be deleted without actually deleting
        #[arg(long, env = "SCAFFOLD_PURGE_DRY_RUN")]
        dry_run: bool,

        /// Initialize a Git repository and commit the result
        ///
        /// Runs after the purge. A later purge of the same project removes
        /// `.git` unless the manifest keeps or protects it.
        #[arg(long, env = "SCAFFOLD_PURGE_GIT")]
        git: bool,

        /// Skip the project tree listing after the purge
        #[arg(long)]
        no_tree: bool,
    },

    /// Validate a manifest and its patterns without touching any project
    Check {
        /// Variant whose manifest should be checked
        variant: String,

        /// Services to include when compiling keep patterns
        #[arg(long = "service", value_delimiter = ',')]
        services: Vec<String>,
    },

    /// Print the directory tree of a project
    Tree {
        /// Directory to list
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}
