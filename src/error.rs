//! Error types for scaffold-purge.
//!
//! This module defines all error types used throughout scaffold-purge, using
//! a combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - All errors derive from [`PurgeError`]
//! - Manifest, pattern and walk-root errors are fatal and surface before any
//!   file is removed
//! - [`PurgeError::DeletionError`] is never propagated out of a purge; the
//!   deleter collects it per path and carries on
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use scaffold_purge::error::{PurgeError, Result};
//!
//! fn check_root(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(PurgeError::FileSystemError {
//!             path: path.to_path_buf(),
//!             source: std::io::Error::from(std::io::ErrorKind::NotFound),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in scaffold-purge operations
#[derive(Error, Debug, Diagnostic)]
pub enum PurgeError {
    /// No manifest document exists for the requested variant.
    ///
    /// Both `<variant>.yml` and `<variant>.yaml` were looked up in the
    /// manifest directory. `path` names the first candidate.
    #[error("No manifest found for variant '{variant}' (expected '{}')", .path.display())]
    #[diagnostic(
        code(scaffold_purge::manifest::not_found),
        help(
            "Pass --manifest-dir or set SCAFFOLD_PURGE_MANIFEST_DIR to the directory holding the \
             variant manifests."
        )
    )]
    ManifestNotFound {
        /// The variant identifier that was requested
        variant: String,
        /// The manifest path that was expected
        path: PathBuf,
    },

    /// The manifest document exists but does not have the required shape.
    ///
    /// Raised when the document is not a mapping, when `keep` is missing or
    /// empty, or when a pattern list is not a sequence of strings.
    #[error("Malformed manifest '{}': {reason}", .path.display())]
    #[diagnostic(
        code(scaffold_purge::manifest::malformed),
        help(
            "A manifest needs a non-empty `keep:` list; `protected:` and `services:` are \
             optional."
        )
    )]
    ManifestMalformed {
        /// The manifest file that failed validation
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The variant identifier is not a plain manifest name.
    #[error("Invalid variant identifier '{0}'")]
    #[diagnostic(
        code(scaffold_purge::manifest::invalid_variant),
        help("Variant names may only contain letters, digits, '.', '_' and '-'.")
    )]
    InvalidVariant(
        /// The rejected identifier
        String,
    ),

    /// A glob pattern could not be compiled.
    #[error("Failed to compile pattern '{pattern}'")]
    #[diagnostic(
        code(scaffold_purge::pattern::compile_error),
        help(
            "Patterns use gitignore syntax. Character ranges must ascend ('[a-z]', not \
             '[z-a]') and a pattern cannot end in a lone '\\'."
        )
    )]
    PatternCompileError {
        /// The offending pattern
        pattern: String,
        /// The underlying glob error
        #[source]
        source: ignore::Error,
    },

    /// The project root is missing, not a directory, or not readable.
    #[error("Cannot walk project root '{}'", .path.display())]
    #[diagnostic(
        code(scaffold_purge::walk::root_error),
        help("Check that the project directory exists and is readable.")
    )]
    FileSystemError {
        /// The root that could not be walked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A single path could not be removed.
    ///
    /// Only ever reported inside a [`crate::delete::DeleteReport`]; a purge
    /// never fails because of it.
    #[error("Failed to remove '{}'", .path.display())]
    #[diagnostic(code(scaffold_purge::delete::error))]
    DeletionError {
        /// The path that survived
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File system I/O error outside the walk and delete phases.
    #[error("I/O error accessing '{}'", .path.display())]
    #[diagnostic(code(scaffold_purge::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Repository initialisation or the initial commit failed.
    #[error("Git operation failed")]
    #[diagnostic(code(scaffold_purge::git::error))]
    GitError(#[from] git2::Error),

    /// Invalid programmatic or command-line configuration.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(scaffold_purge::config::error),
        help("Check the required configuration parameters.")
    )]
    ConfigError(
        /// Description of the configuration error
        String,
    ),
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PurgeError>;
