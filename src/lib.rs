//! # scaffold-purge
//!
//! Trims a freshly generated project scaffold down to a single variant.
//!
//! ## Overview
//!
//! A project template ships every variant it supports (languages, frameworks,
//! optional services). After generation, scaffold-purge reads the chosen
//! variant's manifest, classifies every path in the project as keep,
//! protected or delete, and removes the delete set.
//!
//! ## Manifests
//!
//! Manifests live in a manifest directory as `<variant>.yml` (or `.yaml`),
//! with the variant name lower-cased:
//!
//! ```yaml
//! variant: PyFast
//! keep:
//!   - app/
//!   - pyproject.toml
//!   - "**/*.md"
//! protected:
//!   - chart/
//! services:
//!   kafka:
//!     - app/kafka/
//! ```
//!
//! Patterns use gitignore syntax. A pattern matching a directory covers its
//! whole subtree, and the directories above any kept path are kept too.
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: Implementation of all scaffold-purge subcommands
//! - [`error`]: Error types and handling with thiserror + miette
//! - [`manifest`]: Manifest lookup and parsing
//! - [`matcher`]: Compiled gitignore-style pattern sets
//! - [`walker`]: Deterministic project walk
//! - [`classify`]: Keep / protected / delete classification
//! - [`delete`]: Ordered, best-effort removal of the delete set
//! - [`purge`]: The end-to-end purge pipeline
//! - [`tree`]: Directory tree rendering
//! - [`git`]: Optional repository initialization
//!
//! ## Library Usage
//!
//! ```no_run
//! use scaffold_purge::cli::{Cli, Commands};
//! use scaffold_purge::commands;
//!
//! let cli = Cli::builder()
//!     .manifest_dir("templates/manifests")
//!     .command(Commands::Purge {
//!         variant: "PyFast".to_string(),
//!         project_dir: "my-service".into(),
//!         services: vec!["kafka".to_string()],
//!         dry_run: true,
//!         git: false,
//!         no_tree: false,
//!     })
//!     .build()?;
//!
//! commands::execute(&cli)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! The crate uses a combination of:
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in CLI
//!
//! Any manifest or pattern error is reported before the first deletion.

pub mod classify;
pub mod cli;
pub mod commands;
pub mod delete;
pub mod error;
pub mod git;
pub mod logging;
pub mod manifest;
pub mod matcher;
pub mod purge;
pub mod tree;
pub mod walker;
