//! Purge command and helpers.

use std::path::Path;

use crate::classify::{Classification, Plan};
use crate::error::{PurgeError, Result};
use crate::git;
use crate::logging::Logger;
use crate::purge::Purge;
use crate::tree::render_tree;

pub struct PurgeCommand<'a> {
    manifest_dir: &'a Path,
    variant: &'a str,
    project_dir: &'a Path,
    services: &'a [String],
    dry_run: bool,
    git: bool,
    print_tree: bool,
    log: Logger,
}

pub struct PurgeCommandBuilder<'a> {
    manifest_dir: Option<&'a Path>,
    variant: Option<&'a str>,
    project_dir: Option<&'a Path>,
    services: &'a [String],
    dry_run: bool,
    git: bool,
    print_tree: bool,
    log: Logger,
}

impl Default for PurgeCommandBuilder<'_> {
    fn default() -> Self {
        Self {
            manifest_dir: None,
            variant: None,
            project_dir: None,
            services: &[],
            dry_run: false,
            git: false,
            print_tree: true,
            log: Logger::default(),
        }
    }
}

impl<'a> PurgeCommandBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifest_dir(mut self, path: &'a Path) -> Self {
        self.manifest_dir = Some(path);
        self
    }

    pub fn variant(mut self, variant: &'a str) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn project_dir(mut self, path: &'a Path) -> Self {
        self.project_dir = Some(path);
        self
    }

    pub fn services(mut self, services: &'a [String]) -> Self {
        self.services = services;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn git(mut self, git: bool) -> Self {
        self.git = git;
        self
    }

    pub fn print_tree(mut self, print_tree: bool) -> Self {
        self.print_tree = print_tree;
        self
    }

    pub fn logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn build(self) -> Result<PurgeCommand<'a>> {
        let missing = |what: &str| PurgeError::ConfigError(format!("{what} is required"));

        Ok(PurgeCommand {
            manifest_dir: self.manifest_dir.ok_or_else(|| missing("Manifest directory"))?,
            variant: self.variant.ok_or_else(|| missing("Variant"))?,
            project_dir: self.project_dir.ok_or_else(|| missing("Project directory"))?,
            services: self.services,
            dry_run: self.dry_run,
            git: self.git,
            print_tree: self.print_tree,
            log: self.log,
        })
    }
}

impl<'a> PurgeCommand<'a> {
    pub fn builder<'b>() -> PurgeCommandBuilder<'b> {
        PurgeCommandBuilder::new()
    }

    /// Execute the purge command
    pub fn run(self) -> Result<()> {
        self.log
            .info(format!("Starting purge for variant: {}", self.variant));

        let report = Purge::builder()
            .manifest_dir(self.manifest_dir)
            .variant(self.variant)
            .project_dir(self.project_dir)
            .services(self.services)
            .dry_run(self.dry_run)
            .logger(self.log)
            .build()?
            .run()?;

        if report.is_dry_run() {
            print_plan(report.plan());
            return Ok(());
        }

        if self.print_tree
            && let Some(listing) = tree_listing(self.project_dir, &self.log)
        {
            if !self.log.quiet() {
                eprintln!("{}", divider("Project tree after purge"));
            }
            println!("{}", self.project_dir.display());
            print!("{listing}");
        }

        // After the listing, so `.git` is not part of it.
        if self.git {
            git::init_repo(self.project_dir, &self.log)?;
            git::stage_and_commit(self.project_dir, &self.log)?;
        }

        Ok(())
    }
}

/// Renders the post-purge listing. A tree that cannot be read after a
/// successful purge is only a warning.
fn tree_listing(project_dir: &Path, log: &Logger) -> Option<String> {
    match render_tree(project_dir, log) {
        Ok(listing) => Some(listing),
        Err(err) => {
            log.warn_kv("Could not list project tree", &[("error", &err)]);
            None
        }
    }
}

/// Writes the classification of a dry run to stdout.
fn print_plan(plan: &Plan) {
    for entry in plan.entries() {
        let label = match (entry.classification, entry.implied) {
            (Classification::Keep, true) => "keep*",
            (Classification::Keep, false) => "keep",
            (Classification::Protected, _) => "protected",
            (Classification::Delete, _) => "delete",
        };
        let suffix = if entry.record.is_directory() { "/" } else { "" };
        println!("{label:<10} {}{suffix}", entry.record.relative_path());
    }

    let counts = plan.counts();
    println!(
        "{} kept ({} implied), {} protected, {} to delete",
        counts.kept, counts.implied, counts.protected, counts.deleted
    );
}

fn divider(title: &str) -> String {
    format!("{:-^70}", format!(" {title} "))
}
