//! The purge pipeline: load, compile, walk, classify, delete.
//!
//! Every fatal error (manifest, pattern, or walk root) is raised before the
//! first removal, so an invalid manifest never leaves a half-purged tree.
//! Once deletion starts, failures are collected per path in the
//! [`DeleteReport`] instead of being raised.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use scaffold_purge::logging::Logger;
//! use scaffold_purge::purge::Purge;
//!
//! let services = vec!["kafka".to_string()];
//! let report = Purge::builder()
//!     .manifest_dir(Path::new("manifests"))
//!     .variant("PyFast")
//!     .project_dir(Path::new("my-service"))
//!     .services(&services)
//!     .logger(Logger::new(1, false))
//!     .build()?
//!     .run()?;
//!
//! println!("deleted {} paths", report.plan().counts().deleted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::classify::{Classifier, Plan};
use crate::delete::{DeleteReport, Deleter};
use crate::error::{PurgeError, Result};
use crate::logging::Logger;
use crate::manifest::Manifest;
use crate::matcher::CompiledSpec;
use crate::walker::walk;

/// A manifest together with its compiled keep and protected specs.
#[derive(Debug, Clone)]
pub struct Specs {
    manifest: Manifest,
    keep: CompiledSpec,
    protected: CompiledSpec,
    unknown_services: Vec<String>,
}

impl Specs {
    /// Load the manifest for `variant` and compile it.
    pub fn load(
        manifest_dir: &Path,
        variant: &str,
        services: &[String],
        log: &Logger,
    ) -> Result<Self> {
        let manifest = Manifest::load(manifest_dir, variant)?;
        Self::compile(manifest, services, log)
    }

    /// Compile keep patterns (plus enabled services) and protected patterns.
    pub fn compile(manifest: Manifest, services: &[String], log: &Logger) -> Result<Self> {
        let (keep_patterns, unknown) = manifest.keep_patterns_for(services);
        for service in &unknown {
            log.warn_kv(
                "Service not defined in manifest; ignoring",
                &[("service", service), ("variant", &manifest.variant())],
            );
        }
        let unknown_services = unknown.into_iter().map(str::to_string).collect();

        let keep = CompiledSpec::compile(&keep_patterns)?;
        let protected = CompiledSpec::compile(manifest.protected())?;

        log.info_kv(
            "Loaded manifest",
            &[
                ("variant", &manifest.variant()),
                ("keep", &keep.len()),
                ("protected", &protected.len()),
            ],
        );
        for pattern in &keep_patterns {
            log.debug(format!("  Keep pattern: {pattern}"));
        }
        for pattern in manifest.protected() {
            log.debug(format!("  Protected pattern: {pattern}"));
        }

        Ok(Self {
            manifest,
            keep,
            protected,
            unknown_services,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn keep(&self) -> &CompiledSpec {
        &self.keep
    }

    pub fn protected(&self) -> &CompiledSpec {
        &self.protected
    }

    /// Requested services the manifest does not define.
    pub fn unknown_services(&self) -> &[String] {
        &self.unknown_services
    }
}

/// Result of a purge run.
#[derive(Debug)]
pub struct PurgeReport {
    variant: String,
    plan: Plan,
    deletion: Option<DeleteReport>,
}

impl PurgeReport {
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// `None` for a dry run.
    pub fn deletion(&self) -> Option<&DeleteReport> {
        self.deletion.as_ref()
    }

    pub fn is_dry_run(&self) -> bool {
        self.deletion.is_none()
    }
}

/// A configured purge of one project tree.
pub struct Purge<'a> {
    source: ManifestSource<'a>,
    project_dir: &'a Path,
    services: &'a [String],
    dry_run: bool,
    log: Logger,
    cancel: Option<&'a AtomicBool>,
}

enum ManifestSource<'a> {
    Directory { dir: &'a Path, variant: &'a str },
    Inline(Manifest),
}

#[derive(Default)]
pub struct PurgeBuilder<'a> {
    manifest_dir: Option<&'a Path>,
    variant: Option<&'a str>,
    manifest: Option<Manifest>,
    project_dir: Option<&'a Path>,
    services: &'a [String],
    dry_run: bool,
    log: Logger,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> PurgeBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifest_dir(mut self, dir: &'a Path) -> Self {
        self.manifest_dir = Some(dir);
        self
    }

    pub fn variant(mut self, variant: &'a str) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Use an already loaded manifest instead of looking one up.
    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn project_dir(mut self, dir: &'a Path) -> Self {
        self.project_dir = Some(dir);
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

    pub fn logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn build(self) -> Result<Purge<'a>> {
        let project_dir = self.project_dir.ok_or_else(|| {
            PurgeError::ConfigError("A project directory is required".to_string())
        })?;

        let source = match (self.manifest, self.manifest_dir, self.variant) {
            (Some(manifest), _, _) => ManifestSource::Inline(manifest),
            (None, Some(dir), Some(variant)) => ManifestSource::Directory { dir, variant },
            (None, _, None) => {
                return Err(PurgeError::ConfigError(
                    "A variant or a manifest is required".to_string(),
                ));
            }
            (None, None, Some(_)) => {
                return Err(PurgeError::ConfigError(
                    "A manifest directory is required to look up a variant".to_string(),
                ));
            }
        };

        Ok(Purge {
            source,
            project_dir,
            services: self.services,
            dry_run: self.dry_run,
            log: self.log,
            cancel: self.cancel,
        })
    }
}

impl<'a> Purge<'a> {
    pub fn builder<'b>() -> PurgeBuilder<'b> {
        PurgeBuilder::new()
    }

    /// Load and compile the manifest without touching the project tree.
    pub fn specs(&self) -> Result<Specs> {
        match &self.source {
            ManifestSource::Directory { dir, variant } => {
                Specs::load(dir, variant, self.services, &self.log)
            }
            ManifestSource::Inline(manifest) => {
                Specs::compile(manifest.clone(), self.services, &self.log)
            }
        }
    }

    /// Load, walk, and classify. Nothing is removed.
    pub fn plan(&self) -> Result<(Specs, Plan)> {
        let specs = self.specs()?;

        self.log.info_kv(
            "Scanning project",
            &[("root", &self.project_dir.display())],
        );
        let records = walk(self.project_dir, &self.log)?;
        let plan = Classifier::new(specs.keep(), specs.protected(), self.log).classify(&records);

        let counts = plan.counts();
        self.log.info_kv(
            "Classified project tree",
            &[
                ("paths", &plan.len()),
                ("kept", &counts.kept),
                ("implied", &counts.implied),
                ("protected", &counts.protected),
                ("deleted", &counts.deleted),
            ],
        );

        Ok((specs, plan))
    }

    /// Run the whole pipeline.
    pub fn run(self) -> Result<PurgeReport> {
        let (specs, plan) = self.plan()?;
        let variant = specs.manifest().variant().to_string();

        if self.dry_run {
            self.log.info("Dry run: nothing was deleted");
            return Ok(PurgeReport {
                variant,
                plan,
                deletion: None,
            });
        }

        let mut deleter = Deleter::new(self.project_dir, self.log);
        if let Some(flag) = self.cancel {
            deleter = deleter.with_cancel(flag);
        }
        let deletion = deleter.delete(&plan.delete_set());

        self.log.info_kv(
            "Purge complete",
            &[
                ("variant", &variant),
                ("files_removed", &deletion.files_removed),
                ("dirs_removed", &deletion.dirs_removed),
                ("failures", &deletion.failures.len()),
            ],
        );
        if !deletion.failures.is_empty() {
            self.log.warn(format!(
                "{} path(s) could not be removed{}",
                deletion.failures.len(),
                if self.log.level() == 0 {
                    "; run with -v for details"
                } else {
                    ""
                }
            ));
            for failure in &deletion.failures {
                self.log.debug(format!("  {failure}"));
            }
        }

        Ok(PurgeReport {
            variant,
            plan,
            deletion: Some(deletion),
        })
    }
}
