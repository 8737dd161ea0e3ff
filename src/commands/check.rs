//! Check command implementation.

use std::path::Path;

use crate::error::Result;
use crate::logging::Logger;
use crate::purge::Specs;

/// Loads the variant's manifest and compiles every pattern.
///
/// Fails exactly where a purge would fail before touching the filesystem.
pub fn check(manifest_dir: &Path, variant: &str, services: &[String], log: &Logger) -> Result<()> {
    log.verbose(1, format!("Checking manifest for variant '{variant}'"));

    let specs = Specs::load(manifest_dir, variant, services, log)?;

    if !log.quiet() {
        let manifest = specs.manifest();
        eprintln!("Manifest OK: {}", manifest.variant());
        eprintln!("  Keep patterns: {}", specs.keep().len());
        eprintln!("  Protected patterns: {}", specs.protected().len());
        if !manifest.services().is_empty() {
            let names: Vec<&str> = manifest.services().keys().map(String::as_str).collect();
            eprintln!("  Services: {}", names.join(", "));
        }
    }

    Ok(())
}
