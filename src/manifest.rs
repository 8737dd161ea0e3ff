//! Variant manifest discovery and validation.
//!
//! A manifest is a YAML document named after the variant it describes:
//!
//! ```yaml
//! variant: PyFast
//! keep:
//!   - src/app/**
//!   - Dockerfile
//! protected:
//!   - chart
//! services:
//!   kafka:
//!     - src/app/kafka/**
//! ```
//!
//! `keep` is required and must not be empty. `protected` and `services`
//! default to empty. Every pattern loses a single trailing `/` on load, so
//! `src/` and `src` compile to the same rule.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{PurgeError, Result};

static VARIANT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("variant name regex is valid")
});

const EXTENSIONS: [&str; 2] = ["yml", "yaml"];

const EMPTY_KEEP: &str = "`keep:` must list at least one pattern";

/// The pattern collections that drive a purge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    variant: String,
    keep: Vec<String>,
    protected: Vec<String>,
    services: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    keep: Option<Vec<String>>,
    #[serde(default)]
    protected: Option<Vec<String>>,
    #[serde(default)]
    services: Option<BTreeMap<String, Option<Vec<String>>>>,
}

impl Manifest {
    /// Locate and load the manifest for `variant` inside `manifest_dir`.
    ///
    /// The identifier is matched case-insensitively: `PyFast` loads
    /// `pyfast.yml` (or `pyfast.yaml`).
    pub fn load(manifest_dir: &Path, variant: &str) -> Result<Self> {
        let path = manifest_path(manifest_dir, variant)?;
        let text = fs::read_to_string(&path).map_err(|source| PurgeError::IoError {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text, variant, &path)
    }

    /// Parse and validate a manifest document.
    ///
    /// `origin` is only used in error messages.
    pub fn parse(text: &str, variant: &str, origin: &Path) -> Result<Self> {
        let malformed = |reason: String| PurgeError::ManifestMalformed {
            path: origin.to_path_buf(),
            reason,
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| malformed(e.to_string()))?;
        if !value.is_mapping() {
            return Err(malformed("document is not a mapping".to_string()));
        }

        let raw: RawManifest =
            serde_yaml::from_value(value).map_err(|e| malformed(e.to_string()))?;

        let keep = raw
            .keep
            .ok_or_else(|| malformed("missing a `keep:` section".to_string()))?;
        let keep = normalize_all(keep);
        if !keep.iter().any(|p| is_effective(p)) {
            return Err(malformed(EMPTY_KEEP.to_string()));
        }

        let services = raw
            .services
            .unwrap_or_default()
            .into_iter()
            .map(|(name, patterns)| (name, normalize_all(patterns.unwrap_or_default())))
            .collect();

        Ok(Self {
            variant: raw.variant.unwrap_or_else(|| variant.to_string()),
            keep,
            protected: normalize_all(raw.protected.unwrap_or_default()),
            services,
        })
    }

    /// Build a manifest directly from pattern lists.
    pub fn from_patterns(
        variant: impl Into<String>,
        keep: impl IntoIterator<Item = impl Into<String>>,
        protected: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let variant = variant.into();
        let keep = normalize_all(keep.into_iter().map(Into::into).collect());
        if !keep.iter().any(|p| is_effective(p)) {
            return Err(PurgeError::ManifestMalformed {
                path: PathBuf::from(format!("<{variant}>")),
                reason: EMPTY_KEEP.to_string(),
            });
        }

        Ok(Self {
            variant,
            keep,
            protected: normalize_all(protected.into_iter().map(Into::into).collect()),
            services: BTreeMap::new(),
        })
    }

    /// Add (or replace) a service pattern group.
    pub fn with_service(
        mut self,
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.services.insert(
            name.into(),
            normalize_all(patterns.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Display name of the variant.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn keep(&self) -> &[String] {
        &self.keep
    }

    pub fn protected(&self) -> &[String] {
        &self.protected
    }

    pub fn services(&self) -> &BTreeMap<String, Vec<String>> {
        &self.services
    }

    /// Keep patterns followed by the patterns of every enabled service, in
    /// the order the services were requested.
    ///
    /// Returns the combined list and the requested services the manifest
    /// does not define.
    pub fn keep_patterns_for<'a>(
        &self,
        enabled_services: &'a [String],
    ) -> (Vec<String>, Vec<&'a str>) {
        let mut patterns = self.keep.clone();
        let mut unknown = Vec::new();

        for service in enabled_services {
            match self.services.get(service) {
                Some(extra) => patterns.extend(extra.iter().cloned()),
                None => unknown.push(service.as_str()),
            }
        }

        (patterns, unknown)
    }
}

/// Resolve the manifest file for a variant.
pub fn manifest_path(manifest_dir: &Path, variant: &str) -> Result<PathBuf> {
    let name = variant.to_lowercase();
    if !VARIANT_NAME.is_match(&name) {
        return Err(PurgeError::InvalidVariant(variant.to_string()));
    }

    EXTENSIONS
        .iter()
        .map(|ext| manifest_dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| PurgeError::ManifestNotFound {
            variant: variant.to_string(),
            path: manifest_dir.join(format!("{name}.{}", EXTENSIONS[0])),
        })
}

/// Strip a single trailing path separator.
pub fn normalize_pattern(pattern: &str) -> String {
    pattern.strip_suffix('/').unwrap_or(pattern).to_string()
}

/// Whether a keep line can match anything. Blank lines and `#` comments
/// compile to nothing and a `!` line only re-includes.
fn is_effective(pattern: &str) -> bool {
    let line = pattern.trim();
    !line.is_empty() && !line.starts_with('#') && !line.starts_with('!')
}

fn normalize_all(patterns: Vec<String>) -> Vec<String> {
    patterns.iter().map(|p| normalize_pattern(p)).collect()
}
