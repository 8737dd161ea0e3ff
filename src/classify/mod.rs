//! Keep / protected / delete classification of a walked tree.
//!
//! Classification runs in two passes with a propagation step between them:
//!
//! 1. **Explicit matches.** Every path the keep spec matches is `Keep`.
//! 2. **Ancestor propagation.** Every directory above an explicitly kept path
//!    or a protected directory is *implied* `Keep`. Removing such a directory
//!    would take a surviving path with it.
//! 3. **Remaining paths.** A directory the protected spec matches, and
//!    anything below one, is `Protected`. Everything else is `Delete`.
//!
//! Files are never protected by naming them in the protected spec; only by
//! living under a protected directory.
//!
//! Both passes are read-only and evaluated in parallel. The resulting
//! [`Plan`] keeps walk order.

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;

use crate::logging::Logger;
use crate::matcher::{CompiledSpec, parent_of};
use crate::walker::PathRecord;


/// The fate of a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Keep,
    Protected,
    Delete,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Keep => "keep",
            Classification::Protected => "protected",
            Classification::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// A path together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    pub record: PathRecord,
    pub classification: Classification,
    /// `Keep` only because something below it survives.
    pub implied: bool,
}

/// Per-class totals of a [`Plan`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlanCounts {
    /// Explicit and implied keeps together
    pub kept: usize,
    /// The implied share of `kept`
    pub implied: usize,
    pub protected: usize,
    pub deleted: usize,
}

/// The outcome of classifying one walk.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    entries: Vec<ClassifiedPath>,
}

impl Plan {
    pub fn entries(&self) -> &[ClassifiedPath] {
        &self.entries
    }

    pub fn kept(&self) -> impl Iterator<Item = &PathRecord> {
        self.with(Classification::Keep)
    }

    pub fn protected(&self) -> impl Iterator<Item = &PathRecord> {
        self.with(Classification::Protected)
    }

    pub fn deleted(&self) -> impl Iterator<Item = &PathRecord> {
        self.with(Classification::Delete)
    }

    /// The records the deleter has to remove.
    pub fn delete_set(&self) -> Vec<PathRecord> {
        self.deleted().cloned().collect()
    }

    /// Classification of `relative_path`, if it was part of the walk.
    pub fn classification_of(&self, relative_path: &str) -> Option<Classification> {
        self.entries
            .iter()
            .find(|entry| entry.record.relative_path() == relative_path)
            .map(|entry| entry.classification)
    }

    pub fn counts(&self) -> PlanCounts {
        let mut counts = PlanCounts::default();
        for entry in &self.entries {
            match entry.classification {
                Classification::Keep => {
                    counts.kept += 1;
                    if entry.implied {
                        counts.implied += 1;
                    }
                }
                Classification::Protected => counts.protected += 1,
                Classification::Delete => counts.deleted += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with(&self, class: Classification) -> impl Iterator<Item = &PathRecord> {
        self.entries
            .iter()
            .filter(move |entry| entry.classification == class)
            .map(|entry| &entry.record)
    }
}

/// Applies a keep spec and a protected spec to walked paths.
pub struct Classifier<'a> {
    keep: &'a CompiledSpec,
    protected: &'a CompiledSpec,
    log: Logger,
}

impl<'a> Classifier<'a> {
    pub fn new(keep: &'a CompiledSpec, protected: &'a CompiledSpec, log: Logger) -> Self {
        Self {
            keep,
            protected,
            log,
        }
    }

    pub fn classify(&self, records: &[PathRecord]) -> Plan {
        let explicit: Vec<bool> = records
            .par_iter()
            .map(|record| {
                self.keep
                    .matches(record.relative_path(), record.is_directory())
            })
            .collect();

        let protected: Vec<bool> = records
            .par_iter()
            .map(|record| self.is_protected(record))
            .collect();

        let mut ancestors: HashSet<&str> = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            let survives = explicit[index] || (protected[index] && record.is_directory());
            if survives {
                mark_ancestors(record.relative_path(), &mut ancestors);
            }
        }

        let entries: Vec<ClassifiedPath> = records
            .par_iter()
            .enumerate()
            .map(|(index, record)| {
                let (classification, implied) = if explicit[index] {
                    (Classification::Keep, false)
                } else if ancestors.contains(record.relative_path()) {
                    (Classification::Keep, true)
                } else if protected[index] {
                    (Classification::Protected, false)
                } else {
                    (Classification::Delete, false)
                };

                ClassifiedPath {
                    record: record.clone(),
                    classification,
                    implied,
                }
            })
            .collect();

        if self.log.enabled(2) {
            for entry in &entries {
                self.log.trace(format!(
                    "  {:<9} {}{}",
                    entry.classification.to_string().to_uppercase(),
                    entry.record.relative_path(),
                    if entry.implied { " (implied)" } else { "" }
                ));
            }
        }

        Plan { entries }
    }

    fn is_protected(&self, record: &PathRecord) -> bool {
        if self.protected.is_empty() {
            return false;
        }
        let path = record.relative_path();
        if record.is_directory() {
            self.protected.matches(path, true)
        } else {
            self.protected.matches_ancestor(path)
        }
    }
}

/// Insert every proper ancestor of `path` into `ancestors`.
fn mark_ancestors<'p>(path: &'p str, ancestors: &mut HashSet<&'p str>) {
    let mut current = path;
    while let Some(parent) = parent_of(current) {
        if !ancestors.insert(parent) {
            // Already marked, so everything above it is too.
            break;
        }
        current = parent;
    }
}
