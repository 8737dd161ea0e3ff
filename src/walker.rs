//! Deterministic enumeration of a project tree.

use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{PurgeError, Result};
use crate::logging::Logger;

/// One entry found under the project root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathRecord {
    relative_path: String,
    is_directory: bool,
}

impl PathRecord {
    pub fn new(relative_path: impl Into<String>, is_directory: bool) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_directory,
        }
    }

    pub fn file(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path, false)
    }

    pub fn dir(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path, true)
    }

    /// Root-relative path with `/` separators.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Number of segments below the root (`a` is 1, `a/b` is 2).
    pub fn depth(&self) -> usize {
        self.relative_path.split('/').count()
    }
}

/// Walk every entry strictly below `root`, pre-order, siblings sorted by
/// name.
///
/// Symbolic links are never followed; each one is reported as a file-like
/// leaf, broken or not, so the walk cannot leave the root or visit a
/// directory twice. Entries that cannot be read are skipped with a warning.
pub fn walk(root: &Path, log: &Logger) -> Result<Vec<PathRecord>> {
    walk_counted(root, log).map(|(records, _)| records)
}

/// [`walk`], also returning how many entries were skipped.
fn walk_counted(root: &Path, log: &Logger) -> Result<(Vec<PathRecord>, usize)> {
    let metadata = fs::metadata(root).map_err(|source| PurgeError::FileSystemError {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(PurgeError::FileSystemError {
            path: root.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }
    fs::read_dir(root).map_err(|source| PurgeError::FileSystemError {
        path: root.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    let entries = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                skipped += 1;
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                log.warn_kv("Skipping unreadable path", &[("path", &path), ("error", &err)]);
                continue;
            }
        };

        let Some(relative) = to_relative(root, entry.path()) else {
            skipped += 1;
            log.warn_kv(
                "Skipping path that is not valid UTF-8",
                &[("path", &entry.path().display())],
            );
            continue;
        };

        let is_directory = entry.file_type().is_dir();
        log.trace(format!(
            "  found {}{relative}",
            if is_directory { "dir  " } else { "file " }
        ));
        records.push(PathRecord::new(relative, is_directory));
    }

    log.debug_kv(
        "Walked project tree",
        &[
            ("root", &root.display()),
            ("paths", &records.len()),
            ("skipped", &skipped),
        ],
    );

    Ok((records, skipped))
}

/// Posix form of `path` relative to `root`.
fn to_relative(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
