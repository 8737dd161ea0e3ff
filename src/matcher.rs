//! Compiled gitignore-style pattern sets.
//!
//! A [`CompiledSpec`] answers one question: does a root-relative path fall
//! under the pattern list? Matching follows gitignore ("wildmatch") rules:
//!
//! - `*` and `?` never cross a `/`; `**` does
//! - a pattern without an inner `/` matches at any depth
//! - a leading `/` anchors the pattern to the root
//! - a path matches when it, or any directory above it, matches; so `configs`
//!   covers `configs/sub/prod.yaml`
//! - patterns apply in order and a later `!pattern` re-includes what an
//!   earlier one matched

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{PurgeError, Result};

/// An immutable matcher built from an ordered pattern list.
#[derive(Debug, Clone)]
pub struct CompiledSpec {
    inner: Gitignore,
    len: usize,
}

impl CompiledSpec {
    /// Compile `patterns` in order.
    ///
    /// Fails on the first pattern that is not a valid glob.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new("");
        let mut len = 0;

        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|source| PurgeError::PatternCompileError {
                    pattern: pattern.to_string(),
                    source,
                })?;
            len += 1;
        }

        let inner = builder
            .build()
            .map_err(|source| PurgeError::PatternCompileError {
                pattern: "<pattern set>".to_string(),
                source,
            })?;

        Ok(Self { inner, len })
    }

    /// A spec that matches nothing.
    pub fn empty() -> Self {
        Self {
            inner: Gitignore::empty(),
            len: 0,
        }
    }

    /// Whether `path` (forward slashes, no leading slash) is covered.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.inner.is_empty() || path.is_empty() {
            return false;
        }
        self.inner
            .matched_path_or_any_parents(Path::new(path), is_dir)
            .is_ignore()
    }

    /// Whether some directory strictly above `path` is covered.
    ///
    /// The path itself is not tested, so a file is never matched by a
    /// pattern that names the file.
    pub fn matches_ancestor(&self, path: &str) -> bool {
        match parent_of(path) {
            Some(parent) => self.matches(parent, true),
            None => false,
        }
    }

    /// Number of pattern lines compiled into this spec.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The parent of a root-relative posix path, or `None` at the top level.
pub fn parent_of(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}
