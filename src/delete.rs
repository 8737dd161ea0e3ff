//! Ordered, best-effort removal of a delete set.
//!
//! The delete set is processed one top-level entry at a time. Within an
//! entry, files go first; they have no children and can be removed in any
//! order. Directories follow, deepest first, so a directory is only removed
//! once every deletable entry beneath it is gone. A failure on one path is
//! recorded and the remaining paths are still attempted.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::PurgeError;
use crate::logging::Logger;
use crate::walker::PathRecord;

/// File-removal primitives used by the [`Deleter`].
pub trait Remover {
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and whatever is still inside it.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// [`Remover`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl Remover for FsRemover {
    /// Also used for symbolic links, which the walker reports as leaves.
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        #[cfg(windows)]
        {
            use std::os::windows::fs::FileTypeExt;

            // Directory symlinks are removed with `RemoveDirectory` on Windows.
            if fs::symlink_metadata(path)?.file_type().is_symlink_dir() {
                return fs::remove_dir(path);
            }
        }
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// What a deletion pass did.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub files_removed: usize,
    pub dirs_removed: usize,
    /// One [`PurgeError::DeletionError`] per path that survived
    pub failures: Vec<PurgeError>,
    /// The cancellation flag stopped the pass early
    pub aborted: bool,
}

impl DeleteReport {
    pub fn removed(&self) -> usize {
        self.files_removed + self.dirs_removed
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }
}

/// Removes classified paths below a project root.
pub struct Deleter<'a> {
    root: &'a Path,
    log: Logger,
    remover: &'a dyn Remover,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Deleter<'a> {
    pub fn new(root: &'a Path, log: Logger) -> Self {
        Self {
            root,
            log,
            remover: &FsRemover,
            cancel: None,
        }
    }

    /// Use a different set of removal primitives.
    pub fn with_remover(mut self, remover: &'a dyn Remover) -> Self {
        self.remover = remover;
        self
    }

    /// Stop before the next top-level entry once `flag` is set.
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Remove every record in `delete_set`.
    ///
    /// Records are grouped by their top-level entry and each group runs to
    /// completion; the cancel flag is only consulted between groups.
    pub fn delete(&self, delete_set: &[PathRecord]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for (top, group) in top_level_groups(delete_set) {
            if self.cancelled(&mut report) {
                return report;
            }
            self.log.trace(format!("  Purging {top}"));

            for record in group.iter().filter(|r| !r.is_directory()) {
                if self.remove(record, &mut report) {
                    report.files_removed += 1;
                }
            }
            for record in deletion_order(&group) {
                if self.remove(record, &mut report) {
                    report.dirs_removed += 1;
                }
            }
        }

        report
    }

    fn remove(&self, record: &PathRecord, report: &mut DeleteReport) -> bool {
        let path = self.absolute(record);
        let result = if record.is_directory() {
            self.remover.remove_dir(&path)
        } else {
            self.remover.remove_file(&path)
        };

        match result {
            Ok(()) => {
                self.log.verbose(
                    1,
                    format!(
                        "  Deleted {} {}",
                        if record.is_directory() { "dir " } else { "file" },
                        record.relative_path()
                    ),
                );
                true
            }
            Err(source) => {
                self.log.warn_kv(
                    "Could not remove path",
                    &[("path", &record.relative_path()), ("error", &source)],
                );
                report
                    .failures
                    .push(PurgeError::DeletionError { path, source });
                false
            }
        }
    }

    fn cancelled(&self, report: &mut DeleteReport) -> bool {
        let stop = self
            .cancel
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        if stop && !report.aborted {
            report.aborted = true;
            self.log.warn("Deletion interrupted; remaining paths left in place");
        }
        stop
    }

    fn absolute(&self, record: &PathRecord) -> PathBuf {
        record
            .relative_path()
            .split('/')
            .fold(self.root.to_path_buf(), |path, part| path.join(part))
    }
}

/// Records bucketed by first path segment, in name order.
fn top_level_groups(delete_set: &[PathRecord]) -> BTreeMap<&str, Vec<PathRecord>> {
    let mut groups: BTreeMap<&str, Vec<PathRecord>> = BTreeMap::new();
    for record in delete_set {
        let top = record
            .relative_path()
            .split('/')
            .next()
            .unwrap_or_default();
        groups.entry(top).or_default().push(record.clone());
    }
    groups
}

/// Directory records, deepest first; ties broken by path for a stable log.
fn deletion_order(delete_set: &[PathRecord]) -> Vec<&PathRecord> {
    let mut dirs: Vec<&PathRecord> = delete_set.iter().filter(|r| r.is_directory()).collect();
    dirs.sort_by(|a, b| {
        b.depth()
            .cmp(&a.depth())
            .then_with(|| a.relative_path().cmp(b.relative_path()))
    });
    dirs
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    /// Records every call and refuses to remove non-empty directories, the
    /// way a plain `rmdir` would.
    #[derive(Default)]
    struct StrictRemover {
        calls: Mutex<Vec<String>>,
    }

    impl Remover for StrictRemover {
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            self.calls.lock().unwrap().push(path.display().to_string());
            fs::remove_file(path)
        }

        fn remove_dir(&self, path: &Path) -> io::Result<()> {
            self.calls.lock().unwrap().push(path.display().to_string());
            fs::remove_dir(path)
        }
    }

    /// Fails on any path whose name contains `locked`.
    struct FlakyRemover;

    impl Remover for FlakyRemover {
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            if path.to_string_lossy().contains("locked") {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
            }
            fs::remove_file(path)
        }

        fn remove_dir(&self, path: &Path) -> io::Result<()> {
            fs::remove_dir_all(path)
        }
    }

    fn make_tree(root: &Path, records: &[PathRecord]) {
        for record in records {
            let path = root.join(record.relative_path());
            if record.is_directory() {
                fs::create_dir_all(&path).unwrap();
            } else {
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, "x").unwrap();
            }
        }
    }

    #[test]
    fn test_deletes_files_then_deepest_directories() {
        let temp = TempDir::new().unwrap();
        let records = vec![
            PathRecord::dir("a"),
            PathRecord::dir("a/b"),
            PathRecord::dir("a/b/c"),
            PathRecord::file("a/b/c/f.txt"),
            PathRecord::file("a/g.txt"),
        ];
        make_tree(temp.path(), &records);

        let remover = StrictRemover::default();
        let report = Deleter::new(temp.path(), Logger::silent())
            .with_remover(&remover)
            .delete(&records);

        assert!(report.is_clean());
        assert_eq!(report.files_removed, 2);
        assert_eq!(report.dirs_removed, 3);
        assert!(!temp.path().join("a").exists());

        let calls = remover.calls.lock().unwrap();
        let tail: Vec<&str> = calls[2..].iter().map(String::as_str).collect();
        let root = temp.path().display().to_string();
        assert_eq!(
            tail,
            vec![
                format!("{root}/a/b/c"),
                format!("{root}/a/b"),
                format!("{root}/a")
            ]
        );
    }

    #[test]
    fn test_failures_do_not_stop_the_pass() {
        let temp = TempDir::new().unwrap();
        let records = vec![
            PathRecord::file("locked.txt"),
            PathRecord::file("free.txt"),
            PathRecord::dir("gone"),
        ];
        make_tree(temp.path(), &records);

        let report = Deleter::new(temp.path(), Logger::silent())
            .with_remover(&FlakyRemover)
            .delete(&records);

        assert_eq!(report.files_removed, 1);
        assert_eq!(report.dirs_removed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0],
            PurgeError::DeletionError { path, .. } if path.ends_with("locked.txt")
        ));
        assert!(temp.path().join("locked.txt").exists());
        assert!(!temp.path().join("free.txt").exists());
    }

    #[test]
    fn test_vanished_path_is_reported() {
        let temp = TempDir::new().unwrap();
        let report = Deleter::new(temp.path(), Logger::silent())
            .delete(&[PathRecord::file("never-existed.txt")]);

        assert_eq!(report.removed(), 0);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_cancel_flag_stops_before_next_entry() {
        let temp = TempDir::new().unwrap();
        let records = vec![PathRecord::file("one.txt"), PathRecord::dir("two")];
        make_tree(temp.path(), &records);

        let cancel = AtomicBool::new(true);
        let report = Deleter::new(temp.path(), Logger::silent())
            .with_cancel(&cancel)
            .delete(&records);

        assert!(report.aborted);
        assert_eq!(report.removed(), 0);
        assert!(temp.path().join("one.txt").exists());
        assert!(temp.path().join("two").exists());
    }

    /// Raises the cancel flag on its first call.
    struct InterruptingRemover<'a> {
        flag: &'a AtomicBool,
    }

    impl Remover for InterruptingRemover<'_> {
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            self.flag.store(true, Ordering::Relaxed);
            fs::remove_file(path)
        }

        fn remove_dir(&self, path: &Path) -> io::Result<()> {
            self.flag.store(true, Ordering::Relaxed);
            fs::remove_dir_all(path)
        }
    }

    #[test]
    fn test_interrupt_finishes_current_top_level_entry() {
        let temp = TempDir::new().unwrap();
        let records = vec![
            PathRecord::dir("docs"),
            PathRecord::file("docs/a.md"),
            PathRecord::file("docs/b.md"),
            PathRecord::dir("docs/api"),
            PathRecord::file("docs/api/index.md"),
            PathRecord::file("zz.txt"),
        ];
        make_tree(temp.path(), &records);

        let cancel = AtomicBool::new(false);
        let remover = InterruptingRemover { flag: &cancel };
        let report = Deleter::new(temp.path(), Logger::silent())
            .with_remover(&remover)
            .with_cancel(&cancel)
            .delete(&records);

        assert!(report.aborted);
        assert_eq!(report.files_removed, 3);
        assert_eq!(report.dirs_removed, 2);
        assert!(!temp.path().join("docs").exists());
        assert!(temp.path().join("zz.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlink_removes_link_only() {
        use std::os::unix::fs::symlink;

        let target = TempDir::new().unwrap();
        fs::write(target.path().join("data.txt"), "x").unwrap();
        let temp = TempDir::new().unwrap();
        symlink(target.path(), temp.path().join("link")).unwrap();

        let report = Deleter::new(temp.path(), Logger::silent())
            .delete(&[PathRecord::file("link")]);

        assert!(report.is_clean());
        assert_eq!(report.files_removed, 1);
        assert!(fs::symlink_metadata(temp.path().join("link")).is_err());
        assert!(target.path().join("data.txt").exists());
    }

    #[test]
    fn test_top_level_groups() {
        let records = vec![
            PathRecord::file("z.txt"),
            PathRecord::dir("a"),
            PathRecord::file("a/b/c.txt"),
            PathRecord::dir("a/b"),
        ];
        let groups = top_level_groups(&records);
        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["a", "z.txt"]);
        assert_eq!(groups["a"].len(), 3);
    }

    #[test]
    fn test_deletion_order() {
        let records = vec![
            PathRecord::dir("x"),
            PathRecord::file("x/y/z.txt"),
            PathRecord::dir("x/y"),
            PathRecord::dir("b"),
            PathRecord::dir("a/deep/er"),
        ];
        let order: Vec<&str> = deletion_order(&records)
            .into_iter()
            .map(|r| r.relative_path())
            .collect();
        assert_eq!(order, vec!["a/deep/er", "x/y", "b", "x"]);
    }

    proptest! {
        #[test]
        fn prop_descendants_removed_before_ancestors(
            raw in prop::collection::vec(
                prop::collection::vec(prop::sample::select(vec!["p", "q", "r"]), 1..5),
                1..20,
            )
        ) {
            let records: Vec<PathRecord> = raw
                .iter()
                .map(|segments| PathRecord::dir(segments.join("/")))
                .collect();
            let order = deletion_order(&records);

            for (i, earlier) in order.iter().enumerate() {
                for later in &order[i + 1..] {
                    let prefix = format!("{}/", earlier.relative_path());
                    prop_assert!(!later.relative_path().starts_with(&prefix));
                }
            }
        }
    }
}
