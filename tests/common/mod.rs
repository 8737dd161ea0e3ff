use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use scaffold_purge::error::Result;
use scaffold_purge::logging::Logger;
use scaffold_purge::purge::{Purge, PurgeReport};
use walkdir::WalkDir;

/// A manifest directory and a generated project side by side.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        temp.child("manifests")
            .create_dir_all()
            .expect("failed to create manifest dir");
        temp.child("project")
            .create_dir_all()
            .expect("failed to create project dir");
        Self { temp }
    }

    pub fn manifest_dir(&self) -> PathBuf {
        self.temp.path().join("manifests")
    }

    pub fn project_dir(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    /// Write `manifests/<name>` with the given YAML.
    pub fn manifest(&self, name: &str, yaml: &str) -> &Self {
        self.temp
            .child("manifests")
            .child(name)
            .write_str(yaml)
            .expect("failed to write manifest");
        self
    }

    /// Create project entries. Entries ending in `/` become directories,
    /// everything else an empty-ish file.
    pub fn files(&self, entries: &[&str]) -> &Self {
        let project = self.temp.child("project");
        for entry in entries {
            if let Some(dir) = entry.strip_suffix('/') {
                project
                    .child(dir)
                    .create_dir_all()
                    .expect("failed to create dir");
            } else {
                project
                    .child(entry)
                    .write_str(entry)
                    .expect("failed to write file");
            }
        }
        self
    }

    pub fn purge(&self, variant: &str, services: &[String]) -> Result<PurgeReport> {
        let manifest_dir = self.manifest_dir();
        let project_dir = self.project_dir();
        Purge::builder()
            .manifest_dir(&manifest_dir)
            .variant(variant)
            .project_dir(&project_dir)
            .services(services)
            .logger(Logger::silent())
            .build()?
            .run()
    }

    /// Every path under the project, relative, with `/` suffixes on
    /// directories.
    pub fn snapshot(&self) -> Vec<String> {
        snapshot(&self.project_dir())
    }
}

pub fn snapshot(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if entry.file_type().is_dir() {
                format!("{rel}/")
            } else {
                rel
            }
        })
        .collect();
    paths.sort();
    paths
}
