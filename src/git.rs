use std::path::Path;

use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};

use crate::error::Result;
use crate::logging::Logger;

const INITIAL_BRANCH: &str = "main";
const COMMIT_MESSAGE: &str = "Initial commit";
const FALLBACK_NAME: &str = "scaffold-purge";
const FALLBACK_EMAIL: &str = "scaffold-purge@localhost";

/// Initializes a repository in `project_dir` unless one already exists.
///
/// # Returns
///
/// `true` when a new repository was created, `false` when `.git` was already
/// present and initialization was skipped.
pub fn init_repo(project_dir: &Path, log: &Logger) -> Result<bool> {
    if project_dir.join(".git").exists() {
        log.warn(".git already exists; skipping git init");
        return Ok(false);
    }

    log.info("Initializing Git repository...");
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(INITIAL_BRANCH);
    Repository::init_opts(project_dir, &opts)?;

    Ok(true)
}

/// Stages every file in the working tree and records the initial commit.
///
/// When HEAD already points at a commit, the new commit is stacked on top of
/// it. A commit that cannot be created is reported as a warning and
/// `Ok(false)` is returned.
pub fn stage_and_commit(project_dir: &Path, log: &Logger) -> Result<bool> {
    let repo = Repository::open(project_dir)?;

    log.info("Staging files...");
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature = repo
        .signature()
        .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    match repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        COMMIT_MESSAGE,
        &tree,
        &parents,
    ) {
        Ok(oid) => {
            log.debug_kv("Created initial commit", &[("id", &oid)]);
            Ok(true)
        }
        Err(err) => {
            log.warn_kv("git commit failed; continuing", &[("error", &err)]);
            Ok(false)
        }
    }
}
