//! Human-readable listing of a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PurgeError, Result};
use crate::logging::Logger;

const GIT_DIR: &str = ".git";

/// Render the tree below `root`, one entry per line.
///
/// Directories are listed before files and each group is sorted by name,
/// ignoring case. Symbolic links are shown but not descended into. A `.git`
/// directory is left out.
pub fn render_tree(root: &Path, log: &Logger) -> Result<String> {
    let mut out = String::new();
    if !root.exists() {
        log.warn_kv("Path does not exist", &[("path", &root.display())]);
        return Ok(out);
    }
    render_into(root, "", &mut out)?;
    Ok(out)
}

fn render_into(dir: &Path, prefix: &str, out: &mut String) -> Result<()> {
    let entries = sorted_entries(dir)?;
    let last = entries.len().saturating_sub(1);

    for (index, (path, name, is_dir)) in entries.iter().enumerate() {
        let is_last = index == last;
        out.push_str(prefix);
        out.push_str(if is_last { "└── " } else { "├── " });
        out.push_str(name);
        out.push('\n');

        if *is_dir {
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            render_into(path, &child_prefix, out)?;
        }
    }

    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<(PathBuf, String, bool)>> {
    let io_error = |source| PurgeError::IoError {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let is_dir = entry.file_type().map_err(io_error)?.is_dir();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_dir && name == GIT_DIR {
            continue;
        }
        entries.push((entry.path(), name, is_dir));
    }

    entries.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| a.1.to_lowercase().cmp(&b.1.to_lowercase()))
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_render_tree_layout() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/app")).unwrap();
        fs::create_dir_all(root.join("Docs")).unwrap();
        fs::write(root.join("src/app/main.py"), "").unwrap();
        fs::write(root.join("src/README.md"), "").unwrap();
        fs::write(root.join("b.txt"), "").unwrap();
        fs::write(root.join("A.txt"), "").unwrap();

        let tree = render_tree(root, &Logger::silent()).unwrap();
        let expected = "\
├── Docs
├── src
│   ├── app
│   │   └── main.py
│   └── README.md
├── A.txt
└── b.txt
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_git_directory_is_not_listed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git/objects/ab")).unwrap();
        fs::write(temp.path().join(".gitignore"), "").unwrap();
        fs::write(temp.path().join("main.rs"), "").unwrap();

        let tree = render_tree(temp.path(), &Logger::silent()).unwrap();
        assert_eq!(tree, "├── .gitignore\n└── main.rs\n");
    }

    #[test]
    fn test_missing_root_renders_nothing() {
        let temp = TempDir::new().unwrap();
        let tree = render_tree(&temp.path().join("absent"), &Logger::silent()).unwrap();
        assert!(tree.is_empty());
    }
}
