//! Tree command implementation.

use std::path::Path;

use crate::error::Result;
use crate::logging::Logger;
use crate::tree::render_tree;

/// Prints the tree listing of `dir` to stdout.
pub fn tree(dir: &Path, log: &Logger) -> Result<()> {
    let listing = render_tree(dir, log)?;
    println!("{}", dir.display());
    print!("{listing}");
    Ok(())
}
