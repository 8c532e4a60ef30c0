//! Skeleton file enumeration

use super::ignore::IgnoreRules;
use crate::error::{Error, Result};
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// List the files under `source_dir` that are not ignored.
///
/// Paths are relative, `/`-separated, and sorted lexicographically.
/// Ignored directories are pruned without being descended.
pub fn enumerate(source_dir: &Path, rules: &IgnoreRules) -> Result<Vec<String>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match relative_path(source_dir, entry.path()) {
            Some(Ok(rel)) => !rules.should_ignore(&rel),
            _ => true,
        });

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(source_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        files.push(entry_relative_path(source_dir, &entry)?);
    }

    files.sort();
    files.dedup();

    tracing::debug!(
        "Enumerated {} files in {}",
        files.len(),
        source_dir.display()
    );
    Ok(files)
}

fn entry_relative_path(root: &Path, entry: &DirEntry) -> Result<String> {
    match relative_path(root, entry.path()) {
        Some(Ok(rel)) => Ok(rel),
        Some(Err(e)) => Err(Error::io("enumerate", entry.path(), e)),
        None => Err(Error::io(
            "enumerate",
            entry.path(),
            io::Error::other("path is outside the skeleton root"),
        )),
    }
}

/// `/`-joined path of `path` relative to `root`
fn relative_path(root: &Path, path: &Path) -> Option<io::Result<String>> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => {
                return Some(Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "file name is not valid UTF-8",
                )))
            }
        }
    }
    Some(Ok(parts.join("/")))
}

pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    Error::io("walk", path, io::Error::from(err))
}
