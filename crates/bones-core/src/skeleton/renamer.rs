//! Placeholder renaming in a materialized tree

use super::walker::walk_error;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Rename every entry under `root` whose basename is exactly `placeholder`.
///
/// Entries are visited deepest first, so children are renamed before the
/// directory that contains them. `root` itself is never renamed.
/// Returns the new paths in the order they were renamed.
pub fn rename_placeholder(root: &Path, placeholder: &str, real_name: &str) -> Result<Vec<PathBuf>> {
    if placeholder == real_name {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_name() == placeholder {
            matches.push(entry.into_path());
        }
    }

    let mut renamed = Vec::with_capacity(matches.len());
    for path in matches {
        renamed.push(rename_entry(&path, real_name)?);
    }

    Ok(renamed)
}

/// Rename a single file or directory to `real_name` within its parent.
///
/// Fails with [`Error::NameCollision`] if the target already exists; the
/// existing entry and `path` are both left untouched.
pub fn rename_entry(path: &Path, real_name: &str) -> Result<PathBuf> {
    let target = match path.parent() {
        Some(parent) => parent.join(real_name),
        None => PathBuf::from(real_name),
    };

    if target == path {
        return Ok(target);
    }

    if fs::symlink_metadata(&target).is_ok() {
        return Err(Error::NameCollision {
            from: path.to_path_buf(),
            to: target,
        });
    }

    fs::rename(path, &target).map_err(|e| Error::io("rename", path, e))?;
    tracing::debug!("Renamed {} to {}", path.display(), target.display());

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("NAME/NAME")).unwrap();
        fs::write(root.join("NAME/NAME/NAME"), "leaf").unwrap();
        fs::write(root.join("NAME/NAME.rb"), "partial").unwrap();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("lib/NAME"), "file").unwrap();
        dir
    }

    #[test]
    fn test_rename_nested_placeholders() {
        let dir = tree();
        let root = dir.path();

        let renamed = rename_placeholder(root, "NAME", "tirion").unwrap();
        assert_eq!(renamed.len(), 4);

        assert_eq!(
            fs::read_to_string(root.join("tirion/tirion/tirion")).unwrap(),
            "leaf"
        );
        assert_eq!(fs::read_to_string(root.join("lib/tirion")).unwrap(), "file");
        // Partial matches are not renamed here
        assert!(root.join("tirion/NAME.rb").exists());
        assert!(!root.join("NAME").exists());
    }

    #[test]
    fn test_rename_is_exact_and_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("name"), "").unwrap();
        fs::write(dir.path().join("NAMES"), "").unwrap();

        let renamed = rename_placeholder(dir.path(), "NAME", "tirion").unwrap();
        assert!(renamed.is_empty());
        assert!(dir.path().join("name").exists());
        assert!(dir.path().join("NAMES").exists());
    }

    #[test]
    fn test_rename_entry_collision() {
        let dir = tree();
        let root = dir.path();

        let err = rename_entry(&root.join("NAME"), "lib").unwrap_err();
        match err {
            Error::NameCollision { from, to } => {
                assert_eq!(from, root.join("NAME"));
                assert_eq!(to, root.join("lib"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Neither side was touched
        assert!(root.join("NAME/NAME.rb").exists());
        assert!(root.join("lib/NAME").exists());
    }

    #[test]
    fn test_rename_placeholder_collision() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("NAME")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();

        let err = rename_placeholder(dir.path(), "NAME", "lib").unwrap_err();
        assert!(matches!(err, Error::NameCollision { .. }));
        assert!(dir.path().join("NAME").is_dir());
    }

    #[test]
    fn test_root_is_not_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("NAME");
        fs::create_dir_all(&root).unwrap();

        rename_placeholder(&root, "NAME", "tirion").unwrap();
        assert!(root.is_dir());
    }
}
