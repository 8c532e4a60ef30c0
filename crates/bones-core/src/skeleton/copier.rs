//! Skeleton file copying with permission preservation

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Copy `files` (relative to `source_dir`) into `target_dir`.
///
/// Intermediate directories are created as needed; contents are copied
/// byte-for-byte and the source permission bits are applied to each copy.
/// The first failure aborts the copy and leaves already-copied files in place.
pub fn copy_files(source_dir: &Path, target_dir: &Path, files: &[String]) -> Result<Vec<String>> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir).map_err(|e| Error::io("create directory", target_dir, e))?;

    let mut copied_files = Vec::with_capacity(files.len());

    for file_path in files {
        let source_path = source_dir.join(file_path);
        let target_path = target_dir.join(file_path);

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
        }

        copy_file(&source_path, &target_path)?;
        tracing::debug!("Copied {}", file_path);

        copied_files.push(file_path.clone());
    }

    Ok(copied_files)
}

/// Copy one file and its mode bits
fn copy_file(source_path: &Path, target_path: &Path) -> Result<()> {
    let permissions = fs::metadata(source_path)
        .map_err(|e| Error::io("read", source_path, e))?
        .permissions();

    fs::copy(source_path, target_path).map_err(|e| Error::io("copy", source_path, e))?;
    fs::set_permissions(target_path, permissions)
        .map_err(|e| Error::io("set permissions on", target_path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_creates_directories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("lib/NAME")).unwrap();
        fs::write(src.path().join("lib/NAME/version.rb"), "VERSION = '1.0'\n").unwrap();
        fs::write(src.path().join("History"), [0u8, 159, 146, 150]).unwrap();

        let target = dst.path().join("out");
        let files = vec!["History".to_string(), "lib/NAME/version.rb".to_string()];
        let copied = copy_files(src.path(), &target, &files).unwrap();

        assert_eq!(copied, files);
        assert_eq!(
            fs::read(target.join("History")).unwrap(),
            vec![0u8, 159, 146, 150]
        );
        assert_eq!(
            fs::read_to_string(target.join("lib/NAME/version.rb")).unwrap(),
            "VERSION = '1.0'\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let script = src.path().join("setup");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

        copy_files(src.path(), dst.path(), &["setup".to_string()]).unwrap();

        let mode = fs::metadata(dst.path().join("setup")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[test]
    fn test_missing_source_file_fails() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a"), "a").unwrap();

        let files = vec!["a".to_string(), "missing".to_string()];
        let err = copy_files(src.path(), dst.path(), &files).unwrap_err();

        assert_eq!(err.path(), Some(src.path().join("missing").as_path()));
        // Partial output is left for inspection
        assert!(dst.path().join("a").exists());
    }
}
