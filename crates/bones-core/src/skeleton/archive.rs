//! Archiving of an existing destination before it is overwritten

use crate::config::ARCHIVE_SUFFIX;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Archive path for a destination: the destination with `.archive` appended.
/// Trailing separators are dropped first so `app/` archives to `app.archive`.
pub fn archive_path(destination: &Path) -> PathBuf {
    let normalized: PathBuf = destination.components().collect();
    let mut name = normalized.into_os_string();
    name.push(ARCHIVE_SUFFIX);
    PathBuf::from(name)
}

/// Move `destination` to `archive` if it exists.
///
/// A previous archive is deleted first so at most one snapshot is kept.
/// Returns `false` when there was nothing to archive.
pub fn archive_if_exists(destination: &Path, archive: &Path) -> Result<bool> {
    if !exists(destination) {
        return Ok(false);
    }

    if exists(archive) {
        tracing::debug!("Removing previous archive {}", archive.display());
        remove_path(archive)?;
    }

    fs::rename(destination, archive).map_err(|e| {
        if e.kind() == io::ErrorKind::CrossesDevices {
            Error::ArchiveCrossDevice {
                from: destination.to_path_buf(),
                to: archive.to_path_buf(),
            }
        } else {
            Error::io("archive", destination, e)
        }
    })?;

    tracing::info!(
        "Archived {} to {}",
        destination.display(),
        archive.display()
    );
    Ok(true)
}

/// True for any entry, including dangling symlinks
fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::io("inspect", path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io("remove archive", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_path() {
        assert_eq!(
            archive_path(Path::new("my_new_app")),
            PathBuf::from("my_new_app.archive")
        );
        assert_eq!(
            archive_path(Path::new("projects/my_new_app/")),
            PathBuf::from("projects/my_new_app.archive")
        );
    }

    #[test]
    fn test_missing_destination_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bar");
        let archive = archive_path(&dest);

        assert!(!archive_if_exists(&dest, &archive).unwrap());
        assert!(!archive.exists());
    }

    #[test]
    fn test_archive_moves_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bar");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "v1").unwrap();
        let archive = archive_path(&dest);

        assert!(archive_if_exists(&dest, &archive).unwrap());
        assert!(!dest.exists());
        assert_eq!(fs::read_to_string(archive.join("keep.txt")).unwrap(), "v1");
    }

    #[test]
    fn test_archive_replaces_previous_archive() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bar");
        let archive = archive_path(&dest);
        fs::create_dir(&archive).unwrap();
        fs::write(archive.join("old.txt"), "v0").unwrap();
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("new.txt"), "v1").unwrap();

        archive_if_exists(&dest, &archive).unwrap();
        assert!(!archive.join("old.txt").exists());
        assert_eq!(fs::read_to_string(archive.join("new.txt")).unwrap(), "v1");
    }

    #[test]
    fn test_archive_twice_keeps_single_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bar");
        let archive = archive_path(&dest);
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("file"), "latest").unwrap();

        assert!(archive_if_exists(&dest, &archive).unwrap());
        assert!(!archive_if_exists(&dest, &archive).unwrap());

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(archive.join("file")).unwrap(), "latest");
    }
}
