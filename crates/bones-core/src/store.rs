//! Skeleton store
//!
//! Named skeletons live as subdirectories of a per-user store (by default
//! `~/.mrbones`). `freeze` copies a skeleton in, `unfreeze` removes it.

use crate::config::{Settings, ARCHIVE_SUFFIX, IGNORE_FILE};
use crate::error::{Error, Result};
use crate::repository::RepositoryKind;
use crate::skeleton::{copy_files, FileManager};
use std::fs;
use std::path::{Path, PathBuf};

/// Skeleton used when none is named
pub const DEFAULT_SKELETON: &str = "default";

/// A skeleton available in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Directory of named skeletons
#[derive(Debug, Clone)]
pub struct SkeletonStore {
    root: PathBuf,
}

impl SkeletonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store configured in `settings`, falling back to `~/.mrbones`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.store_dir().map(Self::new).ok_or_else(|| {
            Error::invalid_source(
                "~/.mrbones",
                "cannot determine the home directory; set skeleton_dir in the settings file",
            )
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Skeletons in the store, sorted by name. Archives and plain files are skipped.
    pub fn list(&self) -> Result<Vec<SkeletonInfo>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io("read skeleton store", &self.root, e)),
        };

        let mut skeletons = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read skeleton store", &self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.ends_with(ARCHIVE_SUFFIX) {
                continue;
            }
            skeletons.push(SkeletonInfo { name, path });
        }

        skeletons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skeletons)
    }

    /// Turn a user-supplied skeleton into a source string.
    ///
    /// Existing local directories and repository URLs are used as-is;
    /// anything else is looked up by name in the store.
    pub fn resolve(&self, skeleton: &str) -> String {
        if RepositoryKind::classify(skeleton).is_repository() || Path::new(skeleton).is_dir() {
            return skeleton.to_string();
        }
        self.path_for(skeleton).to_string_lossy().into_owned()
    }

    /// Copy a local skeleton into the store under `name`.
    ///
    /// A previously frozen skeleton of the same name is archived first.
    /// The skeleton's ignore file is kept so the frozen copy filters the same way.
    pub fn freeze(&self, settings: &Settings, source: &str, name: &str) -> Result<PathBuf> {
        crate::skeleton::validate_project_name(name)?;

        let target = self.path_for(name);
        ensure_outside(source, &target)?;

        let mut fm = FileManager::new(settings.clone());
        fm.set_source(source);
        fm.set_destination(target.clone());
        fm.copy()?;

        let source_dir = Path::new(source);
        if source_dir.join(IGNORE_FILE).is_file() {
            copy_files(source_dir, &target, &[IGNORE_FILE.to_string()])?;
        }

        tracing::info!("Froze {} as '{}'", source, name);
        Ok(target)
    }

    /// Remove a frozen skeleton. Returns `false` if it did not exist.
    pub fn unfreeze(&self, name: &str) -> Result<bool> {
        crate::skeleton::validate_project_name(name)?;

        let target = self.path_for(name);
        if !target.is_dir() {
            return Ok(false);
        }

        fs::remove_dir_all(&target).map_err(|e| Error::io("remove skeleton", &target, e))?;
        tracing::info!("Removed skeleton '{}'", name);
        Ok(true)
    }
}

/// Reject a source that is the store entry being replaced, or lives inside it.
/// Archiving the entry would otherwise move the source away mid-copy.
fn ensure_outside(source: &str, target: &Path) -> Result<()> {
    let (Ok(source_dir), Ok(target_dir)) = (fs::canonicalize(source), fs::canonicalize(target))
    else {
        return Ok(());
    };

    if source_dir.starts_with(&target_dir) {
        return Err(Error::invalid_source(
            source,
            format!("cannot freeze onto itself ({})", target.display()),
        ));
    }
    Ok(())
}

/// Default name for a frozen skeleton: the source directory's basename
pub fn default_skeleton_name(source: &str) -> Option<String> {
    Path::new(source)
        .components()
        .collect::<PathBuf>()
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
