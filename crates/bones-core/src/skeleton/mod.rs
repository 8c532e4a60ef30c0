//! Skeleton materialization
//!
//! This module provides:
//! - Ignore rules and file enumeration for a skeleton directory
//! - Archiving of an existing destination
//! - File copying with permission preservation
//! - Placeholder renaming and template rendering
//!
//! [`FileManager`] ties the steps together in the order
//! enumerate → archive → copy → rename → render.

pub mod archive;
pub mod copier;
pub mod ignore;
pub mod renamer;
pub mod renderer;
pub mod walker;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::repository::RepositoryKind;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

pub use archive::{archive_if_exists, archive_path};
pub use copier::copy_files;
pub use ignore::IgnoreRules;
pub use renamer::{rename_entry, rename_placeholder};
pub use renderer::{classname, Bindings, TemplateRenderer};
pub use walker::enumerate;

/// Outcome of [`FileManager::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateReport {
    /// Relative paths copied from the skeleton
    pub copied: Vec<String>,
    /// Where the previous destination was moved, if it existed
    pub archived: Option<PathBuf>,
    /// Entries renamed from the placeholder
    pub renamed: Vec<PathBuf>,
    /// Files produced by template rendering
    pub rendered: Vec<PathBuf>,
}

/// Materializes a skeleton into a destination directory.
///
/// One instance per run: configure the source and destination, then call
/// [`create`](Self::create) or drive the individual steps.
#[derive(Debug)]
pub struct FileManager {
    settings: Settings,
    source: Option<String>,
    destination: Option<PathBuf>,
    archive: Option<PathBuf>,
    repository: OnceCell<RepositoryKind>,
}

impl FileManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            source: None,
            destination: None,
            archive: None,
            repository: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Set the skeleton source (local path or repository URL)
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
        self.repository = OnceCell::new();
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Set the destination; the archive path follows it
    pub fn set_destination(&mut self, destination: impl Into<PathBuf>) {
        let destination = destination.into();
        self.archive = Some(archive_path(&destination));
        self.destination = Some(destination);
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.archive = None;
    }

    /// `<destination>.archive`, or `None` while no destination is set
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    /// Repository kind of the source, or `None` for a local path or unset source
    pub fn repository(&self) -> Option<RepositoryKind> {
        let source = self.source.as_deref()?;
        let kind = *self
            .repository
            .get_or_init(|| RepositoryKind::classify(source));
        kind.is_repository().then_some(kind)
    }

    /// Local skeleton directory, validated for enumeration
    fn local_source(&self) -> Result<PathBuf> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::invalid_source("", "no skeleton source configured"))?;

        if let Some(kind) = self.repository() {
            return Err(Error::invalid_source(
                source,
                format!("{} repositories must be checked out before use", kind),
            ));
        }

        let path = PathBuf::from(source);
        if !path.is_dir() {
            return Err(Error::invalid_source(source, "not an existing directory"));
        }
        Ok(path)
    }

    fn required_destination(&self) -> Result<&Path> {
        self.destination().ok_or(Error::MissingDestination)
    }

    /// Relative paths of the skeleton files to copy, in lexicographic order
    pub fn files_to_copy(&self) -> Result<Vec<String>> {
        let source = self.local_source()?;
        let rules = IgnoreRules::load(&source, &self.settings.ignore)?;
        enumerate(&source, &rules)
    }

    /// Move an existing destination to the archive path.
    /// Returns `true` if something was archived.
    pub fn archive_destination(&self) -> Result<bool> {
        let destination = self.required_destination()?;
        match self.archive() {
            Some(archive) => archive_if_exists(destination, archive),
            None => Ok(false),
        }
    }

    /// Enumerate, archive the old destination, and copy the skeleton.
    /// Returns the copied relative paths.
    pub fn copy(&self) -> Result<Vec<String>> {
        let (copied, _) = self.copy_skeleton()?;
        Ok(copied)
    }

    fn copy_skeleton(&self) -> Result<(Vec<String>, bool)> {
        let source = self.local_source()?;
        let destination = self.required_destination()?;

        // Enumerate before archiving so a bad source never moves the destination
        let files = self.files_to_copy()?;
        let archived = self.archive_destination()?;

        tracing::info!(
            "Copying {} files from {} to {}",
            files.len(),
            source.display(),
            destination.display()
        );
        let copied = copy_files(&source, destination, &files)?;
        Ok((copied, archived))
    }

    /// Rename a single entry to `real_name`
    pub fn rename(&self, path: &Path, real_name: &str) -> Result<PathBuf> {
        rename_entry(path, real_name)
    }

    /// Render all templates in the destination with `bindings`
    pub fn render(&self, bindings: &Bindings) -> Result<Vec<PathBuf>> {
        let destination = self.required_destination()?;
        TemplateRenderer::new(self.settings.template_suffix.clone())
            .with_placeholder(self.settings.placeholder.clone())
            .render(destination, bindings)
    }

    /// Materialize a new project called `name`.
    ///
    /// The destination defaults to `name` when unset. Runs copy, placeholder
    /// renaming, and template rendering with `name`/`classname` bindings plus
    /// the configured extra bindings.
    pub fn create(&mut self, name: &str) -> Result<CreateReport> {
        validate_project_name(name)?;

        if self.destination.is_none() {
            self.set_destination(name);
        }

        let (copied, archived) = self.copy_skeleton()?;
        let destination = self.required_destination()?.to_path_buf();

        let renamed = rename_placeholder(&destination, &self.settings.placeholder, name)?;
        let bindings = Bindings::for_project(name).with_defaults(&self.settings.bindings);
        let rendered = self.render(&bindings)?;

        Ok(CreateReport {
            copied,
            archived: archived.then(|| self.archive.clone()).flatten(),
            renamed,
            rendered,
        })
    }
}

/// A project name must be usable as a single file name
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(std::path::MAIN_SEPARATOR)
        || name.contains('\0');

    if invalid {
        return Err(Error::InvalidProjectName {
            name: name.to_string(),
        });
    }
    Ok(())
}
