//! Error types for bones-core

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using bones-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while materializing a skeleton
#[derive(Error, Debug)]
pub enum Error {
    /// The skeleton source cannot be enumerated (unset, a repository URL, or missing)
    #[error("Invalid skeleton source '{path}': {reason}")]
    InvalidSource { path: String, reason: String },

    /// A rename would clobber an existing entry
    #[error("Cannot rename '{}' to '{}' - file already exists", from.display(), to.display())]
    NameCollision { from: PathBuf, to: PathBuf },

    /// Filesystem failure while reading, writing, or moving a path
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Archive rename crossed a filesystem boundary
    #[error(
        "Cannot archive '{}' to '{}': they are on different filesystems",
        from.display(),
        to.display()
    )]
    ArchiveCrossDevice { from: PathBuf, to: PathBuf },

    /// Template references an unbound name or has a syntax error
    #[error("Failed to render template '{}': {message}", path.display())]
    TemplateRender { path: PathBuf, message: String },

    /// A step that needs a destination ran before one was set
    #[error("No destination directory configured")]
    MissingDestination,

    /// Project name cannot be used as a file name
    #[error("Invalid project name: '{name}'. Must be a non-empty file name without path separators")]
    InvalidProjectName { name: String },

    /// Settings file could not be read or parsed
    #[error("Configuration error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Wrap an I/O error with the operation and path that produced it
    pub fn io(operation: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build an invalid-source error
    pub fn invalid_source(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The path the error refers to, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::InvalidSource { path, .. } => Some(Path::new(path)),
            Error::NameCollision { to, .. } => Some(to),
            Error::Io { path, .. } => Some(path),
            Error::ArchiveCrossDevice { from, .. } => Some(from),
            Error::TemplateRender { path, .. } => Some(path),
            Error::Config { path, .. } => Some(path),
            Error::InvalidProjectName { .. } | Error::MissingDestination => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_operation_and_path() {
        let err = Error::io(
            "read",
            "/tmp/skeleton/Rakefile.bns",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("read"));
        assert!(msg.contains("/tmp/skeleton/Rakefile.bns"));
        assert_eq!(err.path(), Some(Path::new("/tmp/skeleton/Rakefile.bns")));
    }

    #[test]
    fn test_name_collision_message() {
        let err = Error::NameCollision {
            from: PathBuf::from("app/NAME"),
            to: PathBuf::from("app/lib"),
        };
        assert_eq!(
            err.to_string(),
            "Cannot rename 'app/NAME' to 'app/lib' - file already exists"
        );
    }

    #[test]
    fn test_invalid_project_name_has_no_path() {
        let err = Error::InvalidProjectName {
            name: "a/b".to_string(),
        };
        assert!(err.path().is_none());
    }
}
