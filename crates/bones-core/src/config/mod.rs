//! Run settings
//!
//! Settings are loaded once per run and passed explicitly to the
//! [`FileManager`](crate::skeleton::FileManager), the template renderer, and
//! the skeleton store.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Basename replaced by the project name
pub const DEFAULT_PLACEHOLDER: &str = "NAME";

/// Suffix marking a file as a template
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".bns";

/// Ignore file read from the skeleton root
pub const IGNORE_FILE: &str = ".bnsignore";

/// Suffix appended to the destination to form the archive path
pub const ARCHIVE_SUFFIX: &str = ".archive";

/// Environment variable naming a settings file
pub const CONFIG_ENV: &str = "BONES_CONFIG";

/// Name of the settings file inside the skeleton store
pub const CONFIG_FILE: &str = "config.yaml";

/// Store directory under the user's home
const STORE_DIR: &str = ".mrbones";

/// Settings for a scaffolding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Basename that the renamer replaces with the project name
    pub placeholder: String,

    /// Filename suffix of template files
    pub template_suffix: String,

    /// Extra ignore patterns applied on top of the skeleton's `.bnsignore`
    pub ignore: Vec<String>,

    /// Extra template bindings (e.g. author, email)
    pub bindings: BTreeMap<String, String>,

    /// Location of the skeleton store (defaults to `~/.mrbones`)
    pub skeleton_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            ignore: Vec::new(),
            bindings: BTreeMap::new(),
            skeleton_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from the first available location:
    /// the explicit path, `$BONES_CONFIG`, then `<store>/config.yaml`.
    /// Falls back to defaults when none of these exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }

        match default_store_dir().map(|dir| dir.join(CONFIG_FILE)) {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from YAML text; an empty document yields defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Skeleton store directory: configured value or `~/.mrbones`
    pub fn store_dir(&self) -> Option<PathBuf> {
        self.skeleton_dir.clone().or_else(default_store_dir)
    }
}

/// `~/.mrbones`, when a home directory is known
pub fn default_store_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STORE_DIR))
}
