//! Bones Core - materialize new projects from skeleton directories
//!
//! A skeleton is a directory tree describing a new project. Creating a project
//! copies the skeleton into a destination, renames entries called `NAME` to the
//! project name, and renders `*.bns` files as Tera templates.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Repository classification, ignore rules,
//!   enumeration, archiving, copying, renaming, rendering
//! - **Layer 2: Orchestration** - [`FileManager`] and the [`SkeletonStore`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```no_run
//! use bones_core::{FileManager, Settings};
//!
//! let mut fm = FileManager::new(Settings::default());
//! fm.set_source("/home/user/.mrbones/default");
//! fm.set_destination("my_new_app");
//! let report = fm.create("my_new_app")?;
//! println!("copied {} files", report.copied.len());
//! # Ok::<(), bones_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod skeleton;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::Settings;
pub use error::{Error, Result};
pub use repository::RepositoryKind;
pub use skeleton::{Bindings, CreateReport, FileManager, IgnoreRules, TemplateRenderer};
pub use store::{SkeletonInfo, SkeletonStore};

#[cfg(feature = "tui")]
pub use tui::{run, CreateArgs};
