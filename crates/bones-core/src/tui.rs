//! Interactive create flow using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

use crate::config::Settings;
use crate::skeleton::{validate_project_name, CreateReport, FileManager};
use crate::store::{SkeletonStore, DEFAULT_SKELETON};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (replaces the placeholder and feeds template bindings)
    pub name: Option<String>,

    /// Skeleton name in the store, local directory, or repository URL
    pub skeleton: Option<String>,

    /// Project directory to create (defaults to the project name)
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the create flow with interactive prompts
pub fn run(settings: &Settings, args: CreateArgs) -> Result<()> {
    cliclack::intro("bones")?;

    let store = SkeletonStore::from_settings(settings)?;

    // Step 1: Project name
    let name = select_name(&args)?;

    // Step 2: Skeleton
    let source = select_skeleton(&store, &args)?;

    // Step 3: Destination (confirm archiving of an existing one)
    let destination = select_directory(&args, &name)?;

    // Step 4: Create project
    create_project(settings, &source, &destination, &name)?;

    // Step 5: Show next steps
    print_next_steps(&destination)?;

    Ok(())
}

fn select_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        validate_project_name(name)?;
        return Ok(name.clone());
    }

    if args.yes {
        anyhow::bail!("A project name is required in non-interactive mode.");
    }

    let name: String = cliclack::input("Project name")
        .placeholder("my_project")
        .validate(|input: &String| {
            validate_project_name(input)
                .map_err(|_| "Use a plain file name without path separators")
        })
        .interact()?;

    Ok(name)
}

fn select_skeleton(store: &SkeletonStore, args: &CreateArgs) -> Result<String> {
    if let Some(skeleton) = &args.skeleton {
        let source = store.resolve(skeleton);
        cliclack::log::info(format!("Using skeleton: {}", source))?;
        return Ok(source);
    }

    let skeletons = store
        .list()
        .with_context(|| format!("Failed to list skeletons in {}", store.root().display()))?;

    if skeletons.is_empty() {
        anyhow::bail!(
            "No skeletons found in {}. Run `bones freeze <dir>` or pass --skeleton.",
            store.root().display()
        );
    }

    // Default skeleton or the only one available
    let preferred = skeletons
        .iter()
        .position(|s| s.name == DEFAULT_SKELETON)
        .or_else(|| (skeletons.len() == 1).then_some(0));

    if let Some(idx) = preferred {
        if args.yes || skeletons.len() == 1 {
            let skeleton = &skeletons[idx];
            cliclack::log::info(format!("Using skeleton: {}", skeleton.name))?;
            return Ok(skeleton.path.to_string_lossy().into_owned());
        }
    } else if args.yes {
        anyhow::bail!(
            "No '{}' skeleton in {}. Pass --skeleton in non-interactive mode.",
            DEFAULT_SKELETON,
            store.root().display()
        );
    }

    let mut select = cliclack::select("Select a skeleton");
    for (idx, skeleton) in skeletons.iter().enumerate() {
        select = select.item(idx, &skeleton.name, skeleton.path.display().to_string());
    }
    if let Some(idx) = preferred {
        select = select.initial_value(idx);
    }
    let selected_idx: usize = select.interact()?;

    Ok(skeletons[selected_idx].path.to_string_lossy().into_owned())
}

fn select_directory(args: &CreateArgs, name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let dir = args.directory.clone().unwrap_or_else(|| PathBuf::from(name));
    let path = if dir.is_absolute() {
        dir
    } else {
        current_dir.join(dir)
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Existing destination gets archived
    if path.exists() {
        let archive = crate::skeleton::archive_path(&path);
        cliclack::log::warning(format!(
            "{} already exists and will be moved to {}",
            path.display(),
            archive.display()
        ))?;

        // Auto-confirm with --yes flag
        let confirm = if args.yes {
            true
        } else {
            cliclack::confirm("Continue anyway?")
                .initial_value(true)
                .interact()?
        };

        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    Ok(path)
}

fn create_project(
    settings: &Settings,
    source: &str,
    destination: &Path,
    name: &str,
) -> Result<CreateReport> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let mut fm = FileManager::new(settings.clone());
    fm.set_source(source);
    fm.set_destination(destination);

    let report = match fm.create(name) {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e).with_context(|| format!("Failed to create {}", destination.display()));
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        report.copied.len(),
        destination.display()
    ));

    if let Some(archive) = &report.archived {
        cliclack::log::info(format!("Previous contents archived to {}", archive.display()))?;
    }
    if !report.rendered.is_empty() {
        cliclack::log::info(format!("Rendered {} templates", report.rendered.len()))?;
    }

    Ok(report)
}

fn print_next_steps(project_dir: &Path) -> Result<()> {
    let mut steps = Vec::new();
    let current = std::env::current_dir().ok();

    // Step 1: cd to directory if not current
    if current.as_deref() != Some(project_dir) {
        steps.push(format!("cd {}", project_dir.display()));
    }

    // Step 2: Open README for instructions
    if project_dir.join("README.md").exists() {
        steps.push("Open README.md to get started".to_string());
    }

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
