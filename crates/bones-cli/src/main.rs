//! bones CLI - create new projects from skeleton directories

use anyhow::{Context, Result};
use bones_core::store::default_skeleton_name;
use bones_core::{CreateArgs, Settings, SkeletonStore};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bones")]
#[command(about = "Create new projects from skeleton directories")]
#[command(version)]
pub struct Args {
    /// Settings file (defaults to $BONES_CONFIG or ~/.mrbones/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from a skeleton
    Create(CliCreateArgs),
    /// Copy a skeleton directory into the skeleton store
    Freeze(FreezeArgs),
    /// Remove a skeleton from the skeleton store
    Unfreeze(UnfreezeArgs),
    /// List the skeletons in the skeleton store
    Info,
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project name
    pub name: Option<String>,

    /// Skeleton to use: a store name, local directory, or repository URL
    #[arg(short, long)]
    pub skeleton: Option<String>,

    /// Project directory to create (defaults to the project name)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            name: args.name,
            skeleton: args.skeleton,
            directory: args.directory,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct FreezeArgs {
    /// Skeleton directory to copy into the store
    pub source: String,

    /// Name to store it under (defaults to the directory name)
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct UnfreezeArgs {
    /// Name of the skeleton to remove
    pub name: String,
}

fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    tracing::debug!("Skeleton store: {:?}", settings.store_dir());

    match args.command {
        Some(Command::Create(create_args)) => create(&settings, create_args),
        Some(Command::Freeze(freeze_args)) => freeze(&settings, freeze_args),
        Some(Command::Unfreeze(unfreeze_args)) => unfreeze(&settings, unfreeze_args),
        Some(Command::Info) => info(&settings),
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(&settings, CliCreateArgs::default()),
    }
}

/// Initialize tracing; default to warnings so prompts stay readable
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn create(settings: &Settings, args: CliCreateArgs) -> Result<()> {
    let result = bones_core::run(settings, args.into());

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

fn freeze(settings: &Settings, args: FreezeArgs) -> Result<()> {
    let store = SkeletonStore::from_settings(settings)?;
    let name = match args.name {
        Some(name) => name,
        None => default_skeleton_name(&args.source).with_context(|| {
            format!("Cannot derive a skeleton name from '{}'", args.source)
        })?,
    };

    let path = store
        .freeze(settings, &args.source, &name)
        .with_context(|| format!("Failed to freeze '{}'", args.source))?;

    println!(
        "{} {} {}",
        "Froze".green().bold(),
        name.cyan(),
        format!("({})", path.display()).dimmed()
    );
    Ok(())
}

fn unfreeze(settings: &Settings, args: UnfreezeArgs) -> Result<()> {
    let store = SkeletonStore::from_settings(settings)?;

    if store.unfreeze(&args.name)? {
        println!("{} {}", "Removed".green().bold(), args.name.cyan());
    } else {
        eprintln!(
            "{} No skeleton named '{}' in {}",
            "Warning:".yellow(),
            args.name,
            store.root().display()
        );
    }
    Ok(())
}

fn info(settings: &Settings) -> Result<()> {
    let store = SkeletonStore::from_settings(settings)?;
    let skeletons = store.list()?;

    println!(
        "{}",
        format!("Skeletons in {}", store.root().display()).cyan().bold()
    );
    println!();

    if skeletons.is_empty() {
        println!("  {}", "(none - run `bones freeze <dir>` to add one)".dimmed());
        return Ok(());
    }

    let width = skeletons.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for skeleton in &skeletons {
        println!(
            "  {} {:width$}  {}",
            "->".blue(),
            skeleton.name,
            skeleton.path.display().to_string().dimmed(),
            width = width
        );
    }

    Ok(())
}
