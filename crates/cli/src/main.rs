//! xamlgen CLI - XAML generation from C# and VB view models
//!
//! This binary provides the command-line host for the generation engine.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use xamlgen::init::init_settings;
use xamlgen::{build_project, load_settings, read_document, render_output, Caret, Session};
use xamlgen_core::config::Settings;

#[derive(Parser)]
#[command(name = "xamlgen")]
#[command(about = "Generate XAML from the properties of C# and VB types")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Profile to use instead of the active one
    #[arg(short, long, value_name = "NAME", global = true)]
    profile: Option<String>,

    /// Other source files of the project, for resolving types
    #[arg(short, long = "reference", value_name = "FILE", global = true)]
    references: Vec<PathBuf>,

    /// Metadata JSON describing types of referenced assemblies
    #[arg(short, long = "metadata", value_name = "FILE", global = true)]
    metadata: Vec<PathBuf>,

    /// Print the full result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate XAML for the property or type at a position
    Generate {
        /// Source file (.cs or .vb)
        file: PathBuf,

        #[command(flatten)]
        caret: CaretArgs,
    },
    /// Generate XAML for every property in a selection
    Selection {
        /// Source file (.cs or .vb)
        file: PathBuf,

        /// Zero-based character offset where the selection starts
        #[arg(long)]
        start: usize,

        /// Zero-based character offset where the selection ends
        #[arg(long)]
        end: usize,
    },
    /// List the configured profiles
    Profiles,
    /// Check the settings file
    Validate,
    /// Write a settings file with the default profiles
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct CaretArgs {
    /// Zero-based character offset
    #[arg(long, conflicts_with_all = ["line", "column"])]
    position: Option<usize>,

    /// One-based line number
    #[arg(long, requires = "column")]
    line: Option<usize>,

    /// One-based column number
    #[arg(long, requires = "line")]
    column: Option<usize>,
}

impl CaretArgs {
    fn caret(&self) -> Result<Caret> {
        match (self.position, self.line, self.column) {
            (Some(offset), _, _) => Ok(Caret::Offset(offset)),
            (None, Some(line), Some(column)) => Ok(Caret::LineColumn { line, column }),
            _ => bail!("Give either --position or --line and --column"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Generate { file, caret } => {
            let session = session(&cli)?;
            let document = read_document(file)?;
            let output = session.generate(&document, caret.caret()?)?;
            print_output(&output, cli.json)
        }
        Commands::Selection { file, start, end } => {
            let session = session(&cli)?;
            let document = read_document(file)?;
            let output =
                session.selection(&document, Caret::Offset(*start), Caret::Offset(*end))?;
            print_output(&output, cli.json)
        }
        Commands::Profiles => {
            let settings = load_settings(cli.config.as_deref(), cli.profile.as_deref())?;
            list_profiles(&settings);
            Ok(())
        }
        Commands::Validate => validate(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Init { force } => {
            let path = init_settings(cli.config.as_deref(), *force)?;
            println!("Wrote default settings to {}", path.display());
            Ok(())
        }
    }
}

/// Initialize logging system
///
/// Logs go to stderr so generated XAML on stdout can be piped.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "xamlgen={level},xamlgen_core={level},xamlgen_generator={level},xamlgen_languages={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn session(cli: &Cli) -> Result<Session> {
    let settings = load_settings(cli.config.as_deref(), cli.profile.as_deref())?;
    let project = build_project(&cli.references, &cli.metadata)?;
    Ok(Session::new(settings, project))
}

fn print_output(output: &xamlgen_core::output::AnalyzerOutput, json: bool) -> Result<()> {
    if output.is_empty() && !json {
        warn!("Nothing to generate at the given position");
        return Ok(());
    }
    println!("{}", render_output(output, json)?);
    Ok(())
}

fn list_profiles(settings: &Settings) {
    for profile in &settings.profiles {
        let marker = if profile.name.eq_ignore_ascii_case(&settings.active_profile) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} ({} mappings, grouping: {})",
            profile.name,
            profile.mappings.len(),
            if profile.class_grouping.is_empty() {
                "none"
            } else {
                profile.class_grouping.as_str()
            }
        );
    }
}

fn validate(config_path: Option<&Path>, profile: Option<&str>) -> Result<()> {
    let settings = load_settings(config_path, profile)?;
    info!(profile_count = settings.profiles.len(), "Settings are valid");
    println!(
        "Settings are valid: {} profile(s), active profile '{}'",
        settings.profiles.len(),
        settings.active_profile
    );
    Ok(())
}
