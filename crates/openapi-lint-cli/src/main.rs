//! openapi-lint CLI tool.
//!
//! Usage:
//! ```bash
//! openapi-lint validate [OPTIONS] [PATHS]...
//! openapi-lint list-rules
//! openapi-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use openapi_lint_core::{Flavor, PassSelection};
use openapi_lint_rules::Preset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Structural validator for OpenAPI (Swagger 2.0) service definitions
#[derive(Parser)]
#[command(name = "openapi-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate OpenAPI documents
    Validate {
        /// Files or directories to validate (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Document flavor, e.g. "arm" or "arm,data-plane"
        #[arg(long)]
        flavor: Option<Flavor>,

        /// Passes to run
        #[arg(long)]
        pass: Option<PassArg>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules, by id or name (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Rule preset: arm, data-plane or all
        #[arg(long)]
        preset: Option<Preset>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-message compact format.
    Compact,
}

/// Pass selection on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PassArg {
    /// Per-file rules only.
    Individual,
    /// Merged-document rules only.
    Composed,
    /// Per-file rules, then merged-document rules.
    Both,
}

impl From<PassArg> for PassSelection {
    fn from(arg: PassArg) -> Self {
        match arg {
            PassArg::Individual => Self::Individual,
            PassArg::Composed => Self::Composed,
            PassArg::Both => Self::Both,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            paths,
            flavor,
            pass,
            format,
            rules,
            preset,
            exclude,
        } => {
            let mut resolver = config_resolver::ConfigResolver::new(cli.config.as_deref());
            let options = commands::validate::Options {
                flavor,
                pass: pass.map(PassSelection::from),
                format,
                rules,
                preset,
                exclude,
            };
            commands::validate::run(&paths, &options, &mut resolver)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
