//! xmlkit CLI - Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{CliConfig, ReportFormat};

#[derive(Parser)]
#[command(name = "xmlkit")]
#[command(version)]
#[command(about = "Check, extract from and format XML files", long_about = None)]
struct Cli {
    /// TOML file with reader and output defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and report its issues
    Check {
        file: PathBuf,

        /// Report format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// Print the outer XML of matching elements, one per line
    Extract {
        file: PathBuf,

        /// Local name of the elements to extract
        #[arg(short, long)]
        element: String,

        /// Namespace URI the elements must be in
        #[arg(short, long)]
        namespace: Option<String>,

        /// Stop after this many elements
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Pretty-print a file
    Format {
        file: PathBuf,

        /// Spaces per level
        #[arg(long)]
        indent: Option<usize>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmlkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Check { file, format } => commands::check::execute(
            &commands::check::CheckArgs {
                file,
                format: format.unwrap_or(config.output.format),
            },
            &mut stdout,
        ),
        Commands::Extract {
            file,
            element,
            namespace,
            limit,
        } => commands::extract::execute(
            &commands::extract::ExtractArgs {
                file,
                element,
                namespace,
                limit,
                format: config.output.format,
            },
            &config.reader,
            &mut stdout,
            &mut std::io::stderr().lock(),
        ),
        Commands::Format { file, indent } => commands::format::execute(
            &commands::format::FormatArgs {
                file,
                indent: indent.unwrap_or(config.output.indent),
            },
            &mut stdout,
        ),
    }
}
