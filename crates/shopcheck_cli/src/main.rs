//! shopcheck CLI - ordered contract checks against a running shop API.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "shopcheck")]
#[command(about = "Ordered, stateful contract checks for the shop REST API", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./shopcheck.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the plan against the API
    Run {
        /// Only run these suites (providers they depend on are pulled in)
        #[arg(short, long = "suite", value_name = "SUITE")]
        suites: Vec<String>,
        /// Stop at the first case that does not pass
        #[arg(long)]
        fail_fast: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Wait up to SECS for the health endpoint before running
        #[arg(long, value_name = "SECS")]
        wait_for_api: Option<u64>,
    },
    /// Print the ordered plan with declared reads and writes
    List {
        /// Only list these suites
        #[arg(short, long = "suite", value_name = "SUITE")]
        suites: Vec<String>,
    },
    /// Validate plan dependencies without sending requests
    Check {
        /// Only check these suites
        #[arg(short, long = "suite", value_name = "SUITE")]
        suites: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Respects RUST_LOG (e.g. RUST_LOG=shopcheck_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref(), cli.base_url)?;

    match cli.command {
        Commands::Run {
            suites,
            fail_fast,
            format,
            wait_for_api,
        } => commands::run::run(config, &suites, fail_fast, format, wait_for_api),
        Commands::List { suites } => commands::list::run(&suites),
        Commands::Check { suites } => commands::check::run(&suites),
    }
}
