//! HOLO CLI - Command-line driver for the HOLO registries
//!
//! The registries take caller identities and time from outside. This CLI is
//! that outside: it replays scenario scripts whose steps name their caller,
//! reports each outcome, and shows the simulation lifecycle rules.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod script;

use commands::{lifecycle, run};
use crate::config::{CliConfig, LoggingConfig};
pub use error::{CliError, CliResult};

/// HOLO CLI application
#[derive(Parser)]
#[command(name = "holo")]
#[command(about = "HOLO - Holographic model and simulation registry CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HOLO_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario script against fresh registries
    Run(run::RunArgs),

    /// Show the simulation status vocabulary and transition rules
    Lifecycle,

    /// Show the effective configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = CliConfig::load(cli.config.as_deref())?;

    init_tracing(&config.logging, cli.verbose);

    match cli.command {
        Commands::Run(args) => run::execute(args, config.registry, cli.output),
        Commands::Lifecycle => lifecycle::execute(cli.output),
        Commands::Config => output::print_single(&config, cli.output),
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so that json/yaml output on stdout stays parseable.
    let result = if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(err) = result {
        eprintln!("tracing already initialized: {err}");
    }
}
