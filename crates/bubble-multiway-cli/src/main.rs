//! Bubble-Multiway CLI - explore every way bubble sort can run.
//!
//! Builds the multiway graph of adjacent-swap transitions (or its causal event
//! graph) for a permutation size or an explicit value list, prints its
//! statistics and writes GraphML, JSON and SVG artifacts.

use std::process::ExitCode;

use anyhow::Result;
use bubble_multiway_core::InputError;
use bubble_multiway_ops::{Config, OpsContext, OpsError};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;

use commands::{causal, config as config_cmd, multiway, CausalArgs, MultiwayArgs};

/// Exit code for rejected input.
const EXIT_INPUT: u8 = 2;

/// Bubble-Multiway CLI - multiway and causal graphs of bubble sort.
///
/// Pass `-n 3` for the permutations of 1..=3 or `--values 3,1,1,2` for an
/// explicit multiset.
#[derive(Parser, Debug)]
#[command(
    name = "bmw",
    author,
    version,
    about = "Bubble-Multiway: multiway and causal graphs of bubble sort",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the multiway state graph.
    ///
    /// Nodes are states, edges are single adjacent swaps of an out-of-order
    /// pair. GraphML is written to the output directory unless --no-graphml.
    Multiway(MultiwayArgs),

    /// Build the causal event graph.
    ///
    /// Nodes are swap events; an edge joins an event to every event that
    /// consumes the state it produced.
    Causal(CausalArgs),

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            if is_input_error(&err) {
                ExitCode::from(EXIT_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::load()?;

    match cli.command {
        Commands::Multiway(args) => {
            let ctx = OpsContext::new(config);
            multiway::execute(&ctx, &args)?;
        }

        Commands::Causal(args) => {
            let ctx = OpsContext::new(config);
            causal::execute(&ctx, &args)?;
        }

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Whether `err` was caused by rejected user input.
fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<InputError>()
            || cause
                .downcast_ref::<OpsError>()
                .is_some_and(OpsError::is_input_error)
    })
}
