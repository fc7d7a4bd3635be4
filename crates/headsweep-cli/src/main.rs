//! headsweep CLI.
//!
//! Simulates disk head scheduling algorithms and prints their traces.
//!
//! # Quick Start
//!
//! ```bash
//! # One algorithm, requests given as TRACK[@ARRIVAL]
//! headsweep run look --initial 10 --requests 10@0,19@1,3@2,14@3,12@6,9@7 --time-per-track 5
//!
//! # Every algorithm side by side
//! headsweep compare --initial 50 --requests 10,70,90,20,60,80 --n-step 3
//!
//! # Randomized invariant checking
//! headsweep sim run --iterations 1000
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use headsweep_config::OutputFormat;

use crate::commands::ScenarioArgs;

/// headsweep - disk head scheduling simulator.
#[derive(Parser)]
#[command(name = "headsweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Project directory holding headsweep.toml.
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Run one scheduling algorithm and print its trace.
    Run {
        /// Algorithm tag (SSTF, SCAN, LOOK, C-SCAN, C-LOOK, SCAN-N, LOOK-N, F-SCAN, F-LOOK).
        /// Defaults to scheduler.algorithm from configuration.
        algorithm: Option<String>,

        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Print the BLAKE3 trace fingerprint.
        #[arg(long)]
        fingerprint: bool,
    },

    /// Run every algorithm on the same scenario and rank them.
    Compare {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Randomized simulation testing.
    #[command(subcommand)]
    Sim(SimCommands),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum SimCommands {
    /// Run a batch of seeded simulations with invariant checking.
    Run {
        /// Number of seeds to run.
        #[arg(short, long)]
        iterations: Option<u64>,

        /// First seed of the batch.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum requests per generated scenario.
        #[arg(long)]
        max_requests: Option<usize>,
    },

    /// Replay a single seed with verbose output.
    Verify {
        /// Seed to replay.
        #[arg(short, long)]
        seed: u64,

        /// Print the full trace for one algorithm.
        #[arg(short, long)]
        algorithm: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format.
        #[arg(long, default_value = "text")]
        format: ConfigFormat,
    },

    /// Write a headsweep.toml with the default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Check the effective configuration, or a single file.
    Validate {
        /// File to check instead of the layered configuration.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Text,
    Json,
    Toml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    let project = cli.project.as_path();
    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Run {
            algorithm,
            scenario,
            format,
            fingerprint,
        } => commands::run::run(
            project,
            algorithm.as_deref(),
            &scenario,
            format.map(Into::into),
            fingerprint,
        ),
        Commands::Compare { scenario, format } => {
            commands::compare::run(project, &scenario, format.map(Into::into))
        }
        Commands::Sim(cmd) => match cmd {
            SimCommands::Run {
                iterations,
                seed,
                max_requests,
            } => commands::sim::run(project, iterations, seed, max_requests, cli.verbose),
            SimCommands::Verify { seed, algorithm } => {
                commands::sim::verify(project, seed, algorithm.as_deref())
            }
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { format } => {
                let format = match format {
                    ConfigFormat::Text => "text",
                    ConfigFormat::Json => "json",
                    ConfigFormat::Toml => "toml",
                };
                commands::config::show(project, format)
            }
            ConfigCommands::Init { force } => commands::config::init(project, force),
            ConfigCommands::Validate { file } => {
                commands::config::validate(project, file.as_deref())
            }
        },
    }
}
