// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! transit-percolation CLI - edge-removal resilience sweeps for transit networks

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use transit_percolation::commands::{
    self, rank::RankArgs, run::RunArgs, travel_time::TravelTimeArgs, InputArgs,
};
use transit_percolation::config;

#[derive(Parser)]
#[command(name = "transit-percolation")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "PERCOLATION_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep removal probabilities and record mean travel times
    Run(RunArgs),

    /// Rank stops by centrality
    Rank(RankArgs),

    /// Connect the walking layer and report the links added
    Repair(InputArgs),

    /// Shortest travel time between two stops, or the all-pairs average
    TravelTime(TravelTimeArgs),

    /// Show the effective configuration
    Config {
        /// Dotted key, e.g. experiment.steps
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        return commands::completions::run(shell, &mut Cli::command());
    }

    let config = config::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Run(args) => commands::run::run(&config, &args, cli.json),
        Commands::Rank(args) => commands::rank::run(&config, &args, cli.json),
        Commands::Repair(input) => commands::repair::run(&config, &input, cli.json),
        Commands::TravelTime(args) => commands::travel_time::run(&config, &args, cli.json),
        Commands::Config { key } => commands::config::run(&config, key.as_deref(), cli.json),
        Commands::Completions { .. } => Ok(()),
    }
}
