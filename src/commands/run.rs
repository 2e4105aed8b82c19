// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Run command - percolation sweep over a transit network

use super::{load_network, InputArgs};
use crate::config::Config;
use crate::experiment::{ExperimentConfig, ExperimentRunner};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the run command; absent values come from the config
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Input tables
    #[command(flatten)]
    pub input: InputArgs,

    /// Attack method: random, degree, eigenvector, betweenness, closeness
    #[arg(short, long)]
    pub method: Option<String>,

    /// Repetitions, each with a fresh sample of stop pairs
    #[arg(long)]
    pub n_tests: Option<usize>,

    /// Lowest removal probability
    #[arg(long)]
    pub p_min: Option<f64>,

    /// Highest removal probability
    #[arg(long)]
    pub p_max: Option<f64>,

    /// Number of probabilities between p-min and p-max
    #[arg(long)]
    pub steps: Option<usize>,

    /// Percolation trials per probability
    #[arg(long)]
    pub n_percolations: Option<usize>,

    /// Stop pairs per sample
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// RNG seed for reproducible sweeps
    #[arg(long)]
    pub seed: Option<u64>,

    /// Travel time charged for disconnected pairs (default: skip the trial)
    #[arg(long)]
    pub penalty: Option<f64>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    fn experiment(&self, base: &ExperimentConfig) -> ExperimentConfig {
        ExperimentConfig {
            method: self.method.clone().unwrap_or_else(|| base.method.clone()),
            n_tests: self.n_tests.unwrap_or(base.n_tests),
            p_min: self.p_min.unwrap_or(base.p_min),
            p_max: self.p_max.unwrap_or(base.p_max),
            steps: self.steps.unwrap_or(base.steps),
            n_percolations: self.n_percolations.unwrap_or(base.n_percolations),
            sample_size: self.sample_size.unwrap_or(base.sample_size),
            seed: self.seed.or(base.seed),
            disconnected_penalty: self.penalty.or(base.disconnected_penalty),
        }
    }
}

/// Run the sweep and write the result table
pub fn run(config: &Config, args: &RunArgs, json: bool) -> Result<()> {
    let input = args.input.merge(&config.input);
    let experiment = args.experiment(&config.experiment);

    let network = load_network(&input)?;
    let runner = ExperimentRunner::new(&network.full, experiment).context("Invalid experiment")?;

    let mut rng = match runner.config().seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let table = runner.run(&mut rng).context("Sweep failed")?;

    for (p, mean) in table.mean_by_p() {
        info!("p={:.3}  mean travel time {:.2}", p, mean);
    }

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    if json {
        let content = table.to_json().context("Failed to serialize results")?;
        sink.write_all(content.as_bytes())?;
        sink.write_all(b"\n")?;
    } else {
        table.write_csv(&mut sink).context("Failed to write results")?;
    }
    sink.flush()?;

    if let Some(path) = &args.output {
        println!("Wrote {} records to {}", table.len(), path.display());
    }
    Ok(())
}
