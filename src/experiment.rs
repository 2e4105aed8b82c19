// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Percolation sweep: probability × repetition × trial

use crate::centrality::{self, CentralityMethod};
use crate::error::NetworkError;
use crate::graph::TransitGraph;
use crate::percolation::{random_percolation, targeted_percolation};
use crate::travel_time::{
    sampled_average_travel_time, sampled_average_travel_time_with_penalty, SamplePairSet,
};
use crate::types::{ResultRecord, StopId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use tracing::{debug, info, warn};

/// Pairs sampled per test unless configured otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// How edges are chosen for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// Independent Bernoulli removal
    Random,
    /// Removal by descending centrality
    Targeted(CentralityMethod),
}

impl AttackMode {
    /// Parse a method name: `random`, or any centrality name (unknown
    /// names fall back to degree)
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("random") {
            Self::Random
        } else {
            Self::Targeted(CentralityMethod::parse_lenient(name))
        }
    }
}

impl fmt::Display for AttackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Targeted(method) => write!(f, "targeted ({method})"),
        }
    }
}

/// Parameters of one sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// `random` or a centrality method name
    pub method: String,
    /// Repetitions, each with its own sample pair set
    pub n_tests: usize,
    /// Lowest removal probability
    pub p_min: f64,
    /// Highest removal probability
    pub p_max: f64,
    /// Number of evenly spaced probabilities
    pub steps: usize,
    /// Trials per probability
    pub n_percolations: usize,
    /// Pairs per sample set
    pub sample_size: usize,
    /// RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Travel time charged for a disconnected sampled pair. When absent the
    /// trial is skipped instead.
    pub disconnected_penalty: Option<f64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            method: "random".to_string(),
            n_tests: 1,
            p_min: 0.0,
            p_max: 1.0,
            steps: 11,
            n_percolations: 10,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
            disconnected_penalty: None,
        }
    }
}

impl ExperimentConfig {
    /// The attack mode named by `method`
    #[must_use]
    pub fn attack_mode(&self) -> AttackMode {
        AttackMode::parse(&self.method)
    }

    /// `steps` evenly spaced values from `p_min` to `p_max`, both included
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![self.p_min],
            steps => {
                let step = (self.p_max - self.p_min) / (steps - 1) as f64;
                (0..steps)
                    .map(|i| {
                        if i == steps - 1 {
                            self.p_max
                        } else {
                            self.p_min + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

    /// Check that both probability bounds lie in [0, 1]
    pub fn validate(&self) -> Result<(), NetworkError> {
        for p in [self.p_min, self.p_max] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NetworkError::InvalidProbability(p));
            }
        }
        Ok(())
    }

    /// Records a full sweep produces when no trial is skipped
    #[must_use]
    pub fn expected_records(&self) -> usize {
        self.n_tests * self.steps * self.n_percolations
    }
}

/// Append-only table of sweep results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentTable {
    records: Vec<ResultRecord>,
}

impl ExperimentTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    /// All records in production order
    #[must_use]
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean result per probability, in sweep order
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_by_p(&self) -> Vec<(f64, f64)> {
        let mut groups: Vec<(f64, f64, usize)> = Vec::new();
        for record in &self.records {
            match groups.iter_mut().find(|(p, _, _)| p.to_bits() == record.p.to_bits()) {
                Some((_, sum, count)) => {
                    *sum += record.result;
                    *count += 1;
                }
                None => groups.push((record.p, record.result, 1)),
            }
        }
        groups
            .into_iter()
            .map(|(p, sum, count)| (p, sum / count as f64))
            .collect()
    }

    /// Write the table as CSV with header `p,perc,test,result`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Serialize the records as a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}

/// Drives percolation trials over a repaired graph
pub struct ExperimentRunner<'g> {
    graph: &'g TransitGraph,
    config: ExperimentConfig,
}

impl<'g> ExperimentRunner<'g> {
    /// Create a runner, validating the configuration
    pub fn new(graph: &'g TransitGraph, config: ExperimentConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run the sweep, drawing all randomness from `rng`
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ExperimentTable, NetworkError> {
        let mode = self.config.attack_mode();
        let ranked: Option<Vec<StopId>> = match mode {
            AttackMode::Random => None,
            AttackMode::Targeted(method) => Some(centrality::rank(self.graph, method)),
        };
        let probabilities = self.config.probabilities();
        info!(
            "Running {} sweep: {} tests x {} probabilities x {} trials",
            mode,
            self.config.n_tests,
            probabilities.len(),
            self.config.n_percolations
        );

        let mut table = ExperimentTable::new();
        let mut skipped = 0_usize;
        for test in 0..self.config.n_tests {
            let sample = SamplePairSet::draw(self.graph, self.config.sample_size, rng);
            for &p in &probabilities {
                for perc in 0..self.config.n_percolations {
                    let perturbed = match &ranked {
                        None => random_percolation(self.graph, p, rng)?,
                        Some(ranked) => targeted_percolation(self.graph, p, ranked)?,
                    };
                    let measured = match self.config.disconnected_penalty {
                        Some(penalty) => sampled_average_travel_time_with_penalty(&sample, &perturbed, penalty),
                        None => sampled_average_travel_time(&sample, &perturbed),
                    };
                    match measured {
                        Ok(result) => table.push(ResultRecord { p, perc, test, result }),
                        Err(NetworkError::NoPath { from, to }) => {
                            warn!(
                                "Skipping test {} p={:.3} trial {}: stops {} and {} are disconnected",
                                test, p, perc, from, to
                            );
                            skipped += 1;
                        }
                        Err(other) => return Err(other),
                    }
                }
                debug!("Finished test {} p={:.3}", test, p);
            }
        }

        info!("Collected {} records ({} trials skipped)", table.len(), skipped);
        Ok(table)
    }
}
