// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Rank command - list the most central stops

use super::{load_network, InputArgs};
use crate::centrality::{self, CentralityMethod};
use crate::config::Config;
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

/// Arguments for the rank command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RankArgs {
    /// Input tables
    #[command(flatten)]
    pub input: InputArgs,

    /// Centrality measure: degree, eigenvector, betweenness, closeness
    #[arg(short, long, default_value = "degree")]
    pub method: String,

    /// Number of stops to show (0 for all)
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

#[derive(Serialize)]
struct RankedStop<'a> {
    rank: usize,
    stop: u64,
    name: &'a str,
    score: f64,
}

/// Rank stops of the repaired network
pub fn run(config: &Config, args: &RankArgs, json: bool) -> Result<()> {
    let network = load_network(&args.input.merge(&config.input))?;
    let method = CentralityMethod::parse_lenient(&args.method);

    let scores: HashMap<_, _> = centrality::scores(&network.full, method).into_iter().collect();
    let order = centrality::rank(&network.full, method);
    let take = if args.limit == 0 { order.len() } else { args.limit };

    let rows: Vec<RankedStop<'_>> = order
        .iter()
        .take(take)
        .enumerate()
        .map(|(i, id)| RankedStop {
            rank: i + 1,
            stop: id.0,
            name: network.full.stop(*id).map_or("", |s| s.name.as_str()),
            score: scores.get(id).copied().unwrap_or_default(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Top {} stops by {} centrality:", rows.len(), method);
    for row in &rows {
        println!("{:>4}. {:>8}  {:<30} {:.6}", row.rank, row.stop, row.name, row.score);
    }
    Ok(())
}
