// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod rank;
pub mod repair;
pub mod run;
pub mod travel_time;

use crate::config::InputConfig;
use crate::graph::TransitGraph;
use crate::loader::{read_edge_table, read_node_table, EdgeRecord, GraphBuilder};
use crate::repair::{make_walking_connected, RepairReport};
use crate::types::RouteType;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Input table flags shared by every command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InputArgs {
    /// Transit edge table (from_stop_I, to_stop_I, duration_avg, route_type)
    #[arg(long)]
    pub edges: Option<PathBuf>,

    /// Stop table (stop_I, name, lon, lat)
    #[arg(long)]
    pub nodes: Option<PathBuf>,

    /// Walking edge table, same columns as the transit table
    #[arg(long)]
    pub walk: Option<PathBuf>,

    /// Column delimiter
    #[arg(long)]
    pub delimiter: Option<char>,
}

impl InputArgs {
    /// Overlay the flags that were given onto the configured input
    #[must_use]
    pub fn merge(&self, base: &InputConfig) -> InputConfig {
        InputConfig {
            edges: self.edges.clone().or_else(|| base.edges.clone()),
            nodes: self.nodes.clone().or_else(|| base.nodes.clone()),
            walk: self.walk.clone().or_else(|| base.walk.clone()),
            delimiter: self
                .delimiter
                .map_or_else(|| base.delimiter.clone(), |c| c.to_string()),
        }
    }
}

/// The repaired full and walking graphs
pub struct Network {
    /// Transit and walking edges together
    pub full: TransitGraph,
    /// Walking edges only
    pub walking: TransitGraph,
    /// What connectivity repair added
    pub repair: RepairReport,
}

/// Read the tables, build both graphs and repair the walking layer.
///
/// Every walking row is treated as a walking link regardless of its
/// `route_type` column, and is added to the full graph as well.
pub fn load_network(input: &InputConfig) -> Result<Network> {
    let delimiter = input.delimiter_byte();
    let nodes_path = required(input.nodes.as_deref(), "--nodes")?;
    let edges_path = required(input.edges.as_deref(), "--edges")?;

    let nodes = read_node_table(nodes_path, delimiter)
        .with_context(|| format!("Failed to read stops from {}", nodes_path.display()))?;
    let transit = read_edge_table(edges_path, delimiter)
        .with_context(|| format!("Failed to read edges from {}", edges_path.display()))?;
    let walk: Vec<EdgeRecord> = match input.walk.as_deref() {
        Some(path) => read_edge_table(path, delimiter)
            .with_context(|| format!("Failed to read walking edges from {}", path.display()))?
            .into_iter()
            .map(|record| EdgeRecord {
                route_type: RouteType::WALK,
                ..record
            })
            .collect(),
        None => Vec::new(),
    };

    let combined: Vec<EdgeRecord> = transit.iter().chain(&walk).cloned().collect();
    let mut full = GraphBuilder::new(&nodes)
        .build(&combined)
        .context("Failed to build transit graph")?;
    let mut walking = GraphBuilder::new(&nodes)
        .referenced_only()
        .build(&walk)
        .context("Failed to build walking graph")?;

    let repair = make_walking_connected(&mut full, &mut walking)
        .context("Failed to connect walking layer")?;
    info!(
        "Network ready: {} stops, {} edges ({} synthetic walking links)",
        full.node_count(),
        full.edge_count(),
        repair.links.len()
    );

    Ok(Network {
        full,
        walking,
        repair,
    })
}

fn required<'a>(path: Option<&'a Path>, flag: &str) -> Result<&'a Path> {
    path.ok_or_else(|| anyhow::anyhow!("{} is required (flag or [input] config)", flag))
}
