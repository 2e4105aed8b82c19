// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph construction from edge and node tables

use crate::error::{LoadError, NetworkError};
use crate::graph::TransitGraph;
use crate::projection::project;
use crate::types::{RouteType, Stop, StopId, TransitEdge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Default column delimiter of the network tables
pub const DEFAULT_DELIMITER: u8 = b';';

/// One row of the edge table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Origin stop
    #[serde(rename = "from_stop_I")]
    pub from: StopId,
    /// Destination stop
    #[serde(rename = "to_stop_I")]
    pub to: StopId,
    /// Average travel time
    #[serde(rename = "duration_avg")]
    pub duration: f64,
    /// Mode category
    pub route_type: RouteType,
}

/// One row of the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stop identifier
    #[serde(rename = "stop_I")]
    pub id: StopId,
    /// Stop name
    #[serde(default)]
    pub name: String,
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl NodeRecord {
    fn to_stop(&self) -> Stop {
        Stop {
            id: self.id,
            name: self.name.clone(),
            position: project(self.lon, self.lat),
        }
    }
}

/// Which stops the builder creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopSelection {
    /// One stop per node-table row, in table order
    #[default]
    AllNodes,
    /// Only stops referenced by an edge, in order of first reference
    ReferencedOnly,
}

/// Builds a [`TransitGraph`] from tabular records
#[derive(Debug, Clone)]
pub struct GraphBuilder<'a> {
    nodes: &'a [NodeRecord],
    selection: StopSelection,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder resolving positions from the given node table
    #[must_use]
    pub fn new(nodes: &'a [NodeRecord]) -> Self {
        Self {
            nodes,
            selection: StopSelection::AllNodes,
        }
    }

    /// Only create stops that appear in the edge table
    #[must_use]
    pub fn referenced_only(mut self) -> Self {
        self.selection = StopSelection::ReferencedOnly;
        self
    }

    /// Build the graph; every edge record becomes a distinct edge.
    ///
    /// When a stop id appears in several node rows, the last row supplies its
    /// name and position.
    pub fn build(&self, edges: &[EdgeRecord]) -> Result<TransitGraph, NetworkError> {
        let by_id: HashMap<StopId, &NodeRecord> = self.nodes.iter().map(|n| (n.id, n)).collect();
        let mut graph = TransitGraph::new();

        if self.selection == StopSelection::AllNodes {
            for node in self.nodes {
                let latest = by_id.get(&node.id).copied().unwrap_or(node);
                graph.add_stop(latest.to_stop());
            }
        }

        for record in edges {
            for endpoint in [record.from, record.to] {
                if graph.contains_stop(endpoint) {
                    continue;
                }
                let node = by_id.get(&endpoint).ok_or(NetworkError::MissingPosition {
                    from: record.from,
                    to: record.to,
                    missing: endpoint,
                })?;
                graph.add_stop(node.to_stop());
            }
            graph.add_edge(
                record.from,
                record.to,
                TransitEdge::new(record.duration, record.route_type),
            )?;
        }

        debug!(
            "Built graph with {} stops and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Build a graph with one stop per node record
pub fn build_graph(edges: &[EdgeRecord], nodes: &[NodeRecord]) -> Result<TransitGraph, NetworkError> {
    GraphBuilder::new(nodes).build(edges)
}

/// Parse an edge table from any reader
pub fn parse_edge_table<R: Read>(reader: R, delimiter: u8) -> Result<Vec<EdgeRecord>, LoadError> {
    parse_table(reader, delimiter)
}

/// Parse a node table from any reader
pub fn parse_node_table<R: Read>(reader: R, delimiter: u8) -> Result<Vec<NodeRecord>, LoadError> {
    parse_table(reader, delimiter)
}

/// Read an edge table from disk
pub fn read_edge_table(path: &Path, delimiter: u8) -> Result<Vec<EdgeRecord>, LoadError> {
    let records: Vec<EdgeRecord> = read_table(path, delimiter)?;
    info!("Read {} edges from {}", records.len(), path.display());
    Ok(records)
}

/// Read a node table from disk
pub fn read_node_table(path: &Path, delimiter: u8) -> Result<Vec<NodeRecord>, LoadError> {
    let records: Vec<NodeRecord> = read_table(path, delimiter)?;
    info!("Read {} stops from {}", records.len(), path.display());
    Ok(records)
}

fn read_table<T: DeserializeOwned>(path: &Path, delimiter: u8) -> Result<Vec<T>, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_records(reader)
}

fn parse_table<T: DeserializeOwned, R: Read>(reader: R, delimiter: u8) -> Result<Vec<T>, LoadError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_records(reader)
}

fn collect_records<T: DeserializeOwned, R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<T>, LoadError> {
    reader
        .deserialize()
        .map(|row| row.map_err(LoadError::from))
        .collect()
}
