// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Multi-edge transit graph with petgraph backing for algorithms

use crate::error::NetworkError;
use crate::types::{Stop, StopId, TransitEdge};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Key distinguishing parallel edges between the same stop pair.
///
/// Keys stay valid when other edges are removed.
pub type EdgeKey = EdgeIndex;

/// Borrowed view of one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a> {
    /// Edge key
    pub key: EdgeKey,
    /// First endpoint
    pub from: StopId,
    /// Second endpoint
    pub to: StopId,
    /// Edge attributes
    pub edge: &'a TransitEdge,
}

/// An undirected multigraph of stops.
///
/// Stops are never removed, so iteration over stops always follows
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    /// The underlying undirected graph
    graph: StableUnGraph<Stop, TransitEdge>,
    /// Map from stop ID to node index
    node_indices: HashMap<StopId, NodeIndex>,
}

impl TransitGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop, returning its node index.
    ///
    /// Adding a stop that already exists leaves the original untouched.
    pub fn add_stop(&mut self, stop: Stop) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&stop.id) {
            debug!("Stop {} already present, keeping original position", stop.id);
            return idx;
        }
        let id = stop.id;
        let idx = self.graph.add_node(stop);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Add an edge between two existing stops
    pub fn add_edge(
        &mut self,
        from: StopId,
        to: StopId,
        edge: TransitEdge,
    ) -> Result<EdgeKey, NetworkError> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        Ok(self.graph.add_edge(from_idx, to_idx, edge))
    }

    /// Remove an edge, returning its attributes if it was present
    pub fn remove_edge(&mut self, key: EdgeKey) -> Option<TransitEdge> {
        self.graph.remove_edge(key)
    }

    /// Check whether an edge is still present
    #[must_use]
    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.graph.edge_weight(key).is_some()
    }

    /// Check whether a stop is present
    #[must_use]
    pub fn contains_stop(&self, id: StopId) -> bool {
        self.node_indices.contains_key(&id)
    }

    /// Get a stop by ID
    #[must_use]
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.node_indices.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Iterate stops in insertion order
    pub fn stops(&self) -> impl Iterator<Item = &Stop> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Stop IDs in insertion order
    #[must_use]
    pub fn stop_ids(&self) -> Vec<StopId> {
        self.stops().map(|s| s.id).collect()
    }

    /// Get an edge's attributes
    #[must_use]
    pub fn edge(&self, key: EdgeKey) -> Option<&TransitEdge> {
        self.graph.edge_weight(key)
    }

    /// Get an edge's endpoints
    #[must_use]
    pub fn endpoints(&self, key: EdgeKey) -> Option<(StopId, StopId)> {
        self.graph
            .edge_endpoints(key)
            .map(|(a, b)| (self.graph[a].id, self.graph[b].id))
    }

    /// Iterate all edges in key order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(move |e| EdgeView {
            key: e.id(),
            from: self.graph[e.source()].id,
            to: self.graph[e.target()].id,
            edge: e.weight(),
        })
    }

    /// Keys of all edges touching a stop (empty for unknown stops)
    #[must_use]
    pub fn incident_edges(&self, id: StopId) -> Vec<EdgeKey> {
        match self.node_indices.get(&id) {
            Some(&idx) => self.graph.edges(idx).map(|e| e.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Degree counting parallel edges, with self-loops counted twice
    #[must_use]
    pub fn degree(&self, id: StopId) -> usize {
        let Some(&idx) = self.node_indices.get(&id) else {
            return 0;
        };
        self.graph
            .edges(idx)
            .map(|e| if e.source() == e.target() { 2 } else { 1 })
            .sum()
    }

    /// Get stop count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Count of edges that percolation may remove
    #[must_use]
    pub fn non_walking_edge_count(&self) -> usize {
        self.edges().filter(|e| !e.edge.is_walking()).count()
    }

    /// Check if the graph has no stops
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Connected components in enumeration order.
    ///
    /// Components are listed in the order their first stop appears in
    /// insertion order, and each component's stops are in insertion order.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<StopId>> {
        let mut assigned = vec![false; self.graph.node_bound()];
        let mut components = Vec::new();

        for start in self.graph.node_indices() {
            if assigned[start.index()] {
                continue;
            }
            assigned[start.index()] = true;
            let mut members = vec![start];
            let mut frontier = VecDeque::from([start]);
            while let Some(next) = frontier.pop_front() {
                for neighbor in self.graph.neighbors(next) {
                    if !assigned[neighbor.index()] {
                        assigned[neighbor.index()] = true;
                        members.push(neighbor);
                        frontier.push_back(neighbor);
                    }
                }
            }
            members.sort_unstable();
            components.push(members.into_iter().map(|idx| self.graph[idx].id).collect());
        }

        components
    }

    /// Number of connected components
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components().len()
    }

    /// Check whether the graph has exactly one component
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.component_count() == 1
    }

    /// Simple adjacency lists over dense positions (insertion order).
    ///
    /// Parallel edges collapse to one neighbor; a self-loop lists the stop
    /// as its own neighbor.
    #[must_use]
    pub fn simple_adjacency(&self) -> Vec<Vec<usize>> {
        let mut position = vec![usize::MAX; self.graph.node_bound()];
        for (pos, idx) in self.graph.node_indices().enumerate() {
            position[idx.index()] = pos;
        }

        self.graph
            .node_indices()
            .map(|idx| {
                let mut neighbors: Vec<usize> = self
                    .graph
                    .neighbors(idx)
                    .map(|n| position[n.index()])
                    .collect();
                neighbors.sort_unstable();
                neighbors.dedup();
                neighbors
            })
            .collect()
    }

    pub(crate) fn inner(&self) -> &StableUnGraph<Stop, TransitEdge> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: StopId) -> Result<NodeIndex, NetworkError> {
        self.node_indices
            .get(&id)
            .copied()
            .ok_or(NetworkError::UnknownStop(id))
    }
}
