// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stop importance rankings used to drive targeted attacks
//!
//! | Method | Question answered |
//! |--------|-------------------|
//! | Degree | How many links touch the stop? |
//! | Eigenvector | Is it linked to other important stops? |
//! | Betweenness | How often is it on a shortest hop path? |
//! | Closeness | How few hops away is everything else? |
//!
//! Degree counts parallel edges; the other three work on the simple
//! (deduplicated) adjacency and ignore durations. Scores are recomputed on
//! every call.

use crate::graph::TransitGraph;
use crate::types::StopId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, warn};

const EIGENVECTOR_MAX_ITER: usize = 100;
const EIGENVECTOR_TOLERANCE: f64 = 1e-6;

/// Importance measure for ranking stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralityMethod {
    /// Raw degree, parallel edges included
    #[default]
    Degree,
    /// Eigenvector centrality (power iteration)
    Eigenvector,
    /// Normalized shortest-path betweenness
    Betweenness,
    /// Closeness scaled by reachable fraction
    Closeness,
}

impl CentralityMethod {
    /// Every supported method
    pub const ALL: [Self; 4] = [Self::Degree, Self::Eigenvector, Self::Betweenness, Self::Closeness];

    /// Parse a method name; anything unrecognized falls back to degree
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "degree" => Self::Degree,
            "eigenvector" => Self::Eigenvector,
            "betweenness" => Self::Betweenness,
            "closeness" => Self::Closeness,
            other => {
                warn!("Unknown centrality method '{}', falling back to degree", other);
                Self::Degree
            }
        }
    }

    /// Canonical lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Eigenvector => "eigenvector",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
        }
    }
}

impl fmt::Display for CentralityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Score every stop, in the graph's stop order
#[must_use]
pub fn scores(graph: &TransitGraph, method: CentralityMethod) -> Vec<(StopId, f64)> {
    let ids = graph.stop_ids();
    let values = match method {
        #[allow(clippy::cast_precision_loss)]
        CentralityMethod::Degree => ids.iter().map(|&id| graph.degree(id) as f64).collect(),
        CentralityMethod::Eigenvector => eigenvector(&graph.simple_adjacency()),
        CentralityMethod::Betweenness => betweenness(&graph.simple_adjacency()),
        CentralityMethod::Closeness => closeness(&graph.simple_adjacency()),
    };
    ids.into_iter().zip(values).collect()
}

/// Stops sorted by descending score; ties keep the graph's stop order
#[must_use]
pub fn rank(graph: &TransitGraph, method: CentralityMethod) -> Vec<StopId> {
    let mut scored = scores(graph, method);
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    debug!("Ranked {} stops by {}", scored.len(), method);
    scored.into_iter().map(|(id, _)| id).collect()
}

#[allow(clippy::cast_precision_loss)]
fn eigenvector(adjacency: &[Vec<usize>]) -> Vec<f64> {
    let n = adjacency.len();
    if n == 0 {
        return Vec::new();
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..EIGENVECTOR_MAX_ITER {
        let last = x.clone();
        for (node, neighbors) in adjacency.iter().enumerate() {
            for &neighbor in neighbors {
                x[neighbor] += last[node];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut x {
                *v /= norm;
            }
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * EIGENVECTOR_TOLERANCE {
            return x;
        }
    }

    warn!(
        "Eigenvector centrality did not converge in {} iterations, using last iterate",
        EIGENVECTOR_MAX_ITER
    );
    x
}

/// Brandes' algorithm on an unweighted graph
#[allow(clippy::cast_precision_loss)]
fn betweenness(adjacency: &[Vec<usize>]) -> Vec<f64> {
    let n = adjacency.len();
    let mut centrality = vec![0.0; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut paths = vec![0.0_f64; n];
        let mut depth = vec![usize::MAX; n];
        paths[source] = 1.0;
        depth[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &adjacency[v] {
                if depth[w] == usize::MAX {
                    depth[w] = depth[v] + 1;
                    queue.push_back(w);
                }
                if depth[w] == depth[v] + 1 {
                    paths[w] += paths[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut dependency = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                centrality[w] += dependency[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for c in &mut centrality {
            *c *= scale;
        }
    }
    centrality
}

/// Closeness with the reachable-fraction correction for disconnected graphs
#[allow(clippy::cast_precision_loss)]
fn closeness(adjacency: &[Vec<usize>]) -> Vec<f64> {
    let n = adjacency.len();
    (0..n)
        .map(|source| {
            let depth = hop_distances(adjacency, source);
            let reached: Vec<usize> = depth.into_iter().filter(|&d| d != usize::MAX).collect();
            let total: usize = reached.iter().sum();
            let others = reached.len() - 1;
            if total > 0 && n > 1 {
                let c = others as f64 / total as f64;
                c * others as f64 / (n - 1) as f64
            } else {
                0.0
            }
        })
        .collect()
}

fn hop_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<usize> {
    let mut depth = vec![usize::MAX; adjacency.len()];
    depth[source] = 0;
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        for &w in &adjacency[v] {
            if depth[w] == usize::MAX {
                depth[w] = depth[v] + 1;
                queue.push_back(w);
            }
        }
    }
    depth
}
