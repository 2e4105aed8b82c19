// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shortest-path travel-time estimators

use crate::error::NetworkError;
use crate::graph::TransitGraph;
use crate::types::StopId;
use petgraph::algo::dijkstra;
use petgraph::stable_graph::NodeIndex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Fixed set of stop pairs used to approximate the average travel time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePairSet {
    pairs: Vec<(StopId, StopId)>,
}

impl SamplePairSet {
    /// Wrap an explicit list of pairs
    #[must_use]
    pub fn new(pairs: Vec<(StopId, StopId)>) -> Self {
        Self { pairs }
    }

    /// Draw `size` pairs uniformly, with replacement across pairs.
    ///
    /// The two stops of a pair differ whenever the graph has at least two
    /// stops; a single-stop graph yields self-pairs and an empty graph an
    /// empty set.
    pub fn draw<R: Rng + ?Sized>(graph: &TransitGraph, size: usize, rng: &mut R) -> Self {
        let ids = graph.stop_ids();
        let pairs = match ids.as_slice() {
            [] => Vec::new(),
            [only] => vec![(*only, *only); size],
            _ => (0..size)
                .map(|_| {
                    let a = rng.gen_range(0..ids.len());
                    let mut b = rng.gen_range(0..ids.len() - 1);
                    if b >= a {
                        b += 1;
                    }
                    (ids[a], ids[b])
                })
                .collect(),
        };
        Self { pairs }
    }

    /// Every ordered pair of distinct stops
    #[must_use]
    pub fn all_pairs(graph: &TransitGraph) -> Self {
        let ids = graph.stop_ids();
        let pairs = ids
            .iter()
            .flat_map(|&a| ids.iter().filter(move |&&b| b != a).map(move |&b| (a, b)))
            .collect();
        Self { pairs }
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate the pairs in draw order
    pub fn iter(&self) -> impl Iterator<Item = &(StopId, StopId)> + '_ {
        self.pairs.iter()
    }
}

impl FromIterator<(StopId, StopId)> for SamplePairSet {
    fn from_iter<I: IntoIterator<Item = (StopId, StopId)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn shortest_durations(graph: &TransitGraph, start: NodeIndex, goal: Option<NodeIndex>) -> HashMap<NodeIndex, f64> {
    dijkstra(graph.inner(), start, goal, |e| e.weight().duration)
}

/// Shortest travel time between two stops, weighted by duration
pub fn pair_travel_time(graph: &TransitGraph, from: StopId, to: StopId) -> Result<f64, NetworkError> {
    let start = graph.index_of(from)?;
    let goal = graph.index_of(to)?;
    shortest_durations(graph, start, Some(goal))
        .get(&goal)
        .copied()
        .ok_or(NetworkError::NoPath { from, to })
}

/// Size-weighted mean of per-component average travel times.
///
/// Each component contributes the mean over its ordered stop pairs, weighted
/// by its stop count; the sum is divided by the total stop count. Pairs in
/// different components never enter the average, so the result is finite on
/// disconnected graphs. Singleton components and empty graphs contribute 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weighted_average_travel_time(graph: &TransitGraph) -> f64 {
    let total = graph.node_count();
    if total == 0 {
        return 0.0;
    }

    let mut weighted = 0.0;
    for component in graph.components() {
        let size = component.len();
        if size < 2 {
            continue;
        }
        let sum: f64 = component
            .iter()
            .filter_map(|&stop| graph.index_of(stop).ok())
            .map(|start| shortest_durations(graph, start, None).values().sum::<f64>())
            .sum();
        let mean = sum / (size * (size - 1)) as f64;
        weighted += mean * size as f64;
    }
    weighted / total as f64
}

/// Mean travel time over a fixed pair set.
///
/// Pairs sharing a source stop share one shortest-path search. Fails with
/// [`NetworkError::NoPath`] on the first disconnected pair. An empty set
/// averages to 0.
pub fn sampled_average_travel_time(pairs: &SamplePairSet, graph: &TransitGraph) -> Result<f64, NetworkError> {
    sampled_mean(pairs, graph, None)
}

/// Like [`sampled_average_travel_time`], but a disconnected pair counts as
/// `penalty` instead of failing
pub fn sampled_average_travel_time_with_penalty(
    pairs: &SamplePairSet,
    graph: &TransitGraph,
    penalty: f64,
) -> Result<f64, NetworkError> {
    sampled_mean(pairs, graph, Some(penalty))
}

#[allow(clippy::cast_precision_loss)]
fn sampled_mean(pairs: &SamplePairSet, graph: &TransitGraph, penalty: Option<f64>) -> Result<f64, NetworkError> {
    if pairs.is_empty() {
        return Ok(0.0);
    }

    let mut by_source: HashMap<StopId, HashMap<NodeIndex, f64>> = HashMap::new();
    let mut sum = 0.0;
    for &(from, to) in pairs.iter() {
        let goal = graph.index_of(to)?;
        let durations = match by_source.entry(from) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let start = graph.index_of(from)?;
                entry.insert(shortest_durations(graph, start, None))
            }
        };
        sum += match (durations.get(&goal), penalty) {
            (Some(&duration), _) => duration,
            (None, Some(penalty)) => penalty,
            (None, None) => return Err(NetworkError::NoPath { from, to }),
        };
    }
    Ok(sum / pairs.len() as f64)
}
