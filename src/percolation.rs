// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge-removal strategies
//!
//! Both strategies copy the input graph and remove edges from the copy.
//! Walking edges ([`RouteType::WALK`](crate::types::RouteType::WALK)) are
//! never removed.

use crate::error::NetworkError;
use crate::graph::{EdgeKey, TransitGraph};
use crate::types::StopId;
use rand::Rng;
use tracing::trace;

fn check_probability(p: f64) -> Result<(), NetworkError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(NetworkError::InvalidProbability(p))
    }
}

/// Remove each non-walking edge independently with probability `p`.
///
/// Draws exactly one Bernoulli trial per non-walking edge, in key order, so
/// parallel edges fail independently.
pub fn random_percolation<R: Rng + ?Sized>(
    graph: &TransitGraph,
    p: f64,
    rng: &mut R,
) -> Result<TransitGraph, NetworkError> {
    check_probability(p)?;

    let doomed: Vec<EdgeKey> = graph
        .edges()
        .filter(|e| !e.edge.is_walking())
        .filter_map(|e| rng.gen_bool(p).then_some(e.key))
        .collect();

    let mut perturbed = graph.clone();
    for key in &doomed {
        perturbed.remove_edge(*key);
    }
    trace!("Random percolation p={} removed {} edges", p, doomed.len());
    Ok(perturbed)
}

/// Edges a targeted attack would remove, in collection order.
///
/// Walks `ranked` in order and gathers every non-walking edge touching each
/// stop. Before moving on to the next stop it stops once
/// `collected / edge_count >= p`, where `edge_count` is the edge count of the
/// unmodified graph (walking edges included) and `collected` counts an edge
/// once per endpoint it was gathered from. A single stop may therefore
/// overshoot `p`.
pub fn targeted_candidates(
    graph: &TransitGraph,
    p: f64,
    ranked: &[StopId],
) -> Result<Vec<EdgeKey>, NetworkError> {
    check_probability(p)?;

    let total = graph.edge_count();
    let mut candidates = Vec::new();
    for &stop in ranked {
        if reached_fraction(candidates.len(), total, p) {
            break;
        }
        candidates.extend(
            graph
                .incident_edges(stop)
                .into_iter()
                .filter(|&key| graph.edge(key).is_some_and(|e| !e.is_walking())),
        );
    }
    Ok(candidates)
}

#[allow(clippy::cast_precision_loss)]
fn reached_fraction(collected: usize, total: usize, p: f64) -> bool {
    total == 0 || collected as f64 / total as f64 >= p
}

/// Remove the edges of the highest-ranked stops until a fraction `p` of
/// the edges has been touched. See [`targeted_candidates`].
pub fn targeted_percolation(
    graph: &TransitGraph,
    p: f64,
    ranked: &[StopId],
) -> Result<TransitGraph, NetworkError> {
    let candidates = targeted_candidates(graph, p, ranked)?;

    let mut perturbed = graph.clone();
    let removed = candidates
        .iter()
        .filter(|&&key| perturbed.remove_edge(key).is_some())
        .count();
    trace!(
        "Targeted percolation p={} collected {} candidates, removed {} edges",
        p,
        candidates.len(),
        removed
    );
    Ok(perturbed)
}
