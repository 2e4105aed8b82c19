// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for percolation, repair and travel times
//!
//! These tests verify critical invariants:
//! 1. Walking edges survive every attack
//! 2. Targeted removal grows with p and stays within one stop of the target
//! 3. Repair always leaves one connected component
//! 4. Averages agree across estimators

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use transit_percolation::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

type EdgeDraw = (usize, usize, f64, bool);

fn position(i: usize) -> Position {
    Position::new(((i * 37) % 11) as f64 * 100.0, ((i * 53) % 7) as f64 * 100.0)
}

fn stop_id(i: usize) -> StopId {
    StopId(i as u64 + 1)
}

/// Full graph over `n` stops plus the walking graph of the walking edges only
fn build_pair(n: usize, edges: &[EdgeDraw]) -> (TransitGraph, TransitGraph) {
    let mut full = TransitGraph::new();
    let mut walking = TransitGraph::new();
    for i in 0..n {
        full.add_stop(Stop::new(stop_id(i), position(i)));
    }
    for &(a, b, duration, walk) in edges {
        if walk {
            let edge = TransitEdge::walking(duration);
            walking.add_stop(Stop::new(stop_id(a), position(a)));
            walking.add_stop(Stop::new(stop_id(b), position(b)));
            walking.add_edge(stop_id(a), stop_id(b), edge).unwrap();
            full.add_edge(stop_id(a), stop_id(b), edge).unwrap();
        } else {
            full.add_edge(stop_id(a), stop_id(b), TransitEdge::new(duration, RouteType(1)))
                .unwrap();
        }
    }
    (full, walking)
}

fn cycle(graph: &mut TransitGraph, ids: &[u64]) {
    for &id in ids {
        graph.add_stop(Stop::new(StopId(id), Position::new(id as f64, 0.0)));
    }
    for (i, &id) in ids.iter().enumerate() {
        let next = ids[(i + 1) % ids.len()];
        graph
            .add_edge(StopId(id), StopId(next), TransitEdge::new(1.0, RouteType(3)))
            .unwrap();
    }
}

/// A-B (5, bus), B-C (3, bus), C-D (2, walk)
fn scenario() -> TransitGraph {
    let mut graph = TransitGraph::new();
    for id in 1..=4 {
        graph.add_stop(Stop::new(StopId(id), Position::new(id as f64 * 10.0, 0.0)));
    }
    graph.add_edge(StopId(1), StopId(2), TransitEdge::new(5.0, RouteType(1))).unwrap();
    graph.add_edge(StopId(2), StopId(3), TransitEdge::new(3.0, RouteType(1))).unwrap();
    graph.add_edge(StopId(3), StopId(4), TransitEdge::walking(2.0)).unwrap();
    graph
}

fn network() -> impl Strategy<Value = (usize, Vec<EdgeDraw>)> {
    (1usize..10).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 1.0f64..20.0, any::<bool>());
        (Just(n), prop::collection::vec(edge, 0..25))
    })
}

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn test_scenario_random_full_removal() {
    let graph = scenario();
    assert_eq!(pair_travel_time(&graph, StopId(1), StopId(4)).unwrap(), 10.0);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let attacked = random_percolation(&graph, 1.0, &mut rng).unwrap();

    assert_eq!(attacked.edge_count(), 1);
    assert!(attacked.edges().all(|e| e.edge.is_walking()));
    assert_eq!(
        pair_travel_time(&attacked, StopId(1), StopId(4)),
        Err(NetworkError::NoPath {
            from: StopId(1),
            to: StopId(4)
        })
    );
    // input untouched
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_two_cycles_weighted_average() {
    let mut graph = TransitGraph::new();
    cycle(&mut graph, &[1, 2, 3]);
    cycle(&mut graph, &[10, 11, 12, 13, 14]);

    let average = weighted_average_travel_time(&graph);
    assert!((average - 10.5 / 8.0).abs() < 1e-12);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut graph = TransitGraph::new();
    cycle(&mut graph, &[1, 2, 3, 4, 5, 6]);
    let config = ExperimentConfig {
        steps: 3,
        n_percolations: 4,
        n_tests: 2,
        sample_size: 5,
        disconnected_penalty: Some(100.0),
        ..ExperimentConfig::default()
    };
    let runner = ExperimentRunner::new(&graph, config).unwrap();

    let first = runner.run(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();
    let second = runner.run(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2 * 3 * 4);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_zero_probability_keeps_everything((n, edges) in network(), seed in any::<u64>()) {
        let (full, _) = build_pair(n, &edges);
        let ranked = rank(&full, CentralityMethod::Degree);

        let random = random_percolation(&full, 0.0, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let targeted = targeted_percolation(&full, 0.0, &ranked).unwrap();

        prop_assert_eq!(random.edge_count(), full.edge_count());
        prop_assert_eq!(targeted.edge_count(), full.edge_count());
    }

    #[test]
    fn prop_full_random_removal_spares_walking((n, edges) in network(), seed in any::<u64>()) {
        let (full, _) = build_pair(n, &edges);
        let walking = edges.iter().filter(|e| e.3).count();

        let attacked = random_percolation(&full, 1.0, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(attacked.edge_count(), walking);
        prop_assert_eq!(attacked.non_walking_edge_count(), 0);
    }

    #[test]
    fn prop_targeted_removal_is_monotone_and_bounded((n, edges) in network()) {
        let (full, _) = build_pair(n, &edges);
        let ranked = rank(&full, CentralityMethod::Degree);
        let total = full.edge_count();
        let max_degree = full.stop_ids().iter().map(|&id| full.degree(id)).max().unwrap_or(0);

        let mut previous = 0;
        for step in 0..=10 {
            let p = f64::from(step) / 10.0;
            let attacked = targeted_percolation(&full, p, &ranked).unwrap();
            let removed = total - attacked.edge_count();

            prop_assert!(removed >= previous);
            prop_assert!(removed as f64 <= p * total as f64 + max_degree as f64);
            previous = removed;
        }
    }

    #[test]
    fn prop_repair_connects_both_graphs((n, edges) in network()) {
        let (mut full, mut walking) = build_pair(n, &edges);

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        prop_assert_eq!(walking.component_count(), 1);
        prop_assert!(full.is_connected());
        prop_assert_eq!(walking.node_count(), full.node_count());
        prop_assert!(report.links.len() < n);

        let again = make_walking_connected(&mut full, &mut walking).unwrap();
        prop_assert!(again.is_noop());
    }

    #[test]
    fn prop_all_pairs_sample_matches_weighted_average(
        n in 2usize..12,
        extra in prop::collection::vec((0usize..12, 0usize..12, 1.0f64..30.0), 0..15),
        path in prop::collection::vec(1.0f64..30.0, 11),
    ) {
        let mut graph = TransitGraph::new();
        for i in 0..n {
            graph.add_stop(Stop::new(stop_id(i), position(i)));
        }
        for i in 1..n {
            graph.add_edge(stop_id(i - 1), stop_id(i), TransitEdge::new(path[i - 1], RouteType(2))).unwrap();
        }
        for (a, b, duration) in extra {
            if a < n && b < n {
                graph.add_edge(stop_id(a), stop_id(b), TransitEdge::new(duration, RouteType(2))).unwrap();
            }
        }

        let pairs = SamplePairSet::all_pairs(&graph);
        let sampled = sampled_average_travel_time(&pairs, &graph).unwrap();
        let weighted = weighted_average_travel_time(&graph);

        prop_assert!((sampled - weighted).abs() < 1e-9 * weighted.max(1.0));
    }
}
