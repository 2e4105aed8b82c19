// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Percolation and travel-time benchmarks on a synthetic grid network

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use transit_percolation::prelude::*;

/// `side` x `side` grid of bus links with a walking link on every row start
fn grid(side: u64) -> TransitGraph {
    let mut graph = TransitGraph::new();
    let id = |r: u64, c: u64| StopId(r * side + c);
    for r in 0..side {
        for c in 0..side {
            graph.add_stop(Stop::new(id(r, c), Position::new(c as f64 * 400.0, r as f64 * 400.0)));
        }
    }
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                graph.add_edge(id(r, c), id(r, c + 1), TransitEdge::new(90.0, RouteType(3))).unwrap();
            }
            if r + 1 < side {
                let edge = if c == 0 {
                    TransitEdge::walking(300.0)
                } else {
                    TransitEdge::new(120.0, RouteType(3))
                };
                graph.add_edge(id(r, c), id(r + 1, c), edge).unwrap();
            }
        }
    }
    graph
}

fn bench_percolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("percolation");
    for side in [10u64, 30] {
        let graph = grid(side);
        let ranked = rank(&graph, CentralityMethod::Degree);

        group.bench_with_input(BenchmarkId::new("random", side), &graph, |b, g| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            b.iter(|| random_percolation(black_box(g), 0.3, &mut rng).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("targeted", side), &graph, |b, g| {
            b.iter(|| targeted_percolation(black_box(g), 0.3, &ranked).unwrap());
        });
    }
    group.finish();
}

fn bench_travel_time(c: &mut Criterion) {
    let graph = grid(20);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let pairs = SamplePairSet::draw(&graph, 100, &mut rng);

    c.bench_function("sampled_average_100_pairs", |b| {
        b.iter(|| sampled_average_travel_time(black_box(&pairs), &graph).unwrap());
    });
    c.bench_function("rank_betweenness", |b| {
        b.iter(|| rank(black_box(&graph), CentralityMethod::Betweenness));
    });
}

criterion_group!(benches, bench_percolation, bench_travel_time);
criterion_main!(benches);
