// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Structured edge lists through graph building, repair and percolation

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use transit_percolation::loader::{EdgeRecord, GraphBuilder, NodeRecord};
use transit_percolation::prelude::*;

#[derive(Debug, Arbitrary)]
struct Input {
    stops: Vec<(u8, i16, i16)>,
    edges: Vec<(u8, u8, u16, bool)>,
    p: u8,
}

fuzz_target!(|input: Input| {
    let nodes: Vec<NodeRecord> = input
        .stops
        .iter()
        .map(|&(id, lon, lat)| NodeRecord {
            id: StopId(u64::from(id)),
            name: String::new(),
            lon: f64::from(lon) / 200.0,
            lat: f64::from(lat) / 400.0,
        })
        .collect();
    let records: Vec<EdgeRecord> = input
        .edges
        .iter()
        .map(|&(from, to, duration, walk)| EdgeRecord {
            from: StopId(u64::from(from)),
            to: StopId(u64::from(to)),
            duration: f64::from(duration),
            route_type: if walk { RouteType::WALK } else { RouteType(3) },
        })
        .collect();
    let walking: Vec<EdgeRecord> = records.iter().filter(|r| r.route_type.is_walking()).cloned().collect();

    let Ok(mut full) = GraphBuilder::new(&nodes).build(&records) else {
        return;
    };
    let Ok(mut walk) = GraphBuilder::new(&nodes).referenced_only().build(&walking) else {
        return;
    };
    make_walking_connected(&mut full, &mut walk).unwrap();
    assert!(full.node_count() == 0 || full.is_connected());

    let p = f64::from(input.p) / f64::from(u8::MAX);
    let ranked = rank(&full, CentralityMethod::Degree);
    let attacked = targeted_percolation(&full, p, &ranked).unwrap();
    assert!(attacked.edge_count() <= full.edge_count());
});
