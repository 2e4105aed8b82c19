// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Walking-layer connectivity repair
//!
//! The walking layer only links stops a short hop apart, so it usually
//! splits into many islands. Repair bridges them one at a time: the
//! second-largest island is joined to its nearest stop outside it with a
//! synthetic walking link, mirrored into the full graph, until a single
//! component remains.
//!
//! The nearest-pair search compares every stop of the island against every
//! stop outside it. That is fine for station-sized networks (hundreds to low
//! thousands of stops) but quadratic per iteration beyond that.

use crate::error::NetworkError;
use crate::graph::TransitGraph;
use crate::types::{Stop, StopId, TransitEdge};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Converts raw coordinate distance into effective walking distance
pub const WALKING_DISTANCE_DIVISOR: f64 = 1.6;

/// Assumed walking speed, converting walking distance into duration
pub const WALKING_SPEED: f64 = 1.3;

/// A synthetic walking link inserted during repair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyntheticLink {
    /// Endpoint inside the repaired component
    pub from: StopId,
    /// Endpoint outside it
    pub to: StopId,
    /// Scaled walking distance
    pub distance: f64,
    /// Walking duration assigned to the link
    pub duration: f64,
}

/// What the repair changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepairReport {
    /// Stops copied from the full graph into the walking graph
    pub stops_added_to_walking: usize,
    /// Stops copied from the walking graph into the full graph
    pub stops_added_to_full: usize,
    /// Component count of the walking graph before bridging
    pub initial_components: usize,
    /// Links inserted, in insertion order
    pub links: Vec<SyntheticLink>,
}

impl RepairReport {
    /// Whether the graphs were left untouched
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.stops_added_to_walking == 0 && self.stops_added_to_full == 0 && self.links.is_empty()
    }
}

/// Connect the walking graph, mirroring every synthetic link into `full`.
///
/// Running it again on repaired graphs changes nothing.
pub fn make_walking_connected(
    full: &mut TransitGraph,
    walking: &mut TransitGraph,
) -> Result<RepairReport, NetworkError> {
    let mut report = RepairReport {
        stops_added_to_walking: copy_missing_stops(full, walking),
        stops_added_to_full: copy_missing_stops(walking, full),
        ..RepairReport::default()
    };

    let mut components = walking.components();
    report.initial_components = components.len();
    info!(
        "Walking layer has {} components over {} stops",
        components.len(),
        walking.node_count()
    );

    while components.len() > 1 {
        // stable: equal sizes keep enumeration order
        components.sort_by(|a, b| b.len().cmp(&a.len()));
        let Some(link) = closest_pair(full, walking, &components[1]) else {
            break;
        };

        let edge = TransitEdge::walking(link.duration);
        walking.add_edge(link.from, link.to, edge)?;
        full.add_edge(link.from, link.to, edge)?;
        debug!(
            "Bridged stop {} to {} ({:.1} walking units, {:.1} duration)",
            link.from, link.to, link.distance, link.duration
        );
        report.links.push(link);

        components = walking.components();
    }

    info!("Inserted {} synthetic walking links", report.links.len());
    Ok(report)
}

/// Copy stops present in `source` but absent from `target`, in source order
fn copy_missing_stops(source: &TransitGraph, target: &mut TransitGraph) -> usize {
    let missing: Vec<Stop> = source
        .stops()
        .filter(|s| !target.contains_stop(s.id))
        .cloned()
        .collect();
    let count = missing.len();
    for stop in missing {
        target.add_stop(stop);
    }
    count
}

/// Nearest (inside, outside) stop pair.
///
/// Outside stops are scanned in `full` order, each against every member of
/// the component; the first strict minimum wins.
fn closest_pair(
    full: &TransitGraph,
    walking: &TransitGraph,
    component: &[StopId],
) -> Option<SyntheticLink> {
    let members: HashSet<StopId> = component.iter().copied().collect();
    let inside: Vec<&Stop> = component.iter().filter_map(|&id| walking.stop(id)).collect();

    let mut best: Option<(StopId, StopId, f64)> = None;
    for v in full.stops().filter(|s| !members.contains(&s.id)) {
        for u in &inside {
            let distance = u.position.distance(&v.position) / WALKING_DISTANCE_DIVISOR;
            if best.map_or(true, |(_, _, d)| distance < d) {
                best = Some((u.id, v.id, distance));
            }
        }
    }

    best.map(|(from, to, distance)| SyntheticLink {
        from,
        to,
        distance,
        duration: distance / WALKING_SPEED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, RouteType};

    fn stop_at(id: u64, x: f64, y: f64) -> Stop {
        Stop::new(StopId(id), Position::new(x, y))
    }

    fn walk(graph: &mut TransitGraph, a: u64, b: u64) {
        graph
            .add_edge(StopId(a), StopId(b), TransitEdge::walking(1.0))
            .unwrap();
    }

    #[test]
    fn test_connected_walking_graph_is_untouched() {
        let mut full = TransitGraph::new();
        let mut walking = TransitGraph::new();
        for g in [&mut full, &mut walking] {
            g.add_stop(stop_at(1, 0.0, 0.0));
            g.add_stop(stop_at(2, 1.0, 0.0));
            walk(g, 1, 2);
        }

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        assert!(report.is_noop());
        assert_eq!(report.initial_components, 1);
        assert_eq!(walking.edge_count(), 1);
    }

    #[test]
    fn test_missing_stops_are_copied_with_positions() {
        let mut full = TransitGraph::new();
        full.add_stop(stop_at(1, 0.0, 0.0));
        full.add_stop(stop_at(2, 16.0, 0.0));
        let mut walking = TransitGraph::new();

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        assert_eq!(report.stops_added_to_walking, 2);
        assert_eq!(walking.stop(StopId(2)).unwrap().position, Position::new(16.0, 0.0));
        assert!(walking.is_connected());
        assert!(full.is_connected());

        let link = report.links[0];
        assert!((link.distance - 10.0).abs() < 1e-9);
        assert!((link.duration - 10.0 / 1.3).abs() < 1e-9);
        let edge = full.edge(full.incident_edges(StopId(1))[0]).unwrap();
        assert_eq!(edge.route_type, RouteType::WALK);
    }

    #[test]
    fn test_second_largest_component_is_bridged_first() {
        // components: {1,2,3} (largest), {4,5} near x=100, {6} at x=103
        let mut full = TransitGraph::new();
        let stops = [
            stop_at(1, 0.0, 0.0),
            stop_at(2, 1.0, 0.0),
            stop_at(3, 2.0, 0.0),
            stop_at(4, 100.0, 0.0),
            stop_at(5, 101.0, 0.0),
            stop_at(6, 103.0, 0.0),
        ];
        let mut walking = TransitGraph::new();
        for stop in stops {
            full.add_stop(stop.clone());
            walking.add_stop(stop);
        }
        walk(&mut walking, 1, 2);
        walk(&mut walking, 2, 3);
        walk(&mut walking, 4, 5);

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        // {4,5} bridges to 6 (distance 2) before anything reaches {1,2,3}
        assert_eq!(report.links[0].from, StopId(5));
        assert_eq!(report.links[0].to, StopId(6));
        // {1,2,3} and {4,5,6} tie; enumeration order makes {4,5,6} second
        assert_eq!(report.links[1].from, StopId(4));
        assert_eq!(report.links[1].to, StopId(3));
        assert_eq!(report.links.len(), 2);
        assert!(walking.is_connected());
    }

    #[test]
    fn test_equal_sized_components_tie_break_on_enumeration_order() {
        // three singletons: sorted order is [1], [2], [3]; [2] is repaired first
        let mut full = TransitGraph::new();
        full.add_stop(stop_at(1, 0.0, 0.0));
        full.add_stop(stop_at(2, 10.0, 0.0));
        full.add_stop(stop_at(3, 13.0, 0.0));
        let mut walking = TransitGraph::new();

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        assert_eq!(report.links[0].from, StopId(2));
        assert_eq!(report.links[0].to, StopId(3));
        assert_eq!(report.links.len(), 2);
    }

    #[test]
    fn test_distance_tie_prefers_first_outside_stop_in_full_order() {
        // {1,2,3} and {4,5}: 5-1 and 4-2 are both 1 apart; stop 1 comes first
        let mut full = TransitGraph::new();
        let mut walking = TransitGraph::new();
        for stop in [
            stop_at(1, 0.0, 11.0),
            stop_at(2, 1.0, 0.0),
            stop_at(3, 50.0, 50.0),
            stop_at(4, 0.0, 0.0),
            stop_at(5, 0.0, 10.0),
        ] {
            full.add_stop(stop.clone());
            walking.add_stop(stop);
        }
        walk(&mut walking, 1, 2);
        walk(&mut walking, 2, 3);
        walk(&mut walking, 4, 5);

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        assert_eq!(report.links.len(), 1);
        assert_eq!(report.links[0].from, StopId(5));
        assert_eq!(report.links[0].to, StopId(1));
        assert!((report.links[0].distance - 1.0 / 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut full = TransitGraph::new();
        for i in 0..5 {
            full.add_stop(stop_at(i, i as f64 * 3.0, 0.0));
        }
        let mut walking = TransitGraph::new();

        make_walking_connected(&mut full, &mut walking).unwrap();
        let edges = full.edge_count();
        let again = make_walking_connected(&mut full, &mut walking).unwrap();

        assert!(again.is_noop());
        assert_eq!(full.edge_count(), edges);
    }

    #[test]
    fn test_walking_only_stops_are_mirrored_into_full() {
        let mut full = TransitGraph::new();
        full.add_stop(stop_at(1, 0.0, 0.0));
        let mut walking = TransitGraph::new();
        walking.add_stop(stop_at(1, 0.0, 0.0));
        walking.add_stop(stop_at(9, 5.0, 0.0));

        let report = make_walking_connected(&mut full, &mut walking).unwrap();

        assert_eq!(report.stops_added_to_full, 1);
        assert!(full.contains_stop(StopId(9)));
        assert!(full.is_connected());
    }
}
