// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Transit percolation library - resilience of multimodal transit networks
//!
//! This crate builds a multi-edge transit graph from stop/edge tables,
//! repairs its walking layer until every stop is reachable, and measures how
//! travel times degrade as links are removed at random or by centrality.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod centrality;
pub mod commands;
pub mod config;
pub mod error;
pub mod experiment;
pub mod graph;
pub mod loader;
pub mod percolation;
pub mod projection;
pub mod repair;
pub mod travel_time;

/// Core data types shared by every stage of the pipeline
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    // =========================================================================
    // Stops (Nodes)
    // =========================================================================

    /// Opaque stop identifier, the `stop_I` column of the input tables
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StopId(pub u64);

    impl fmt::Display for StopId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl From<u64> for StopId {
        fn from(value: u64) -> Self {
            Self(value)
        }
    }

    /// Projected planar position of a stop
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate (easting)
        pub x: f64,
        /// Y coordinate (northing)
        pub y: f64,
    }

    impl Position {
        /// Create a position from raw coordinates
        #[must_use]
        pub fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        /// Planar Euclidean distance to another position
        #[must_use]
        pub fn distance(&self, other: &Self) -> f64 {
            (self.x - other.x).hypot(self.y - other.y)
        }
    }

    /// A station or stop in the network
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Stop {
        /// Unique identifier
        pub id: StopId,
        /// Human-readable name (may be empty for synthetic stops)
        #[serde(default)]
        pub name: String,
        /// Projected position, fixed once assigned
        pub position: Position,
    }

    impl Stop {
        /// Create a stop with an empty name
        #[must_use]
        pub fn new(id: StopId, position: Position) -> Self {
            Self {
                id,
                name: String::new(),
                position,
            }
        }
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Transit mode category of an edge
    ///
    /// Follows the GTFS numbering, except that [`RouteType::WALK`] (5) is
    /// reserved for synthetic walking links.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RouteType(pub i32);

    impl RouteType {
        /// Sentinel for walking links; never removed by percolation
        pub const WALK: Self = Self(5);

        /// Whether this is the walking sentinel
        #[must_use]
        pub fn is_walking(self) -> bool {
            self == Self::WALK
        }
    }

    impl fmt::Display for RouteType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// Attributes carried by every edge of the transit graph
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct TransitEdge {
        /// Travel time (or walking-time estimate)
        pub duration: f64,
        /// Mode category
        pub route_type: RouteType,
    }

    impl TransitEdge {
        /// Create an edge
        #[must_use]
        pub fn new(duration: f64, route_type: RouteType) -> Self {
            Self {
                duration,
                route_type,
            }
        }

        /// Create a walking edge
        #[must_use]
        pub fn walking(duration: f64) -> Self {
            Self::new(duration, RouteType::WALK)
        }

        /// Whether this edge is exempt from percolation
        #[must_use]
        pub fn is_walking(&self) -> bool {
            self.route_type.is_walking()
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// One measurement of the experiment sweep
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct ResultRecord {
        /// Removal probability
        pub p: f64,
        /// Percolation trial index
        pub perc: usize,
        /// Test (repetition) index
        pub test: usize,
        /// Measured average travel time
        pub result: f64,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::centrality::{rank, CentralityMethod};
    pub use crate::error::{LoadError, NetworkError};
    pub use crate::experiment::{AttackMode, ExperimentConfig, ExperimentRunner, ExperimentTable};
    pub use crate::graph::{EdgeKey, TransitGraph};
    pub use crate::percolation::{random_percolation, targeted_percolation};
    pub use crate::repair::make_walking_connected;
    pub use crate::travel_time::{
        pair_travel_time, sampled_average_travel_time, weighted_average_travel_time,
        SamplePairSet,
    };
    pub use crate::types::*;
}
