// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for graph construction, percolation and travel-time queries

use crate::types::StopId;
use thiserror::Error;

/// Errors raised by the network core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// An edge references a stop absent from the node table
    #[error("edge {from} -> {to} references stop {missing}, which has no position in the node table")]
    MissingPosition {
        /// Edge origin
        from: StopId,
        /// Edge destination
        to: StopId,
        /// The stop that could not be resolved
        missing: StopId,
    },

    /// The two stops lie in different components
    #[error("no path between stops {from} and {to}")]
    NoPath {
        /// Query origin
        from: StopId,
        /// Query destination
        to: StopId,
    },

    /// The stop is not part of the graph
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// A removal probability outside [0, 1]
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

/// Errors raised while reading input tables
#[derive(Debug, Error)]
pub enum LoadError {
    /// Malformed or unreadable delimited text
    #[error("failed to read table: {0}")]
    Csv(#[from] csv::Error),

    /// The tables do not describe a consistent graph
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_position_message_names_stop() {
        let err = NetworkError::MissingPosition {
            from: StopId(1),
            to: StopId(2),
            missing: StopId(2),
        };
        assert!(err.to_string().contains("references stop 2"));
    }

    #[test]
    fn test_network_error_converts_into_load_error() {
        let err: LoadError = NetworkError::UnknownStop(StopId(9)).into();
        assert!(matches!(err, LoadError::Network(NetworkError::UnknownStop(StopId(9)))));
        assert_eq!(err.to_string(), "unknown stop: 9");
    }
}
