//! Error types for stepgraph-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Ways a [`GraphInput`](crate::GraphInput) can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// An edge references a vertex label outside `0..n`.
    #[error("edge {edge} ({from} -> {to}) references a vertex outside 0..{n}")]
    EndpointOutOfRange {
        edge: usize,
        from: usize,
        to: usize,
        n: usize,
    },

    /// The position list does not cover every vertex.
    #[error("expected {expected} node positions, got {actual}")]
    PositionCount { expected: usize, actual: usize },
}
