//! Error types for stepgraph-core.

use thiserror::Error;

use crate::graph::Phase;

/// Result type for recording operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying a recording graph.
///
/// All of these are programmer errors: an algorithm that hits one is
/// malformed, and the run is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation was attempted in the wrong lifecycle phase.
    #[error("cannot {operation} while the graph is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },

    /// Auxiliary slots were accessed on an element built without a template.
    #[error("auxiliary storage of {element} is not initialized")]
    AuxiliaryUninitialized { element: String },

    /// Auxiliary slot index past the end of the template.
    #[error("auxiliary index {index} out of range for {element} (length {len})")]
    AuxiliaryIndex {
        element: String,
        index: usize,
        len: usize,
    },

    /// Vertex index outside `0..count`.
    #[error("vertex {index} out of range (graph has {count} vertices)")]
    VertexOutOfRange { index: usize, count: usize },

    /// Table cell outside the table's extent.
    #[error("cell ({row}, {column}) out of range for table {table} ({rows}x{columns})")]
    TableCellOutOfRange {
        table: usize,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    /// Pseudocode was registered twice for the same graph.
    #[error("pseudocode is already registered for this graph")]
    CodeAlreadyRegistered,

    /// The input graph is malformed.
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] stepgraph_topology::TopologyError),
}
