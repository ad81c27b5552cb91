//! Finished, immutable recordings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepgraph_topology::GraphInput;

use crate::error::Result;
use crate::event::GraphEvent;
use crate::table::TableLayout;

/// A materialized directed half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

/// Expand an input's edge triples into directed half-edges, grouped by
/// source vertex in input order.
///
/// Undirected edges always yield both `u -> v` and `v -> u`; a self-loop
/// yields one half-edge.
pub fn half_edges(input: &GraphInput) -> Vec<Vec<EdgeSpec>> {
    let mut adjacency = vec![Vec::new(); input.n];
    for &(from, to, weight) in &input.edges {
        adjacency[from].push(EdgeSpec { from, to, weight });
        if !input.directed && from != to {
            adjacency[to].push(EdgeSpec { from: to, to: from, weight });
        }
    }
    adjacency
}

/// Everything a replay needs from one algorithm run.
///
/// The event log is shared behind an [`Arc`], so any number of players can
/// replay the same recording independently.
#[derive(Debug, Clone)]
pub struct Recording {
    topology: GraphInput,
    adjacency: Vec<Vec<EdgeSpec>>,
    events: Arc<[GraphEvent]>,
    tables: Vec<TableLayout>,
    code: Vec<String>,
}

impl Recording {
    /// Assemble a recording from its parts, e.g. a log loaded from disk.
    pub fn from_parts(
        topology: GraphInput,
        events: Vec<GraphEvent>,
        tables: Vec<TableLayout>,
        code: Vec<String>,
    ) -> Result<Self> {
        topology.validate()?;
        Ok(Self::from_validated(topology, events, tables, code))
    }

    pub(crate) fn from_validated(
        topology: GraphInput,
        events: Vec<GraphEvent>,
        tables: Vec<TableLayout>,
        code: Vec<String>,
    ) -> Self {
        Self {
            adjacency: half_edges(&topology),
            topology,
            events: events.into(),
            tables,
            code,
        }
    }

    /// The input the run was recorded against.
    pub fn topology(&self) -> &GraphInput {
        &self.topology
    }

    /// Half-edges grouped by source vertex.
    pub fn adjacency(&self) -> &[Vec<EdgeSpec>] {
        &self.adjacency
    }

    /// The ordered event log.
    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    /// Shared handle to the event log.
    pub fn shared_events(&self) -> Arc<[GraphEvent]> {
        Arc::clone(&self.events)
    }

    /// Table layouts in creation order (index = table id).
    pub fn tables(&self) -> &[TableLayout] {
        &self.tables
    }

    /// Pseudocode lines (empty if none were registered).
    pub fn code(&self) -> &[String] {
        &self.code
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.topology.n
    }
}
