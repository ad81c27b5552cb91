//! The recording graph.
//!
//! # Lifecycle
//!
//! A [`RecordingGraph`] starts in [`Phase::Building`], where tables and
//! pseudocode may be declared. [`RecordingGraph::finalize`] moves it to
//! [`Phase::Queryable`], after which the algorithm reads and mutates the
//! graph through [`vertex`](RecordingGraph::vertex),
//! [`neighbors`](RecordingGraph::neighbors) and [`edge`](RecordingGraph::edge).
//! Every one of those calls, and every mutation on the elements and tables
//! they hand out, lands in a single ordered event log.
//!
//! [`RecordingGraph::into_recording`] freezes the log for replay.

use std::fmt;

use stepgraph_topology::GraphInput;
use tracing::debug;

use crate::code::CodeTracker;
use crate::element::{Edge, Vertex};
use crate::error::{Error, Result};
use crate::event::{GraphEvent, Recorder};
use crate::recording::{half_edges, Recording};
use crate::table::{Table, TableConfig, TableLayout};
use crate::value::CellValue;

/// Lifecycle phase of a recording graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tables and pseudocode may be declared; no graph queries
    Building,
    /// Graph queries allowed; no further declarations
    Queryable,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Building => write!(f, "building (not finalized)"),
            Phase::Queryable => write!(f, "finalized"),
        }
    }
}

/// A graph that records every observable operation performed on it.
///
/// `V` and `E` are the auxiliary slot types of vertices and edges.
pub struct RecordingGraph<V = (), E = ()> {
    topology: GraphInput,
    vertices: Vec<Vertex<V>>,
    adjacency: Vec<Vec<Edge<E>>>,
    tables: Vec<TableLayout>,
    code: Option<Vec<String>>,
    phase: Phase,
    recorder: Recorder,
}

impl<V: Clone, E: Clone> RecordingGraph<V, E> {
    /// Build a graph whose elements carry no auxiliary storage.
    pub fn new(input: &GraphInput) -> Result<Self> {
        Self::with_auxiliary(input, None, None)
    }

    /// Build a graph, cloning the given templates into every vertex and
    /// edge as independent auxiliary storage.
    pub fn with_auxiliary(
        input: &GraphInput,
        vertex_template: Option<Vec<V>>,
        edge_template: Option<Vec<E>>,
    ) -> Result<Self> {
        input.validate()?;
        let recorder = Recorder::new();

        let vertices = input
            .positions()
            .into_iter()
            .enumerate()
            .map(|(i, p)| Vertex::new(i, p, vertex_template.as_deref(), recorder.clone()))
            .collect();

        let adjacency = half_edges(input)
            .into_iter()
            .map(|list| {
                list.into_iter()
                    .map(|e| {
                        Edge::new(
                            e.from,
                            e.to,
                            e.weight,
                            input.directed,
                            edge_template.as_deref(),
                            recorder.clone(),
                        )
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            topology: input.clone(),
            vertices,
            adjacency,
            tables: Vec::new(),
            code: None,
            phase: Phase::Building,
            recorder,
        })
    }
}

impl<V, E> RecordingGraph<V, E> {
    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether [`finalize`](Self::finalize) has been called.
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Queryable
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.topology.directed
    }

    /// The input this graph was built from.
    pub fn topology(&self) -> &GraphInput {
        &self.topology
    }

    /// Number of events recorded so far.
    pub fn event_count(&self) -> usize {
        self.recorder.len()
    }

    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<GraphEvent> {
        self.recorder.events()
    }

    /// Declare a table. Building phase only.
    pub fn create_table<T: CellValue>(&mut self, config: TableConfig<T>) -> Result<Table<T>> {
        self.require(Phase::Building, "create a table")?;
        let id = self.tables.len();
        debug!(id, name = %config.name, rows = config.rows, columns = config.columns, "table created");
        self.tables.push(config.layout());
        Ok(Table::new(id, &config, self.recorder.clone()))
    }

    /// Register pseudocode lines. Building phase only, at most once.
    pub fn add_code<I, S>(&mut self, lines: I) -> Result<CodeTracker>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require(Phase::Building, "register pseudocode")?;
        if self.code.is_some() {
            return Err(Error::CodeAlreadyRegistered);
        }
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        self.code = Some(lines.clone());
        Ok(CodeTracker::new(lines, self.recorder.clone()))
    }

    /// End the building phase.
    pub fn finalize(&mut self) -> Result<()> {
        self.require(Phase::Building, "finalize")?;
        self.phase = Phase::Queryable;
        debug!(tables = self.tables.len(), vertices = self.vertices.len(), "graph finalized");
        Ok(())
    }

    /// Get a vertex, recording a read of it.
    pub fn vertex(&self, index: usize) -> Result<&Vertex<V>> {
        self.require(Phase::Queryable, "query a vertex")?;
        let vertex = self.vertices.get(index).ok_or(Error::VertexOutOfRange {
            index,
            count: self.vertices.len(),
        })?;
        vertex.read();
        Ok(vertex)
    }

    /// Get the outgoing edges of a vertex, recording a read of each one.
    pub fn neighbors(&self, index: usize) -> Result<&[Edge<E>]> {
        self.require(Phase::Queryable, "query neighbors")?;
        let edges = self.adjacency.get(index).ok_or(Error::VertexOutOfRange {
            index,
            count: self.vertices.len(),
        })?;
        for edge in edges {
            edge.read();
        }
        Ok(edges)
    }

    /// Find the edge `from -> to` by scanning `from`'s adjacency list.
    ///
    /// A missing edge is `Ok(None)`; a found edge is recorded as read.
    pub fn edge(&self, from: usize, to: usize) -> Result<Option<&Edge<E>>> {
        self.require(Phase::Queryable, "query an edge")?;
        let edges = self.adjacency.get(from).ok_or(Error::VertexOutOfRange {
            index: from,
            count: self.vertices.len(),
        })?;
        Ok(edges.iter().find(|e| e.to() == to).map(|e| {
            e.read();
            e
        }))
    }

    /// Run `body` bracketed by subroutine events so a replay can step over
    /// it as one unit. The end marker is recorded even if `body` returns an
    /// error value.
    pub fn subroutine<R>(&self, name: impl Into<String>, body: impl FnOnce() -> R) -> R {
        self.recorder.record(GraphEvent::SubroutineStart { name: name.into() });
        let result = body();
        self.recorder.record(GraphEvent::SubroutineEnd);
        result
    }

    /// Freeze the run into an immutable recording.
    pub fn into_recording(self) -> Recording {
        let events = self.recorder.take();
        debug!(events = events.len(), "recording frozen");
        Recording::from_validated(self.topology, events, self.tables, self.code.unwrap_or_default())
    }

    fn require(&self, expected: Phase, operation: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }
}

impl<V, E> fmt::Debug for RecordingGraph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingGraph")
            .field("vertices", &self.vertices.len())
            .field("directed", &self.topology.directed)
            .field("tables", &self.tables.len())
            .field("phase", &self.phase)
            .field("events", &self.recorder.len())
            .finish()
    }
}
