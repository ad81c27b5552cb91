//! The replay engine.
//!
//! A [`GraphPlayer`] rebuilds fresh shadow state from a [`Recording`]
//! (every color 0, no highlights, tables at their initial values, no
//! current code line) and advances it one visible step at a time.
//!
//! A step is either one top-level event or one whole subroutine, however
//! deeply nested, so a "scan neighbors" block appears as a single
//! transition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepgraph_core::{ElementId, ElementState, GraphEvent, Recording, TableLayout, Value};
use stepgraph_topology::Vector2;
use tracing::{error, trace, warn};

use crate::error::ReplayError;
use crate::snapshot::{CodeView, EdgeView, PlayerSnapshot, TableView, VertexView};

/// Replay copy of a vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowVertex {
    pub position: Vector2,
    pub state: ElementState,
    /// Timestamp of the last read or color change; 0 if never touched
    pub last_read: u64,
}

/// Replay copy of a half-edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowEdge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
    pub state: ElementState,
    pub last_read: u64,
}

/// Replay copy of a table.
#[derive(Debug, Clone)]
pub struct ShadowTable {
    pub layout: TableLayout,
    cells: Vec<Value>,
}

impl ShadowTable {
    fn new(layout: &TableLayout) -> Self {
        Self {
            cells: vec![layout.initial.clone(); layout.rows * layout.columns],
            layout: layout.clone(),
        }
    }

    /// Current cell value.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.layout.offset(row, column).map(|i| &self.cells[i])
    }

    fn rows(&self) -> impl Iterator<Item = &[Value]> {
        let columns = self.layout.columns;
        (0..self.layout.rows).map(move |r| &self.cells[r * columns..(r + 1) * columns])
    }
}

/// Address of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub table: usize,
    pub row: usize,
    pub column: usize,
}

/// Steps through a recorded event log.
#[derive(Debug, Clone)]
pub struct GraphPlayer {
    events: Arc<[GraphEvent]>,
    pc: usize,
    directed: bool,
    vertices: Vec<ShadowVertex>,
    edges: Vec<ShadowEdge>,
    edge_matrix: Vec<Vec<Option<usize>>>,
    tables: Vec<ShadowTable>,
    code: Vec<String>,
    current_line: Option<usize>,
    last_table_write: Option<CellRef>,
}

impl GraphPlayer {
    /// Build a player positioned before the first event.
    pub fn new(recording: &Recording) -> Self {
        let n = recording.vertex_count();
        let vertices = recording
            .topology()
            .positions()
            .into_iter()
            .map(|position| ShadowVertex {
                position,
                state: ElementState::default(),
                last_read: 0,
            })
            .collect();

        let mut edges = Vec::new();
        let mut edge_matrix = vec![vec![None; n]; n];
        for spec in recording.adjacency().iter().flatten() {
            // Parallel edges share an address; the first one listed owns it
            let slot = &mut edge_matrix[spec.from][spec.to];
            if slot.is_none() {
                *slot = Some(edges.len());
            }
            edges.push(ShadowEdge {
                from: spec.from,
                to: spec.to,
                weight: spec.weight,
                state: ElementState::default(),
                last_read: 0,
            });
        }

        Self {
            events: recording.shared_events(),
            pc: 0,
            directed: recording.topology().directed,
            vertices,
            edges,
            edge_matrix,
            tables: recording.tables().iter().map(ShadowTable::new).collect(),
            code: recording.code().to_vec(),
            current_line: None,
            last_table_write: None,
        }
    }

    /// Index of the next event to apply.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Length of the event log.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Whether every event has been applied.
    pub fn is_finished(&self) -> bool {
        self.pc >= self.events.len()
    }

    pub fn vertices(&self) -> &[ShadowVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[ShadowEdge] {
        &self.edges
    }

    pub fn tables(&self) -> &[ShadowTable] {
        &self.tables
    }

    /// The shadow half-edge `from -> to`, if the recording has one.
    pub fn edge(&self, from: usize, to: usize) -> Option<&ShadowEdge> {
        let index = (*self.edge_matrix.get(from)?.get(to)?)?;
        self.edges.get(index)
    }

    /// Pseudocode line the replay is currently on.
    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    /// The most recently written table cell.
    pub fn last_table_write(&self) -> Option<CellRef> {
        self.last_table_write
    }

    /// Advance one visible step, stamping `now` on every element read or
    /// recolored along the way.
    ///
    /// Returns the number of events applied; 0 means the log was already
    /// finished and nothing changed.
    pub fn step(&mut self, now: u64) -> Result<usize, ReplayError> {
        let events = Arc::clone(&self.events);
        let start = self.pc;
        let mut depth = 0usize;

        while let Some(event) = events.get(self.pc) {
            self.apply(self.pc, event, now, &mut depth)?;
            self.pc += 1;
            if depth == 0 {
                break;
            }
        }

        if depth > 0 {
            warn!(depth, pc = self.pc, "log ended inside an open subroutine");
        }
        Ok(self.pc - start)
    }

    /// Step until the end of the log.
    pub fn run_to_end(&mut self, now: u64) -> Result<usize, ReplayError> {
        let mut steps = 0;
        while !self.is_finished() {
            self.step(now)?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Serializable view of the current state for a renderer.
    pub fn snapshot(&self) -> PlayerSnapshot {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(index, v)| VertexView {
                index,
                x: v.position.x,
                y: v.position.y,
                color: v.state.color,
                highlights: v.state.highlights.iter().copied().collect(),
                last_read: v.last_read,
            })
            .collect();

        // Undirected edges are drawn once, from the lower endpoint. Parallel
        // copies are drawn only through the edge that owns their address.
        let edges = self
            .edges
            .iter()
            .enumerate()
            .filter(|(index, e)| {
                (self.directed || e.from <= e.to) && self.edge_matrix[e.from][e.to] == Some(*index)
            })
            .map(|(_, e)| EdgeView {
                from: e.from,
                to: e.to,
                weight: e.weight,
                color: e.state.color,
                highlights: e.state.highlights.iter().copied().collect(),
                last_read: e.last_read,
            })
            .collect();

        let tables = self
            .tables
            .iter()
            .map(|t| TableView {
                name: t.layout.name.clone(),
                row_header: t.layout.row_header.clone(),
                column_header: t.layout.column_header.clone(),
                row_labels: t.layout.row_labels.clone(),
                column_labels: t.layout.column_labels.clone(),
                cells: t
                    .rows()
                    .map(|row| row.iter().map(|v| t.layout.format(v)).collect())
                    .collect(),
            })
            .collect();

        PlayerSnapshot {
            pc: self.pc,
            event_count: self.events.len(),
            finished: self.is_finished(),
            directed: self.directed,
            vertices,
            edges,
            tables,
            code: CodeView {
                lines: self.code.clone(),
                current_line: self.current_line,
            },
            last_table_write: self.last_table_write,
        }
    }

    fn apply(
        &mut self,
        index: usize,
        event: &GraphEvent,
        now: u64,
        depth: &mut usize,
    ) -> Result<(), ReplayError> {
        trace!(index, kind = event.kind(), "apply");
        let invalid = |reason: String| {
            error!(index, ?event, %reason, "corrupt event log");
            ReplayError::InvalidEvent {
                index,
                event: event.clone(),
                reason,
            }
        };

        match event {
            GraphEvent::Read { target } => {
                let (_, last_read) = self.element(*target).ok_or_else(|| invalid(missing(target)))?;
                *last_read = now;
            }
            GraphEvent::Color { target, color } => {
                let (state, last_read) = self.element(*target).ok_or_else(|| invalid(missing(target)))?;
                state.set_color(*color);
                *last_read = now;
            }
            GraphEvent::HighlightAdd { target, tag } => {
                let (state, _) = self.element(*target).ok_or_else(|| invalid(missing(target)))?;
                state.add_highlight(*tag);
            }
            GraphEvent::HighlightRemove { target, tag } => {
                let (state, _) = self.element(*target).ok_or_else(|| invalid(missing(target)))?;
                state.remove_highlight(*tag);
            }
            GraphEvent::HighlightClear { target } => {
                let (state, _) = self.element(*target).ok_or_else(|| invalid(missing(target)))?;
                state.clear_highlights();
            }
            GraphEvent::TableRead { table, row, column } => {
                self.cell_offset(*table, *row, *column).map_err(invalid)?;
            }
            GraphEvent::TableWrite { table, row, column, value } => {
                let offset = self.cell_offset(*table, *row, *column).map_err(invalid)?;
                self.tables[*table].cells[offset] = value.clone();
                self.last_table_write = Some(CellRef {
                    table: *table,
                    row: *row,
                    column: *column,
                });
            }
            GraphEvent::CodeWrite { line } => {
                if *line >= self.code.len() {
                    return Err(invalid(format!(
                        "line {} outside {} lines of pseudocode",
                        line,
                        self.code.len()
                    )));
                }
                self.current_line = Some(*line);
            }
            GraphEvent::SubroutineStart { .. } => *depth += 1,
            GraphEvent::SubroutineEnd => {
                *depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid("subroutine end without a matching start".into()))?;
            }
            GraphEvent::Unknown => {
                warn!(index, "skipping unknown event kind");
            }
        }
        Ok(())
    }

    fn element(&mut self, target: ElementId) -> Option<(&mut ElementState, &mut u64)> {
        match target {
            ElementId::Vertex(i) => self.vertices.get_mut(i).map(|v| (&mut v.state, &mut v.last_read)),
            ElementId::Edge(from, to) => {
                let index = (*self.edge_matrix.get(from)?.get(to)?)?;
                self.edges.get_mut(index).map(|e| (&mut e.state, &mut e.last_read))
            }
        }
    }

    fn cell_offset(&self, table: usize, row: usize, column: usize) -> Result<usize, String> {
        let shadow = self
            .tables
            .get(table)
            .ok_or_else(|| format!("no table with id {} ({} declared)", table, self.tables.len()))?;
        shadow.layout.offset(row, column).ok_or_else(|| {
            format!(
                "cell ({}, {}) outside {}x{} table '{}'",
                row, column, shadow.layout.rows, shadow.layout.columns, shadow.layout.name
            )
        })
    }
}

fn missing(target: &ElementId) -> String {
    format!("no {} in the recorded topology", target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgraph_core::{RecordingGraph, TableConfig};
    use stepgraph_topology::GraphInput;

    fn recording_with(events: Vec<GraphEvent>) -> Recording {
        let input = GraphInput::unweighted(3, &[(0, 1), (1, 2)]);
        let tables = vec![TableConfig::new("t", 2, 2, Value::Int(0)).layout()];
        Recording::from_parts(input, events, tables, vec!["a".into(), "b".into()]).unwrap()
    }

    #[test]
    fn starts_fresh() {
        let mut graph: RecordingGraph = RecordingGraph::new(&GraphInput::unweighted(2, &[(0, 1)])).unwrap();
        let mut t = graph.create_table(TableConfig::new("t", 1, 1, 7i64)).unwrap();
        graph.finalize().unwrap();
        graph.vertex(0).unwrap().set_color(4);
        t.set(0, 0, 9).unwrap();

        let player = GraphPlayer::new(&graph.into_recording());
        assert_eq!(player.pc(), 0);
        assert_eq!(player.vertices()[0].state.color, 0);
        assert_eq!(player.tables()[0].cell(0, 0), Some(&Value::Int(7)));
        assert_eq!(player.current_line(), None);
    }

    #[test]
    fn applies_each_event_kind() {
        let v0 = ElementId::Vertex(0);
        let e = ElementId::Edge(1, 2);
        let mut player = GraphPlayer::new(&recording_with(vec![
            GraphEvent::Read { target: v0 },
            GraphEvent::Color { target: e, color: 2 },
            GraphEvent::HighlightAdd { target: v0, tag: 5 },
            GraphEvent::HighlightAdd { target: v0, tag: 6 },
            GraphEvent::HighlightRemove { target: v0, tag: 5 },
            GraphEvent::TableWrite { table: 0, row: 1, column: 0, value: Value::Infinity },
            GraphEvent::TableRead { table: 0, row: 1, column: 0 },
            GraphEvent::CodeWrite { line: 1 },
            GraphEvent::HighlightClear { target: e },
        ]));

        for now in 1..=9 {
            assert_eq!(player.step(now).unwrap(), 1);
        }
        assert!(player.is_finished());
        assert_eq!(player.vertices()[0].last_read, 1);
        assert_eq!(player.vertices()[0].state.highlights.iter().copied().collect::<Vec<_>>(), vec![6]);
        let edge = player.edge(1, 2).unwrap();
        assert_eq!((edge.state.color, edge.last_read), (2, 2));
        assert_eq!(player.edge(2, 1).unwrap().state.color, 0);
        assert_eq!(player.tables()[0].cell(1, 0), Some(&Value::Infinity));
        assert_eq!(player.current_line(), Some(1));
        assert_eq!(player.last_table_write(), Some(CellRef { table: 0, row: 1, column: 0 }));
    }

    #[test]
    fn subroutine_is_one_step() {
        let mut player = GraphPlayer::new(&recording_with(vec![
            GraphEvent::CodeWrite { line: 0 },
            GraphEvent::SubroutineStart { name: "outer".into() },
            GraphEvent::Read { target: ElementId::Vertex(0) },
            GraphEvent::SubroutineStart { name: "inner".into() },
            GraphEvent::Read { target: ElementId::Vertex(1) },
            GraphEvent::SubroutineEnd,
            GraphEvent::SubroutineEnd,
            GraphEvent::CodeWrite { line: 1 },
        ]));

        assert_eq!(player.step(10).unwrap(), 1);
        assert_eq!(player.step(20).unwrap(), 6);
        assert_eq!(player.vertices()[1].last_read, 20);
        assert_eq!(player.pc(), 7);
        assert_eq!(player.step(30).unwrap(), 1);
        assert!(player.is_finished());
    }

    #[test]
    fn terminal_step_is_a_no_op() {
        let mut player = GraphPlayer::new(&recording_with(vec![GraphEvent::Color {
            target: ElementId::Vertex(2),
            color: 1,
        }]));
        player.step(1).unwrap();
        let before = player.snapshot();
        assert_eq!(player.step(99).unwrap(), 0);
        assert_eq!(player.snapshot(), before);
    }

    #[test]
    fn unknown_events_are_skipped() {
        let mut player = GraphPlayer::new(&recording_with(vec![
            GraphEvent::Unknown,
            GraphEvent::Color { target: ElementId::Vertex(1), color: 3 },
        ]));
        assert_eq!(player.run_to_end(0).unwrap(), 2);
        assert_eq!(player.vertices()[1].state.color, 3);
    }

    #[test]
    fn corrupt_events_are_fatal() {
        let bad = GraphEvent::TableWrite { table: 4, row: 0, column: 0, value: Value::Null };
        let mut player = GraphPlayer::new(&recording_with(vec![bad.clone()]));
        let err = player.step(0).unwrap_err();
        assert_eq!(
            err,
            ReplayError::InvalidEvent {
                index: 0,
                event: bad,
                reason: "no table with id 4 (1 declared)".into(),
            }
        );
        assert_eq!(player.pc(), 0);

        for event in [
            GraphEvent::Color { target: ElementId::Edge(0, 2), color: 1 },
            GraphEvent::Read { target: ElementId::Vertex(3) },
            GraphEvent::TableRead { table: 0, row: 2, column: 0 },
            GraphEvent::CodeWrite { line: 2 },
            GraphEvent::SubroutineEnd,
        ] {
            let mut player = GraphPlayer::new(&recording_with(vec![event.clone()]));
            assert!(player.step(0).is_err(), "{:?}", event);
        }
    }

    #[test]
    fn snapshot_draws_undirected_edges_once() {
        let player = GraphPlayer::new(&recording_with(Vec::new()));
        let snapshot = player.snapshot();
        let drawn: Vec<(usize, usize)> = snapshot.edges.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(drawn, vec![(0, 1), (1, 2)]);
        assert_eq!(player.edges().len(), 4);

        let directed = GraphInput::new(2, vec![(1, 0, 3), (0, 1, 4)], true);
        let recording = Recording::from_parts(directed, Vec::new(), Vec::new(), Vec::new()).unwrap();
        assert_eq!(GraphPlayer::new(&recording).snapshot().edges.len(), 2);
    }

    #[test]
    fn snapshot_draws_parallel_edges_through_owner() {
        let input = GraphInput::new(2, vec![(0, 1, 3), (1, 0, 8)], false);
        let events = vec![GraphEvent::Color { target: ElementId::Edge(0, 1), color: 2 }];
        let recording = Recording::from_parts(input, events, Vec::new(), Vec::new()).unwrap();
        let mut player = GraphPlayer::new(&recording);
        player.run_to_end(1).unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!((snapshot.edges[0].weight, snapshot.edges[0].color), (3, 2));
        assert_eq!(player.edges().len(), 4);
    }

    #[test]
    fn snapshot_formats_cells() {
        let input = GraphInput::unweighted(1, &[]);
        let layout = TableConfig::new("p", 1, 2, None::<usize>)
            .with_formatter(stepgraph_core::display_blank_null)
            .layout();
        let recording = Recording::from_parts(
            input,
            vec![GraphEvent::TableWrite { table: 0, row: 0, column: 1, value: Value::Int(4) }],
            vec![layout],
            Vec::new(),
        )
        .unwrap();
        let mut player = GraphPlayer::new(&recording);
        player.step(0).unwrap();
        assert_eq!(player.snapshot().tables[0].cells, vec![vec!["".to_string(), "4".to_string()]]);
    }
}
