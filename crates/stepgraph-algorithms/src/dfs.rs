//! Depth-first search with arrival/departure numbering and edge
//! classification.
//!
//! Runs from every unvisited vertex in label order. Uses an explicit frame
//! stack that reproduces the recursive visitation order exactly: a vertex's
//! edges are scanned in adjacency order and a tree edge suspends the scan
//! until the child departs.
//!
//! Edge colors: 1 tree, 2 back, 3 forward, 4 cross.

use stepgraph_core::{Edge, RecordingGraph, Result, Table, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

pub const TREE_EDGE: u32 = 1;
pub const BACK_EDGE: u32 = 2;
pub const FORWARD_EDGE: u32 = 3;
pub const CROSS_EDGE: u32 = 4;

const VISITED: usize = 0;

/// Arrival/departure interval of one vertex.
type Interval = (Option<usize>, Option<usize>);

/// Monotonic timestamp source threaded through the traversal.
#[derive(Debug, Default)]
struct Clock {
    next: usize,
}

impl Clock {
    fn tick(&mut self) -> usize {
        let t = self.next;
        self.next += 1;
        t
    }
}

struct Frame<'g> {
    vertex: usize,
    parent: Option<usize>,
    edges: &'g [Edge<()>],
    next: usize,
    parent_edge_seen: bool,
}

/// Run DFS over every component and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph<bool>> {
    let mut graph = RecordingGraph::with_auxiliary(input, Some(vec![false]), None)?;
    let unset: Interval = (None, None);
    let mut times = graph.create_table(
        TableConfig::new("Arrival/Departure", 1, input.n, unset)
            .with_headers("", "Vertex")
            .with_index_labels(),
    )?;
    graph.finalize()?;

    let mut clock = Clock::default();
    for root in 0..input.n {
        visit(&graph, root, &mut times, &mut clock)?;
    }

    debug!(timestamps = clock.next, events = graph.event_count(), "dfs finished");
    Ok(graph)
}

/// Explore everything reachable from `root` that is still unvisited.
fn visit(
    graph: &RecordingGraph<bool>,
    root: usize,
    times: &mut Table<Interval>,
    clock: &mut Clock,
) -> Result<()> {
    if graph.vertex(root)?.auxiliary_value(VISITED)? {
        return Ok(());
    }

    let mut stack = vec![arrive(graph, root, None, 0, times, clock)?];
    while let Some(frame) = stack.last_mut() {
        let Some(edge) = frame.edges.get(frame.next) else {
            let departed = frame.vertex;
            stack.pop();
            let (arrival, _) = times.get(0, departed)?;
            times.set(0, departed, (arrival, Some(clock.tick())))?;
            continue;
        };
        frame.next += 1;

        let u = frame.vertex;
        let parent = frame.parent;
        let to = edge.to();
        let v = graph.vertex(to)?;

        if !v.auxiliary_value(VISITED)? {
            edge.set_color(TREE_EDGE);
            let depth = stack.len() as u32;
            let child = arrive(graph, to, Some(u), depth, times, clock)?;
            stack.push(child);
            continue;
        }

        if !graph.is_directed() && Some(to) == parent && !frame.parent_edge_seen {
            // Second half of the undirected tree edge we arrived through
            frame.parent_edge_seen = true;
            edge.set_color(TREE_EDGE);
            continue;
        }

        let (arrival_u, _) = times.get(0, u)?;
        let (arrival_v, departure_v) = times.get(0, to)?;
        let kind = match departure_v {
            None => BACK_EDGE,
            Some(_) if arrival_v > arrival_u => FORWARD_EDGE,
            Some(_) => CROSS_EDGE,
        };
        edge.set_color(kind);
    }
    Ok(())
}

fn arrive<'g>(
    graph: &'g RecordingGraph<bool>,
    vertex: usize,
    parent: Option<usize>,
    depth: u32,
    times: &mut Table<Interval>,
    clock: &mut Clock,
) -> Result<Frame<'g>> {
    let u = graph.vertex(vertex)?;
    u.set_auxiliary_value(VISITED, true)?;
    u.set_color(1);
    u.add_highlight(depth + 1);
    times.set(0, vertex, (Some(clock.tick()), None))?;

    let edges = graph.subroutine("scan neighbors", || graph.neighbors(vertex))?;
    Ok(Frame {
        vertex,
        parent,
        edges,
        next: 0,
        parent_edge_seen: false,
    })
}
