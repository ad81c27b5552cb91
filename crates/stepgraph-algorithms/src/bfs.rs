//! Breadth-first search from vertex 0, one frontier (hop level) at a time.
//!
//! Visited vertices get color 1 and highlight tag `hops + 1`.

use stepgraph_core::{RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

/// Auxiliary slot: vertex has been visited.
const VISITED: usize = 0;
/// Auxiliary slot: vertex sits in the next frontier.
const QUEUED: usize = 1;

const CODE: [&str; 7] = [
    "frontier ← {0}",
    "for each u in frontier:",
    "  if u visited: continue",
    "  mark u visited at level hops",
    "  for each edge (u, v):",
    "    if v unvisited and not queued: queue v",
    "frontier ← next frontier; hops ← hops + 1",
];

/// Run BFS and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph<bool>> {
    let mut graph = RecordingGraph::with_auxiliary(input, Some(vec![false, false]), None)?;
    let mut levels = graph.create_table(
        TableConfig::new("Level", 1, input.n, None::<usize>)
            .with_headers("", "Vertex")
            .with_index_labels(),
    )?;
    let mut code = graph.add_code(CODE)?;
    graph.finalize()?;

    code.set_line(0);
    let mut frontier: Vec<usize> = if input.n > 0 { vec![0] } else { Vec::new() };
    let mut visited = 0;

    for hops in 0.. {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for &from in &frontier {
            code.set_line(1);
            let u = graph.vertex(from)?;
            code.set_line(2);
            if u.auxiliary_value(VISITED)? {
                continue;
            }

            code.set_line(3);
            u.set_auxiliary_value(VISITED, true)?;
            u.set_auxiliary_value(QUEUED, false)?;
            u.set_color(1);
            u.add_highlight(hops + 1);
            levels.set(0, from, Some(hops as usize))?;
            visited += 1;

            code.set_line(4);
            let edges = graph.subroutine("scan neighbors", || graph.neighbors(from))?;
            for edge in edges {
                let v = graph.vertex(edge.to())?;
                if v.auxiliary_value(VISITED)? || v.auxiliary_value(QUEUED)? {
                    continue;
                }
                code.set_line(5);
                v.set_auxiliary_value(QUEUED, true)?;
                next.push(edge.to());
            }
        }
        code.set_line(6);
        frontier = next;
    }

    debug!(visited, events = graph.event_count(), "bfs finished");
    Ok(graph)
}
