//! Dijkstra's single-source shortest paths from vertex 0.
//!
//! Settled vertices and their parent edges are colored 1; edges that
//! improved a tentative distance are colored 2 until replaced.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use stepgraph_core::{display_blank_null, RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::{debug, warn};

use crate::distance::Distance;

const SETTLED: usize = 0;

const CODE: [&str; 8] = [
    "dist[0] ← 0; push 0",
    "while queue not empty:",
    "  u ← pop closest",
    "  if u settled: continue",
    "  settle u",
    "  for each edge (u, v, w):",
    "    if dist[u] + w < dist[v]:",
    "      dist[v] ← dist[u] + w; parent[v] ← u; push v",
];

/// Run Dijkstra and return the recorded graph.
///
/// Negative weights are accepted but produce the usual undefined results;
/// a warning is logged.
pub fn run(input: &GraphInput) -> Result<RecordingGraph<bool>> {
    if input.has_negative_weight() {
        warn!("dijkstra on a graph with negative weights");
    }

    let mut graph = RecordingGraph::with_auxiliary(input, Some(vec![false]), None)?;
    let mut dist = graph.create_table(
        TableConfig::new("Distance", 1, input.n, Distance::Infinite)
            .with_headers("", "Vertex")
            .with_index_labels(),
    )?;
    let mut parent = graph.create_table(
        TableConfig::new("Parent", 1, input.n, None::<usize>)
            .with_headers("", "Vertex")
            .with_index_labels()
            .with_formatter(display_blank_null),
    )?;
    let mut code = graph.add_code(CODE)?;
    graph.finalize()?;

    if input.n == 0 {
        return Ok(graph);
    }

    code.set_line(0);
    dist.set(0, 0, Distance::ZERO)?;
    // Ties pop in push order
    let mut queue = BinaryHeap::new();
    let mut pushed = 0usize;
    queue.push(Reverse((Distance::ZERO, pushed, 0usize)));

    let mut settled = 0;
    while let Some(Reverse((d, _, u))) = queue.pop() {
        code.set_line(2);
        let vertex = graph.vertex(u)?;
        code.set_line(3);
        if vertex.auxiliary_value(SETTLED)? {
            continue;
        }

        code.set_line(4);
        vertex.set_auxiliary_value(SETTLED, true)?;
        vertex.set_color(1);
        if let Some(p) = parent.get(0, u)? {
            if let Some(edge) = graph.edge(p, u)? {
                edge.set_color(1);
            }
        }
        settled += 1;

        code.set_line(5);
        graph.subroutine("relax edges", || -> Result<()> {
            for edge in graph.neighbors(u)? {
                let v = edge.to();
                if graph.vertex(v)?.auxiliary_value(SETTLED)? {
                    continue;
                }
                code.set_line(6);
                let candidate = d.plus(edge.weight());
                if candidate >= dist.get(0, v)? {
                    continue;
                }

                code.set_line(7);
                if let Some(old) = parent.get(0, v)? {
                    if let Some(replaced) = graph.edge(old, v)? {
                        replaced.set_color(0);
                    }
                }
                edge.set_color(2);
                dist.set(0, v, candidate)?;
                parent.set(0, v, Some(u))?;
                pushed += 1;
                queue.push(Reverse((candidate, pushed, v)));
            }
            Ok(())
        })?;
        code.set_line(1);
    }

    debug!(settled, events = graph.event_count(), "dijkstra finished");
    Ok(graph)
}
