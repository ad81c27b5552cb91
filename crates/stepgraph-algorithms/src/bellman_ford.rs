//! Bellman–Ford with one table column per iteration.
//!
//! Column `i` of "Path Length" holds the shortest distances from vertex 0
//! using at most `i` edges. Iteration `n` is one more than needed; any
//! vertex that still improves there is reachable from a negative cycle and
//! gets highlight 1. The cycle itself, found by walking parents back from
//! such a vertex, is colored 3.

use stepgraph_core::{display_blank_null, RecordingGraph, Result, Table, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

use crate::distance::Distance;

const CODE: [&str; 7] = [
    "dist[0][0] ← 0",
    "for i in 1..=n:",
    "  copy column i - 1 into column i",
    "  for each u modified in iteration i - 1:",
    "    for each edge (u, v, w):",
    "      if dist[u][i - 1] + w < dist[v][i]: relax",
    "report vertices where dist[v][n] < dist[v][n - 1]",
];

/// Run Bellman–Ford and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph> {
    let n = input.n;
    let mut graph: RecordingGraph = RecordingGraph::new(input)?;
    let mut dist = graph.create_table(
        TableConfig::new("Path Length", n, n + 1, Distance::Infinite)
            .with_headers("Node", "Iteration")
            .with_index_labels(),
    )?;
    let mut parent = graph.create_table(
        TableConfig::new("Parent", n, n + 1, None::<usize>)
            .with_headers("Node", "Iteration")
            .with_index_labels()
            .with_formatter(display_blank_null),
    )?;
    let mut code = graph.add_code(CODE)?;
    graph.finalize()?;

    if n == 0 {
        return Ok(graph);
    }

    code.set_line(0);
    dist.set(0, 0, Distance::ZERO)?;
    let mut modified = vec![0];

    for i in 1..=n {
        code.set_line(1);
        graph.subroutine(format!("Initializing for iteration {}", i), || -> Result<()> {
            code.set_line(2);
            for v in 0..n {
                let d = dist.get(v, i - 1)?;
                dist.set(v, i, d)?;
                let p = parent.get(v, i - 1)?;
                parent.set(v, i, p)?;
            }
            Ok(())
        })?;

        let mut queued = vec![false; n];
        let mut next = Vec::new();
        for &u in &modified {
            code.set_line(3);
            let base = dist.get(u, i - 1)?;
            code.set_line(4);
            for edge in graph.neighbors(u)? {
                let v = edge.to();
                code.set_line(5);
                let candidate = base.plus(edge.weight());
                if candidate >= dist.get(v, i)? {
                    continue;
                }
                if let Some(old) = parent.get(v, i)? {
                    if let Some(replaced) = graph.edge(old, v)? {
                        replaced.set_color(0);
                    }
                }
                edge.set_color(2);
                dist.set(v, i, candidate)?;
                parent.set(v, i, Some(u))?;
                if !queued[v] {
                    queued[v] = true;
                    next.push(v);
                }
            }
        }
        modified = next;
        if modified.is_empty() {
            debug!(iteration = i, "bellman-ford converged early");
        }
    }

    code.set_line(6);
    let mut affected = Vec::new();
    for v in 0..n {
        if dist.get(v, n)? < dist.get(v, n - 1)? {
            graph.vertex(v)?.add_highlight(1);
            affected.push(v);
        }
    }

    if let Some(&start) = affected.first() {
        debug!(?affected, "negative cycle detected");
        trace_cycle(&graph, &parent, start, n)?;
    }

    Ok(graph)
}

/// Color the negative cycle that `start` descends from.
///
/// Walking `n` parents back from a vertex still improving in the last
/// iteration is guaranteed to land on the cycle.
fn trace_cycle(
    graph: &RecordingGraph,
    parent: &Table<Option<usize>>,
    start: usize,
    n: usize,
) -> Result<()> {
    graph.subroutine("trace negative cycle", || -> Result<()> {
        let mut on_cycle = start;
        for _ in 0..n {
            match parent.get(on_cycle, n)? {
                Some(p) => on_cycle = p,
                None => return Ok(()),
            }
        }

        let mut v = on_cycle;
        loop {
            let Some(p) = parent.get(v, n)? else {
                return Ok(());
            };
            graph.vertex(v)?.set_color(3);
            if let Some(edge) = graph.edge(p, v)? {
                edge.set_color(3);
            }
            v = p;
            if v == on_cycle {
                return Ok(());
            }
        }
    })
}
