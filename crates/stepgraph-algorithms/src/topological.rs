//! Kahn's topological sort, peeled one layer of sources at a time.
//!
//! Vertices in layer `k` get color 1 and highlight `k + 1`. Vertices left
//! over when no sources remain lie on or behind a cycle and get color 2.

use stepgraph_core::{display_blank_null, RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

pub const SORTED: u32 = 1;
pub const CYCLIC: u32 = 2;

const IN_DEGREE: usize = 0;

const CODE: [&str; 7] = [
    "count in-degrees",
    "frontier ← vertices with in-degree 0",
    "while frontier not empty:",
    "  for each u in frontier: append u to order",
    "    for each edge (u, v):",
    "      in-degree[v] ← in-degree[v] - 1; if 0: add v to next frontier",
    "mark remaining vertices as cyclic",
];

/// Run the sort and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph<i64>> {
    let n = input.n;
    let mut graph = RecordingGraph::with_auxiliary(input, Some(vec![0i64]), None)?;
    let mut degree = graph.create_table(
        TableConfig::new("In-degree", 1, n, 0i64)
            .with_headers("", "Vertex")
            .with_index_labels(),
    )?;
    let mut order = graph.create_table(
        TableConfig::new("Order", 1, n, None::<usize>)
            .with_headers("", "Position")
            .with_index_labels()
            .with_formatter(display_blank_null),
    )?;
    let mut code = graph.add_code(CODE)?;
    graph.finalize()?;

    code.set_line(0);
    graph.subroutine("count in-degrees", || -> Result<()> {
        for u in 0..n {
            for edge in graph.neighbors(u)? {
                let v = graph.vertex(edge.to())?;
                let d = v.auxiliary_value(IN_DEGREE)? + 1;
                v.set_auxiliary_value(IN_DEGREE, d)?;
                degree.set(0, edge.to(), d)?;
            }
        }
        Ok(())
    })?;

    code.set_line(1);
    let mut frontier = Vec::new();
    for v in 0..n {
        if graph.vertex(v)?.auxiliary_value(IN_DEGREE)? == 0 {
            frontier.push(v);
        }
    }

    let mut placed = 0;
    let mut layer = 0u32;
    while !frontier.is_empty() {
        code.set_line(2);
        let mut next = Vec::new();
        graph.subroutine(format!("layer {}", layer), || -> Result<()> {
            for &u in &frontier {
                code.set_line(3);
                order.set(0, placed, Some(u))?;
                placed += 1;
                graph.vertex(u)?.set_color(SORTED).add_highlight(layer + 1);

                code.set_line(4);
                for edge in graph.neighbors(u)? {
                    code.set_line(5);
                    let v = graph.vertex(edge.to())?;
                    let d = v.auxiliary_value(IN_DEGREE)? - 1;
                    v.set_auxiliary_value(IN_DEGREE, d)?;
                    degree.set(0, edge.to(), d)?;
                    if d == 0 {
                        next.push(edge.to());
                    }
                }
            }
            Ok(())
        })?;
        frontier = next;
        layer += 1;
    }

    code.set_line(6);
    for v in 0..n {
        let vertex = graph.vertex(v)?;
        if vertex.auxiliary_value(IN_DEGREE)? > 0 {
            vertex.set_color(CYCLIC);
        }
    }

    debug!(placed, layers = layer, cyclic = n - placed, "topological sort finished");
    Ok(graph)
}
