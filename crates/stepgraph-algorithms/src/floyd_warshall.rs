//! Floyd–Warshall all-pairs shortest paths.
//!
//! The pivot vertex `k` is colored 1 while paths through it are relaxed.
//! Vertices on a negative cycle (negative diagonal) get highlight 1.

use stepgraph_core::{display_blank_null, RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

use crate::distance::Distance;

/// Run Floyd–Warshall and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph> {
    let n = input.n;
    let mut graph: RecordingGraph = RecordingGraph::new(input)?;
    let mut weight = graph.create_table(
        TableConfig::new("Weights", n, n, Distance::Infinite)
            .with_headers("From", "To")
            .with_index_labels(),
    )?;
    let mut pred = graph.create_table(
        TableConfig::new("Predecessors", n, n, None::<usize>)
            .with_headers("From", "To")
            .with_index_labels()
            .with_formatter(display_blank_null),
    )?;
    graph.finalize()?;

    graph.subroutine("initialize table", || -> Result<()> {
        for v in 0..n {
            weight.set(v, v, Distance::ZERO)?;
        }
        for u in 0..n {
            for edge in graph.neighbors(u)? {
                let v = edge.to();
                let w = Distance::Finite(edge.weight());
                if w < weight.get(u, v)? {
                    weight.set(u, v, w)?;
                    pred.set(u, v, Some(u))?;
                }
            }
        }
        Ok(())
    })?;

    let mut improvements = 0usize;
    for k in 0..n {
        let pivot = graph.vertex(k)?;
        pivot.set_color(1);
        graph.subroutine(format!("relax through {}", k), || -> Result<()> {
            for i in 0..n {
                let ik = weight.get(i, k)?;
                if !ik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let through = ik.join(weight.get(k, j)?);
                    if through < weight.get(i, j)? {
                        weight.set(i, j, through)?;
                        let p = pred.get(k, j)?;
                        pred.set(i, j, p)?;
                        improvements += 1;
                    }
                }
            }
            Ok(())
        })?;
        pivot.set_color(0);
    }

    let mut negative = 0;
    for v in 0..n {
        if weight.get(v, v)? < Distance::ZERO {
            graph.vertex(v)?.add_highlight(1);
            negative += 1;
        }
    }

    debug!(improvements, negative, events = graph.event_count(), "floyd-warshall finished");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgraph_core::{GraphEvent, Value};

    fn final_matrix(graph: &RecordingGraph, id: usize, initial: Value) -> Vec<Vec<Value>> {
        let n = graph.vertex_count();
        let mut out = vec![vec![initial; n]; n];
        for event in graph.events() {
            if let GraphEvent::TableWrite { table, row, column, value } = event {
                if table == id {
                    out[row][column] = value;
                }
            }
        }
        out
    }

    #[test]
    fn all_pairs_on_small_digraph() {
        // 0 -3-> 1 -1-> 2, 0 -5-> 2, 2 -2-> 0
        let input = GraphInput::new(3, vec![(0, 1, 3), (1, 2, 1), (0, 2, 5), (2, 0, 2)], true);
        let graph = run(&input).unwrap();
        let w = final_matrix(&graph, 0, Value::Infinity);
        let int = Value::Int;
        assert_eq!(w[0], vec![int(0), int(3), int(4)]);
        assert_eq!(w[1], vec![int(3), int(0), int(1)]);
        assert_eq!(w[2], vec![int(2), int(5), int(0)]);

        let p = final_matrix(&graph, 1, Value::Null);
        // 0 -> 2 goes through 1
        assert_eq!(p[0][2], Value::Int(1));
        assert_eq!(p[1][0], Value::Int(2));
    }

    #[test]
    fn parallel_edge_keeps_lighter() {
        let input = GraphInput::new(2, vec![(0, 1, 7), (0, 1, 2)], true);
        let graph = run(&input).unwrap();
        let w = final_matrix(&graph, 0, Value::Infinity);
        assert_eq!(w[0][1], Value::Int(2));
        assert_eq!(w[1][0], Value::Infinity);
    }

    #[test]
    fn negative_cycle_highlights_diagonal() {
        let input = GraphInput::new(3, vec![(0, 1, 1), (1, 0, -3), (1, 2, 1)], true);
        let graph = run(&input).unwrap();
        assert!(graph.vertex(0).unwrap().has_highlight(1));
        assert!(graph.vertex(1).unwrap().has_highlight(1));
        assert!(!graph.vertex(2).unwrap().has_highlight(1));
    }

    #[test]
    fn pivots_are_reset() {
        let input = GraphInput::unweighted(3, &[(0, 1), (1, 2)]);
        let graph = run(&input).unwrap();
        for v in 0..3 {
            assert_eq!(graph.vertex(v).unwrap().color(), 0);
        }
        assert!(stepgraph_core::is_balanced(&graph.events()));
    }
}
