//! Prim's minimum spanning tree grown from vertex 0.
//!
//! Each round scans the input edge list for the lightest edge with exactly
//! one endpoint in the tree (first one wins ties) and pulls it in. Tree
//! vertices and tree edges are colored 1. Stops early when the remaining
//! vertices are unreachable.

use stepgraph_core::{display_blank_null, RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

const IN_TREE: usize = 0;

const CODE: [&str; 6] = [
    "S ← {0}",
    "repeat n - 1 times:",
    "  find lightest edge (u, v) with u in S, v not in S",
    "  if none: stop",
    "  S ← S ∪ {v}",
    "  total ← total + w(u, v)",
];

/// Run Prim and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph<bool>> {
    let mut graph = RecordingGraph::with_auxiliary(input, Some(vec![false]), None)?;
    let mut light = graph.create_table(
        TableConfig::new("Light Edge", 1, 2, None::<usize>)
            .with_column_labels(vec!["u".into(), "v".into()])
            .with_formatter(display_blank_null),
    )?;
    let mut total = graph.create_table(TableConfig::new("Total", 1, 1, 0i64))?;
    let mut code = graph.add_code(CODE)?;
    graph.finalize()?;

    if input.n == 0 {
        return Ok(graph);
    }

    code.set_line(0);
    let root = graph.vertex(0)?;
    root.set_auxiliary_value(IN_TREE, true)?;
    root.set_color(1);

    let mut grown = 1;
    for _ in 1..input.n {
        code.set_line(1);
        code.set_line(2);
        let best = graph.subroutine("find light edge", || -> Result<Option<(usize, usize, i64)>> {
            let mut best: Option<(usize, usize, i64)> = None;
            for &(a, b, w) in &input.edges {
                let a_in = graph.vertex(a)?.auxiliary_value(IN_TREE)?;
                let b_in = graph.vertex(b)?.auxiliary_value(IN_TREE)?;
                if a_in == b_in {
                    continue;
                }
                if best.map_or(true, |(_, _, bw)| w < bw) {
                    let (u, v) = if a_in { (a, b) } else { (b, a) };
                    light.set(0, 0, Some(u))?;
                    light.set(0, 1, Some(v))?;
                    best = Some((u, v, w));
                }
            }
            Ok(best)
        })?;

        code.set_line(3);
        let Some((u, v, w)) = best else {
            debug!(grown, "prim stopped: rest of graph unreachable");
            break;
        };

        code.set_line(4);
        let joined = graph.vertex(v)?;
        joined.set_auxiliary_value(IN_TREE, true)?;
        joined.set_color(1);
        for (a, b) in [(u, v), (v, u)] {
            if let Some(edge) = graph.edge(a, b)? {
                edge.set_color(1);
            }
        }

        code.set_line(5);
        let sum = total.get(0, 0)?;
        total.set(0, 0, sum.saturating_add(w))?;
        grown += 1;
    }

    debug!(grown, events = graph.event_count(), "prim finished");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgraph_core::{GraphEvent, Value};

    fn total(graph: &RecordingGraph<bool>) -> Value {
        graph
            .events()
            .into_iter()
            .filter_map(|e| match e {
                GraphEvent::TableWrite { table: 1, value, .. } => Some(value),
                _ => None,
            })
            .last()
            .unwrap_or(Value::Int(0))
    }

    #[test]
    fn square_with_diagonal() {
        // 0-1 (1), 1-2 (4), 2-3 (1), 3-0 (3), 0-2 (2)
        let input = GraphInput::new(
            4,
            vec![(0, 1, 1), (1, 2, 4), (2, 3, 1), (3, 0, 3), (0, 2, 2)],
            false,
        );
        let graph = run(&input).unwrap();
        assert_eq!(total(&graph), Value::Int(4));
        assert_eq!(graph.edge(0, 1).unwrap().unwrap().color(), 1);
        assert_eq!(graph.edge(2, 0).unwrap().unwrap().color(), 1);
        assert_eq!(graph.edge(3, 2).unwrap().unwrap().color(), 1);
        assert_eq!(graph.edge(1, 2).unwrap().unwrap().color(), 0);
        assert_eq!(graph.edge(0, 3).unwrap().unwrap().color(), 0);
    }

    #[test]
    fn total_saturates_on_huge_weights() {
        let input = GraphInput::new(3, vec![(0, 1, i64::MAX), (1, 2, i64::MAX)], false);
        let graph = run(&input).unwrap();
        assert_eq!(total(&graph), Value::Int(i64::MAX));
        assert!((0..3).all(|v| graph.vertex(v).unwrap().color() == 1));
    }

    #[test]
    fn ties_pick_first_listed() {
        let input = GraphInput::new(3, vec![(0, 2, 5), (0, 1, 5), (1, 2, 9)], false);
        let graph = run(&input).unwrap();
        // Round one must take 0-2, listed first
        let first_light = graph
            .events()
            .into_iter()
            .find_map(|e| match e {
                GraphEvent::TableWrite { table: 0, column: 1, value, .. } => Some(value),
                _ => None,
            });
        assert_eq!(first_light, Some(Value::Int(2)));
        assert_eq!(total(&graph), Value::Int(10));
    }

    #[test]
    fn stops_when_disconnected() {
        let input = GraphInput::new(3, vec![(0, 1, 2)], false);
        let graph = run(&input).unwrap();
        assert_eq!(graph.vertex(1).unwrap().color(), 1);
        assert_eq!(graph.vertex(2).unwrap().color(), 0);
        let rounds = graph
            .events()
            .iter()
            .filter(|e| matches!(e, GraphEvent::SubroutineStart { .. }))
            .count();
        assert_eq!(rounds, 2);
    }
}
