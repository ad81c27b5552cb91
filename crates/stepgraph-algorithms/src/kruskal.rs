//! Kruskal's minimum spanning forest.
//!
//! Edges are considered in ascending weight order (ties keep input order).
//! Accepted edges and their endpoints are colored 1, rejected edges 2.
//! Every edge is considered; there is no early exit once the forest is
//! complete, so the replay shows each rejection.

use stepgraph_core::{RecordingGraph, Result, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

use crate::dsu::DisjointSets;

pub const ACCEPTED: u32 = 1;
pub const REJECTED: u32 = 2;

const FROM: usize = 0;
const TO: usize = 1;
const WEIGHT: usize = 2;

/// Run Kruskal and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph> {
    let mut order: Vec<usize> = (0..input.edges.len()).collect();
    order.sort_by_key(|&i| input.edges[i].2);

    let mut graph: RecordingGraph = RecordingGraph::new(input)?;
    let mut sorted = graph.create_table(
        TableConfig::new("Sorted Edges", 3, order.len(), 0i64)
            .with_row_labels(vec!["From".into(), "To".into(), "Weight".into()])
            .with_column_labels((0..order.len()).map(|i| i.to_string()).collect()),
    )?;
    let mut sets = DisjointSets::declare(&mut graph, input.n)?;
    let mut total = graph.create_table(TableConfig::new("Total", 1, 1, 0i64))?;
    graph.finalize()?;

    for (column, &i) in order.iter().enumerate() {
        let (u, v, w) = input.edges[i];
        sorted.set(FROM, column, u as i64)?;
        sorted.set(TO, column, v as i64)?;
        sorted.set(WEIGHT, column, w)?;
    }
    sets.make_sets()?;

    let mut accepted = 0;
    for column in 0..order.len() {
        let (u, v, w) = (
            sorted.get(FROM, column)? as usize,
            sorted.get(TO, column)? as usize,
            sorted.get(WEIGHT, column)?,
        );
        graph.subroutine(format!("consider edge {}-{}", u, v), || -> Result<()> {
            let joined = sets.union(u, v)?;
            let color = if joined { ACCEPTED } else { REJECTED };
            for (a, b) in [(u, v), (v, u)] {
                if let Some(edge) = graph.edge(a, b)? {
                    edge.set_color(color);
                }
            }
            if joined {
                graph.vertex(u)?.set_color(ACCEPTED);
                graph.vertex(v)?.set_color(ACCEPTED);
                let sum = total.get(0, 0)?;
                total.set(0, 0, sum.saturating_add(w))?;
                accepted += 1;
            }
            Ok(())
        })?;
    }

    debug!(accepted, considered = order.len(), "kruskal finished");
    Ok(graph)
}
