//! Tarjan's strongly connected components.
//!
//! Tree edges are colored 1. When a component is completed, each member's
//! color becomes `2 + c` where `c` counts components in completion order
//! (reverse topological order of the condensation), and its low-link is
//! set to the component root's.

use stepgraph_core::{display_blank_null, Edge, RecordingGraph, Result, Table, TableConfig};
use stepgraph_topology::GraphInput;
use tracing::debug;

/// Color of the first completed component.
pub const FIRST_COMPONENT: u32 = 2;

struct Tables {
    index: Table<Option<usize>>,
    low: Table<Option<usize>>,
    on_stack: Table<bool>,
}

struct Search {
    counter: usize,
    stack: Vec<usize>,
    components: u32,
}

struct Frame<'g> {
    vertex: usize,
    edges: &'g [Edge<()>],
    next: usize,
}

/// Run Tarjan and return the recorded graph.
pub fn run(input: &GraphInput) -> Result<RecordingGraph> {
    let n = input.n;
    let mut graph: RecordingGraph = RecordingGraph::new(input)?;
    let per_vertex = |name: &str| {
        TableConfig::new(name, 1, n, None::<usize>)
            .with_headers("", "Vertex")
            .with_index_labels()
            .with_formatter(display_blank_null)
    };
    let index = graph.create_table(per_vertex("Index"))?;
    let low = graph.create_table(per_vertex("LowLink"))?;
    let on_stack = graph.create_table(
        TableConfig::new("On Stack", 1, n, false)
            .with_headers("", "Vertex")
            .with_index_labels(),
    )?;
    graph.finalize()?;

    let mut tables = Tables { index, low, on_stack };
    let mut search = Search {
        counter: 0,
        stack: Vec::new(),
        components: 0,
    };
    for root in 0..n {
        if tables.index.get(0, root)?.is_none() {
            strong_connect(&graph, root, &mut tables, &mut search)?;
        }
    }

    debug!(components = search.components, "tarjan finished");
    Ok(graph)
}

fn strong_connect(
    graph: &RecordingGraph,
    root: usize,
    tables: &mut Tables,
    search: &mut Search,
) -> Result<()> {
    let mut frames = vec![arrive(graph, root, tables, search)?];

    while let Some(frame) = frames.last_mut() {
        let v = frame.vertex;
        if let Some(edge) = frame.edges.get(frame.next) {
            frame.next += 1;
            let w = edge.to();
            match tables.index.get(0, w)? {
                None => {
                    edge.set_color(1);
                    let child = arrive(graph, w, tables, search)?;
                    frames.push(child);
                }
                Some(w_index) => {
                    if tables.on_stack.get(0, w)? {
                        lower(tables, v, w_index)?;
                    }
                }
            }
            continue;
        }

        frames.pop();
        let v_low = low_of(tables, v)?;
        if Some(v_low) == tables.index.get(0, v)? {
            complete_component(graph, v, v_low, tables, search)?;
        }
        if let Some(parent) = frames.last() {
            lower(tables, parent.vertex, v_low)?;
        }
    }
    Ok(())
}

fn arrive<'g>(
    graph: &'g RecordingGraph,
    v: usize,
    tables: &mut Tables,
    search: &mut Search,
) -> Result<Frame<'g>> {
    graph.vertex(v)?.set_color(1);
    tables.index.set(0, v, Some(search.counter))?;
    tables.low.set(0, v, Some(search.counter))?;
    search.counter += 1;
    search.stack.push(v);
    tables.on_stack.set(0, v, true)?;

    let edges = graph.subroutine("scan neighbors", || graph.neighbors(v))?;
    Ok(Frame { vertex: v, edges, next: 0 })
}

fn low_of(tables: &Tables, v: usize) -> Result<usize> {
    // Every vertex on the frame stack has been numbered
    Ok(tables.low.get(0, v)?.unwrap_or_default())
}

/// `low[v] = min(low[v], candidate)`
fn lower(tables: &mut Tables, v: usize, candidate: usize) -> Result<()> {
    if candidate < low_of(tables, v)? {
        tables.low.set(0, v, Some(candidate))?;
    }
    Ok(())
}

fn complete_component(
    graph: &RecordingGraph,
    root: usize,
    root_low: usize,
    tables: &mut Tables,
    search: &mut Search,
) -> Result<()> {
    let color = FIRST_COMPONENT + search.components;
    graph.subroutine(format!("pop component {}", search.components), || -> Result<()> {
        while let Some(w) = search.stack.pop() {
            tables.on_stack.set(0, w, false)?;
            tables.low.set(0, w, Some(root_low))?;
            graph.vertex(w)?.set_color(color);
            if w == root {
                break;
            }
        }
        Ok(())
    })?;
    search.components += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(graph: &RecordingGraph) -> Vec<u32> {
        (0..graph.vertex_count())
            .map(|v| graph.vertex(v).unwrap().color())
            .collect()
    }

    #[test]
    fn cycle_with_tail() {
        // {0, 1, 2} cycle, 2 -> 3
        let input = GraphInput::new(4, vec![(0, 1, 1), (1, 2, 1), (2, 0, 1), (2, 3, 1)], true);
        let graph = run(&input).unwrap();
        // {3} completes first
        assert_eq!(colors(&graph), vec![3, 3, 3, 2]);
        assert_eq!(graph.edge(0, 1).unwrap().unwrap().color(), 1);
        assert_eq!(graph.edge(2, 3).unwrap().unwrap().color(), 1);
        assert_eq!(graph.edge(2, 0).unwrap().unwrap().color(), 0);
    }

    #[test]
    fn dag_has_singleton_components() {
        let input = GraphInput::new(3, vec![(0, 1, 1), (1, 2, 1)], true);
        let graph = run(&input).unwrap();
        assert_eq!(colors(&graph), vec![4, 3, 2]);
    }

    #[test]
    fn two_cycles_joined_one_way() {
        // {0, 1} -> {2, 3}
        let input = GraphInput::new(
            4,
            vec![(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 3, 1), (3, 2, 1)],
            true,
        );
        let graph = run(&input).unwrap();
        let c = colors(&graph);
        assert_eq!(c[0], c[1]);
        assert_eq!(c[2], c[3]);
        assert_ne!(c[0], c[2]);
        assert_eq!(c[2], FIRST_COMPONENT);
    }

    #[test]
    fn cross_edge_to_finished_component_is_ignored() {
        // 0 -> 1, 0 -> 2, 2 -> 1: 1 finishes before 2 looks at it
        let input = GraphInput::new(3, vec![(0, 1, 1), (0, 2, 1), (2, 1, 1)], true);
        let graph = run(&input).unwrap();
        assert_eq!(colors(&graph), vec![4, 2, 3]);
    }

    #[test]
    fn separate_roots() {
        let input = GraphInput::new(3, vec![(1, 2, 1), (2, 1, 1)], true);
        let graph = run(&input).unwrap();
        assert_eq!(colors(&graph), vec![2, 3, 3]);
        assert!(stepgraph_core::is_balanced(&graph.events()));
    }
}
