//! Stepgraph Algorithms
//!
//! Textbook graph algorithms written against [`RecordingGraph`], so that a
//! run produces a step-by-step replayable recording.
//!
//! Every algorithm module exposes `run(&GraphInput) -> Result<RecordingGraph<..>>`
//! and keeps the finished graph around for inspection; [`Algorithm::record`]
//! is the uniform entry point that freezes the run into a [`Recording`].
//!
//! | Algorithm | Colors |
//! |-----------|--------|
//! | BFS | visited vertices 1, highlight = hop level + 1 |
//! | DFS | visited vertices 1; edges tree 1, back 2, forward 3, cross 4 |
//! | Dijkstra | settled vertices and parent edges 1, candidate edges 2 |
//! | Bellman–Ford | improving edges 2, negative cycle 3, affected vertices highlight 1 |
//! | Floyd–Warshall | pivot 1 while active, negative diagonal highlight 1 |
//! | Kruskal | accepted 1, rejected 2 |
//! | Prim | tree 1 |
//! | Tarjan SCC | tree edges 1, component `c` colored `2 + c` |
//! | Topological sort | sorted 1 with highlight = layer + 1, cyclic 2 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stepgraph_core::{Recording, RecordingGraph, Result};
use stepgraph_topology::GraphInput;
use thiserror::Error;
use tracing::info;

pub mod bellman_ford;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod floyd_warshall;
pub mod kruskal;
pub mod prim;
pub mod tarjan;
pub mod topological;

mod distance;
mod dsu;

pub use distance::Distance;
pub use dsu::DisjointSets;

/// The algorithms that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BellmanFord,
    FloydWarshall,
    Kruskal,
    Prim,
    TarjanScc,
    TopologicalSort,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::FloydWarshall,
        Algorithm::Kruskal,
        Algorithm::Prim,
        Algorithm::TarjanScc,
        Algorithm::TopologicalSort,
    ];

    /// Stable machine name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman-ford",
            Algorithm::FloydWarshall => "floyd-warshall",
            Algorithm::Kruskal => "kruskal",
            Algorithm::Prim => "prim",
            Algorithm::TarjanScc => "tarjan-scc",
            Algorithm::TopologicalSort => "topological-sort",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Dfs => "Depth-First Search",
            Algorithm::Dijkstra => "Dijkstra's Algorithm",
            Algorithm::BellmanFord => "Bellman–Ford",
            Algorithm::FloydWarshall => "Floyd–Warshall",
            Algorithm::Kruskal => "Kruskal's MST",
            Algorithm::Prim => "Prim's MST",
            Algorithm::TarjanScc => "Tarjan's Strongly Connected Components",
            Algorithm::TopologicalSort => "Topological Sort",
        }
    }

    /// Whether the algorithm is only interesting on one-way edges.
    pub fn prefers_directed(&self) -> bool {
        matches!(self, Algorithm::TarjanScc | Algorithm::TopologicalSort)
    }

    /// Run the algorithm on `input` and freeze the result.
    pub fn record(&self, input: &GraphInput) -> Result<Recording> {
        let recording = match self {
            Algorithm::Bfs => freeze(bfs::run(input)?),
            Algorithm::Dfs => freeze(dfs::run(input)?),
            Algorithm::Dijkstra => freeze(dijkstra::run(input)?),
            Algorithm::BellmanFord => freeze(bellman_ford::run(input)?),
            Algorithm::FloydWarshall => freeze(floyd_warshall::run(input)?),
            Algorithm::Kruskal => freeze(kruskal::run(input)?),
            Algorithm::Prim => freeze(prim::run(input)?),
            Algorithm::TarjanScc => freeze(tarjan::run(input)?),
            Algorithm::TopologicalSort => freeze(topological::run(input)?),
        };
        info!(
            algorithm = self.name(),
            vertices = input.n,
            edges = input.edges.len(),
            events = recording.events().len(),
            "algorithm recorded"
        );
        Ok(recording)
    }
}

fn freeze<V, E>(graph: RecordingGraph<V, E>) -> Recording {
    graph.into_recording()
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An unrecognized algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm '{0}' (expected one of: bfs, dfs, dijkstra, bellman-ford, floyd-warshall, kruskal, prim, tarjan-scc, topological-sort)")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!("Bellman_Ford".parse::<Algorithm>(), Ok(Algorithm::BellmanFord));
        assert!("a-star".parse::<Algorithm>().is_err());
    }

    #[test]
    fn serde_uses_machine_names() {
        let json = serde_json::to_string(&Algorithm::TarjanScc).unwrap();
        assert_eq!(json, "\"tarjan-scc\"");
        let back: Algorithm = serde_json::from_str("\"topological-sort\"").unwrap();
        assert_eq!(back, Algorithm::TopologicalSort);
    }

    #[test]
    fn every_algorithm_records_on_empty_graph() {
        let empty = GraphInput::new(0, Vec::new(), false);
        for algorithm in Algorithm::ALL {
            let recording = algorithm.record(&empty).unwrap();
            assert_eq!(recording.vertex_count(), 0, "{}", algorithm);
        }
    }

    #[test]
    fn every_algorithm_records_balanced_logs() {
        let input = GraphInput::new(
            5,
            vec![(0, 1, 2), (1, 2, 1), (2, 0, 3), (2, 3, 4), (3, 4, 1)],
            true,
        );
        for algorithm in Algorithm::ALL {
            let recording = algorithm.record(&input).unwrap();
            assert!(!recording.events().is_empty(), "{}", algorithm);
            assert!(stepgraph_core::is_balanced(recording.events()), "{}", algorithm);
        }
    }
}
