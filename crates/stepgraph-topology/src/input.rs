//! The graph interchange format produced by editors and generators.
//!
//! JSON shape (field names are part of the format):
//!
//! ```json
//! { "n": 3, "nodePositions": [{"x": 0, "y": 0}, ...], "edges": [[0, 1, 5]], "directed": false }
//! ```

use std::f64::consts::PI;

use crate::error::{Result, TopologyError};
use crate::Vector2;

/// One `(from, to, weight)` edge triple.
pub type EdgeTriple = (usize, usize, i64);

/// Radius of the fallback circle layout.
const CIRCLE_RADIUS: f64 = 100.0;

/// Center of the fallback circle layout.
const CIRCLE_CENTER: Vector2 = Vector2::new(200.0, 200.0);

/// A graph in edge-list form.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GraphInput {
    /// Number of vertices, labeled `0..n`
    pub n: usize,
    /// Vertex positions for rendering; empty means "lay out on a circle"
    #[cfg_attr(feature = "serde", serde(default))]
    pub node_positions: Vec<Vector2>,
    /// Edge triples referencing vertex labels
    pub edges: Vec<EdgeTriple>,
    /// Whether edges are one-way
    pub directed: bool,
}

impl GraphInput {
    /// Build an input with circle positions.
    pub fn new(n: usize, edges: Vec<EdgeTriple>, directed: bool) -> Self {
        Self {
            n,
            node_positions: circle_layout(n),
            edges,
            directed,
        }
    }

    /// Build an undirected input where every edge has weight 1.
    pub fn unweighted(n: usize, pairs: &[(usize, usize)]) -> Self {
        Self::new(n, pairs.iter().map(|&(u, v)| (u, v, 1)).collect(), false)
    }

    /// Check that every edge endpoint names a vertex and that positions
    /// (when given) cover every vertex.
    pub fn validate(&self) -> Result<()> {
        if !self.node_positions.is_empty() && self.node_positions.len() != self.n {
            return Err(TopologyError::PositionCount {
                expected: self.n,
                actual: self.node_positions.len(),
            });
        }
        for (index, &(from, to, _)) in self.edges.iter().enumerate() {
            if from >= self.n || to >= self.n {
                return Err(TopologyError::EndpointOutOfRange {
                    edge: index,
                    from,
                    to,
                    n: self.n,
                });
            }
        }
        Ok(())
    }

    /// Position of every vertex, falling back to a circle layout.
    pub fn positions(&self) -> Vec<Vector2> {
        if self.node_positions.len() == self.n {
            self.node_positions.clone()
        } else {
            circle_layout(self.n)
        }
    }

    /// Number of edge triples (before half-edge expansion).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Largest edge weight, if there are any edges.
    pub fn max_weight(&self) -> Option<i64> {
        self.edges.iter().map(|&(_, _, w)| w).max()
    }

    /// Whether any edge carries a negative weight.
    pub fn has_negative_weight(&self) -> bool {
        self.edges.iter().any(|&(_, _, w)| w < 0)
    }
}

/// Evenly spaced positions on a circle.
pub fn circle_layout(n: usize) -> Vec<Vector2> {
    (0..n)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / n.max(1) as f64;
            CIRCLE_CENTER + Vector2::new(angle.cos(), angle.sin()) * CIRCLE_RADIUS
        })
        .collect()
}
