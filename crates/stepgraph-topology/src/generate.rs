//! Random graphs that look reasonable when drawn.
//!
//! Vertices are scattered in a square, joined to a few of their nearest
//! neighbors, then spaced out with a short repulsion relaxation. The result
//! is usually close to planar, which keeps edge crossings rare in a viewer.

use rand::Rng;

use crate::{GraphInput, Vector2};

/// How many nearest neighbors each vertex may connect to.
const NEAREST_CANDIDATES: usize = 4;

/// Relaxation rounds applied after edges are chosen.
const SPACING_ROUNDS: usize = 50;

/// Target distance between vertices during relaxation.
const SPACING: f64 = 100.0;

/// Maximum per-round impulse during relaxation.
const SPACING_STRENGTH: f64 = 10.0;

/// Generate an undirected, roughly planar graph with `n` vertices and
/// weights uniform in `[1, max_weight]`.
pub fn generate_roughly_planar<R: Rng + ?Sized>(n: usize, max_weight: i64, rng: &mut R) -> GraphInput {
    let max_weight = max_weight.max(1);
    let mut positions: Vec<Vector2> = (0..n)
        .map(|_| Vector2::new(rng.gen::<f64>(), rng.gen::<f64>()) * 100.0 + Vector2::new(150.0, 150.0))
        .collect();

    let mut adjacent = vec![vec![false; n]; n];
    for (i, u) in positions.iter().enumerate() {
        let mut nearest: Vec<(f64, usize)> = positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, v)| (u.distance(v), j))
            .collect();
        nearest.sort_by(|a, b| a.0.total_cmp(&b.0));
        nearest.truncate(NEAREST_CANDIDATES);

        let Some(&(closest, _)) = nearest.first() else {
            continue;
        };
        for &(d, j) in &nearest {
            if d > closest * 2.0 {
                continue;
            }
            adjacent[i][j] = true;
            adjacent[j][i] = true;
        }
    }

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if adjacent[i][j] {
                edges.push((i, j, rng.gen_range(1..=max_weight)));
            }
        }
    }

    space_out(&mut positions, SPACING_ROUNDS, SPACING, SPACING_STRENGTH);

    GraphInput {
        n,
        node_positions: positions,
        edges,
        directed: false,
    }
}

/// Apply `rounds` of pairwise repulsion, accumulating impulses per round so
/// the update order does not matter.
pub fn space_out(positions: &mut [Vector2], rounds: usize, spacing: f64, strength: f64) {
    for _ in 0..rounds {
        let impulses: Vec<Vector2> = positions
            .iter()
            .enumerate()
            .map(|(i, u)| {
                positions
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .fold(Vector2::ZERO, |acc, (_, v)| acc + u.repulse(v, spacing, strength))
            })
            .collect();
        for (p, impulse) in positions.iter_mut().zip(impulses) {
            *p += impulse;
        }
    }
}
