//! Stepgraph Topology
//!
//! The input side of a recorded algorithm run: the graph interchange format,
//! planar geometry for vertex positions, and random graph generation.
//!
//! # Interchange Format
//!
//! Editors and generators hand graphs around as [`GraphInput`]:
//! `{ n, nodePositions: [{x,y}], edges: [[from,to,weight]], directed }`.
//! The field names are stable and shared with external tools.
//!
//! # Layout
//!
//! Positions are rendering-only. [`generate_roughly_planar`] scatters
//! vertices, links near neighbors, and relaxes the drawing with
//! [`Vector2::repulse`].

mod error;
mod generate;
mod input;
mod vector;

pub use error::{Result, TopologyError};
pub use generate::{generate_roughly_planar, space_out};
pub use input::{circle_layout, EdgeTriple, GraphInput};
pub use vector::{constrain, Vector2};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_input_round_trips_through_validation() {
        let input = generate_roughly_planar(10, 3, &mut StdRng::seed_from_u64(0));
        assert_eq!(input.positions(), input.node_positions);
        assert!(input.validate().is_ok());
    }

    proptest::proptest! {
        #[test]
        fn generated_inputs_always_validate(seed in 0u64..1_000, n in 0usize..30, w in 1i64..20) {
            let input = generate_roughly_planar(n, w, &mut StdRng::seed_from_u64(seed));
            proptest::prop_assert!(input.validate().is_ok());
            proptest::prop_assert!(input.max_weight().map_or(true, |m| m <= w));
        }
    }
}
