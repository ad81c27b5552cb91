//! One recorded algorithm run plus its playback.

use rand::rngs::StdRng;
use rand::SeedableRng;
use stepgraph_algorithms::Algorithm;
use stepgraph_topology::{generate_roughly_planar, GraphInput};
use tracing::info;

use crate::error::Result;
use crate::playback::Playback;

/// Generate a sample input suited to `algorithm`.
///
/// Generated graphs are undirected with edges listed as `(low, high)`. For
/// algorithms that want one-way edges the graph is made directed, which
/// orients it as a DAG; for SCC every third edge is then flipped so that
/// cycles appear.
pub fn sample_input(algorithm: Algorithm, vertices: usize, max_weight: i64, seed: u64) -> GraphInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut input = generate_roughly_planar(vertices, max_weight, &mut rng);
    if algorithm.prefers_directed() {
        input.directed = true;
        if algorithm == Algorithm::TarjanScc {
            for (i, edge) in input.edges.iter_mut().enumerate() {
                if i % 3 == 2 {
                    *edge = (edge.1, edge.0, edge.2);
                }
            }
        }
    }
    input
}

/// The algorithm, the input it ran on, and playback over the result.
#[derive(Debug)]
pub struct Session {
    algorithm: Algorithm,
    input: GraphInput,
    playback: Playback,
}

impl Session {
    /// Run `algorithm` on `input` and wrap the recording for playback.
    pub fn record(algorithm: Algorithm, input: GraphInput, tick_ms: u64) -> Result<Self> {
        let recording = algorithm.record(&input)?;
        info!(
            algorithm = algorithm.name(),
            events = recording.events().len(),
            "session ready"
        );
        Ok(Self {
            algorithm,
            input,
            playback: Playback::new(recording, tick_ms),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn input(&self) -> &GraphInput {
        &self.input
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }
}
