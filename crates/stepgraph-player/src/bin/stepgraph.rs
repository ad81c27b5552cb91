//! Stepgraph visualization server
//!
//! Record an algorithm run and serve step-by-step playback over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use stepgraph_algorithms::Algorithm;
use stepgraph_player::{sample_input, ServerConfig, Session, VisServer};
use stepgraph_topology::GraphInput;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Step through graph algorithms in the browser.
#[derive(Debug, Parser)]
#[command(name = "stepgraph", version, about)]
struct Cli {
    /// Algorithm to record first
    #[arg(short, long, default_value = "bfs")]
    algorithm: Algorithm,

    /// Graph to run on, as `{ n, nodePositions, edges, directed }` JSON
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Listen address (overrides STEPGRAPH_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Milliseconds between steps at normal speed (overrides STEPGRAPH_TICK_MS)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for generated graphs (overrides STEPGRAPH_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Vertex count of generated graphs (overrides STEPGRAPH_VERTICES)
    #[arg(long)]
    vertices: Option<usize>,

    /// Maximum edge weight of generated graphs (overrides STEPGRAPH_MAX_WEIGHT)
    #[arg(long)]
    max_weight: Option<i64>,
}

impl Cli {
    fn config(&self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(ms) = self.tick_ms {
            config.tick = std::time::Duration::from_millis(ms);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(vertices) = self.vertices {
            config.vertices = vertices;
        }
        if let Some(max_weight) = self.max_weight {
            config.max_weight = max_weight;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepgraph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let input = match &cli.input {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<GraphInput>(&text)?
        }
        None => sample_input(cli.algorithm, config.vertices, config.max_weight, config.seed),
    };

    tracing::info!(
        algorithm = cli.algorithm.title(),
        vertices = input.n,
        edges = input.edges.len(),
        "Starting Stepgraph"
    );

    let session = Session::record(cli.algorithm, input, config.tick_ms())?;
    VisServer::new(session, config).serve().await?;
    Ok(())
}
