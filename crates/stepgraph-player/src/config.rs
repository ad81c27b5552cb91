//! Host configuration.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Configuration for the visualization host.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Time between playback steps at normal speed
    pub tick: Duration,
    /// Seed for generated sample graphs
    pub seed: u64,
    /// Vertex count of generated sample graphs
    pub vertices: usize,
    /// Maximum edge weight of generated sample graphs
    pub max_weight: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            tick: Duration::from_millis(100),
            seed: 42,
            vertices: 20,
            max_weight: 9,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: env_or("STEPGRAPH_ADDR", defaults.addr),
            tick: Duration::from_millis(env_or("STEPGRAPH_TICK_MS", 100u64)),
            seed: env_or("STEPGRAPH_SEED", defaults.seed),
            vertices: env_or("STEPGRAPH_VERTICES", defaults.vertices),
            max_weight: env_or("STEPGRAPH_MAX_WEIGHT", defaults.max_weight),
        }
    }

    /// Base step interval in milliseconds.
    pub fn tick_ms(&self) -> u64 {
        self.tick.as_millis() as u64
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}
