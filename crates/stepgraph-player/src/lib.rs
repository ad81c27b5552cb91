//! Stepgraph Player
//!
//! Step-by-step replay of recorded graph algorithm runs.
//!
//! # Architecture
//!
//! - **Player**: rebuilds fresh shadow state from a recording and advances it
//!   one visible step (an event or a whole subroutine) at a time
//! - **Playback**: play/pause/seek/speed over a player, driven by a timer
//! - **Session**: an algorithm, its input and the playback over its run
//! - **Server**: REST + WebSocket control for a browser frontend
//!
//! # Usage
//!
//! ```
//! use stepgraph_algorithms::Algorithm;
//! use stepgraph_player::GraphPlayer;
//! use stepgraph_topology::GraphInput;
//!
//! let input = GraphInput::unweighted(4, &[(0, 1), (1, 2), (2, 3)]);
//! let recording = Algorithm::Bfs.record(&input)?;
//!
//! let mut player = GraphPlayer::new(&recording);
//! let mut now = 0;
//! while !player.is_finished() {
//!     now += 16;
//!     player.step(now)?;
//! }
//! assert!(player.vertices().iter().all(|v| v.state.color == 1));
//! # Ok::<(), stepgraph_player::Error>(())
//! ```

mod config;
mod error;
mod playback;
mod player;
mod server;
mod session;
mod snapshot;

pub use config::ServerConfig;
pub use error::{Error, ReplayError, Result};
pub use playback::{count_steps, Playback, PlaybackSpeed, PlaybackState, PlaybackStatus};
pub use player::{CellRef, GraphPlayer, ShadowEdge, ShadowTable, ShadowVertex};
pub use server::VisServer;
pub use session::{sample_input, Session};
pub use snapshot::{CodeView, EdgeView, PlayerSnapshot, TableView, VertexView};
