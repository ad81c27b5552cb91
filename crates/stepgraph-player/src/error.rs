//! Error types for replay and hosting.

use stepgraph_core::GraphEvent;
use thiserror::Error;

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A log entry the replay engine could not apply.
///
/// Fatal: the shadow state is left as it was just before the offending
/// event and the program counter does not move past it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// The event references something the recording never declared, or
    /// breaks the subroutine nesting
    #[error("cannot apply event #{index} ({event:?}): {reason}")]
    InvalidEvent {
        index: usize,
        event: GraphEvent,
        reason: String,
    },
}

/// Errors that can occur while recording, replaying or serving.
#[derive(Debug, Error)]
pub enum Error {
    /// Replay failed on a corrupt log
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// The algorithm run failed
    #[error("Recording error: {0}")]
    Recording(#[from] stepgraph_core::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
