//! Stepgraph Core
//!
//! An instrumented graph that captures every read and write a graph
//! algorithm performs as one ordered, replayable event log.
//!
//! # Architecture
//!
//! - **Element**: vertices and edges with color, highlight tags and private
//!   auxiliary slots; every color/highlight/read operation is recorded
//! - **Table**: typed 2D scratch storage whose reads and writes are recorded
//! - **Code tracker**: current pseudocode line, recorded on change
//! - **Recording graph**: owns all of the above and funnels their
//!   notifications into one [`Recorder`]
//! - **Recording**: the frozen result, consumed by a replay engine
//!
//! # Usage
//!
//! ```
//! use stepgraph_core::{RecordingGraph, TableConfig};
//! use stepgraph_topology::GraphInput;
//!
//! let input = GraphInput::unweighted(3, &[(0, 1), (1, 2)]);
//! let mut graph: RecordingGraph = RecordingGraph::new(&input)?;
//! let mut seen = graph.create_table(TableConfig::new("seen", 1, 3, false))?;
//! graph.finalize()?;
//!
//! for edge in graph.neighbors(1)? {
//!     graph.vertex(edge.to())?.set_color(1);
//!     seen.set(0, edge.to(), true)?;
//! }
//!
//! let recording = graph.into_recording();
//! assert_eq!(recording.events().len(), 8);
//! # Ok::<(), stepgraph_core::Error>(())
//! ```

mod code;
mod element;
mod error;
mod event;
mod graph;
mod recording;
mod table;
mod value;

pub use code::CodeTracker;
pub use element::{Edge, Element, ElementState, Vertex};
pub use error::{Error, Result};
pub use event::{is_balanced, ElementId, GraphEvent, Recorder};
pub use graph::{Phase, RecordingGraph};
pub use recording::{half_edges, EdgeSpec, Recording};
pub use table::{CellFormatter, Table, TableConfig, TableLayout};
pub use value::{display_blank_null, display_plain, CellValue, Value};
