//! Recorded events and the sink that collects them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Identity of an observable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementId {
    /// A vertex by index
    Vertex(usize),
    /// A directed half-edge by endpoints
    Edge(usize, usize),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Vertex(i) => write!(f, "vertex {}", i),
            ElementId::Edge(u, v) => write!(f, "edge {}->{}", u, v),
        }
    }
}

/// One observable operation performed during an algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphEvent {
    /// An element's color was replaced
    Color { target: ElementId, color: u32 },

    /// A highlight tag was added to an element
    HighlightAdd { target: ElementId, tag: u32 },

    /// A highlight tag was removed from an element
    HighlightRemove { target: ElementId, tag: u32 },

    /// An element's highlight set was emptied
    HighlightClear { target: ElementId },

    /// An element was looked at
    Read { target: ElementId },

    /// A table cell was read
    TableRead { table: usize, row: usize, column: usize },

    /// A table cell was written
    TableWrite {
        table: usize,
        row: usize,
        column: usize,
        value: Value,
    },

    /// The current pseudocode line moved
    CodeWrite { line: usize },

    /// A named subroutine began
    SubroutineStart { name: String },

    /// The innermost open subroutine ended
    SubroutineEnd,

    /// An event kind this build does not know about (logs written by newer versions)
    #[serde(other)]
    Unknown,
}

impl GraphEvent {
    /// The element this event touches, if any.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            GraphEvent::Color { target, .. }
            | GraphEvent::HighlightAdd { target, .. }
            | GraphEvent::HighlightRemove { target, .. }
            | GraphEvent::HighlightClear { target }
            | GraphEvent::Read { target } => Some(*target),
            _ => None,
        }
    }

    /// The wire name of this event's type tag.
    pub fn kind(&self) -> &'static str {
        match self {
            GraphEvent::Color { .. } => "color",
            GraphEvent::HighlightAdd { .. } => "highlightAdd",
            GraphEvent::HighlightRemove { .. } => "highlightRemove",
            GraphEvent::HighlightClear { .. } => "highlightClear",
            GraphEvent::Read { .. } => "read",
            GraphEvent::TableRead { .. } => "tableRead",
            GraphEvent::TableWrite { .. } => "tableWrite",
            GraphEvent::CodeWrite { .. } => "codeWrite",
            GraphEvent::SubroutineStart { .. } => "subroutineStart",
            GraphEvent::SubroutineEnd => "subroutineEnd",
            GraphEvent::Unknown => "unknown",
        }
    }
}

/// Check that subroutine brackets in a log are stack-balanced: no prefix
/// closes more subroutines than it opened, and the whole log closes every
/// one it opened.
pub fn is_balanced(events: &[GraphEvent]) -> bool {
    let mut depth: usize = 0;
    for event in events {
        match event {
            GraphEvent::SubroutineStart { .. } => depth += 1,
            GraphEvent::SubroutineEnd => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Shared append-only sink for one run's events.
///
/// Every element, table and code tracker of a graph holds a clone and
/// appends to the same log, so the log order is the real call order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<GraphEvent>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: GraphEvent) {
        self.log.borrow_mut().push(event);
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Copy of the log so far.
    pub fn events(&self) -> Vec<GraphEvent> {
        self.log.borrow().clone()
    }

    /// Move the log out, leaving it empty.
    pub(crate) fn take(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}
